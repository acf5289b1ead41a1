use std::any::Any;
use std::sync::mpsc;

use chrono::NaiveDate;
use eframe::egui::{self, Ui};
use egui_extras::DatePickerButton;

use super::element::{ChangeSignal, FilterElement};

const DATE_FMT: &str = "%Y-%m-%d";

/// Start/end calendar date pair bounded by the options template. Each side is
/// clamped into [min, max] after an edit; start <= end is left to the user,
/// matching the underlying picker's affordance.
pub struct DateRangeElement {
    start: NaiveDate,
    end: NaiveDate,
    min: NaiveDate,
    max: NaiveDate,
    key: String,
    changed: ChangeSignal,
}

impl DateRangeElement {
    /// Defaults to the full [min, max] span ("no restriction").
    pub fn new(min: NaiveDate, max: NaiveDate, key: String) -> Self {
        Self {
            start: min,
            end: max,
            min,
            max,
            key,
            changed: ChangeSignal::new(),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Programmatic range assignment; both sides are clamped into bounds and
    /// one change signal is emitted.
    pub fn set_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.start = start.clamp(self.min, self.max);
        self.end = end.clamp(self.min, self.max);
        self.changed.emit();
    }
}

impl FilterElement for DateRangeElement {
    fn show(&mut self, ui: &mut Ui) {
        let (min, max) = (self.min, self.max);
        let start_id = format!("{}_start", self.key);
        let end_id = format!("{}_end", self.key);
        let mut edited = false;

        ui.horizontal(|ui| {
            if ui
                .add(
                    DatePickerButton::new(&mut self.start)
                        .id_source(&start_id)
                        .show_icon(false),
                )
                .changed()
            {
                self.start = self.start.clamp(min, max);
                edited = true;
            }
            ui.label(egui::RichText::new("to").weak());
            if ui
                .add(
                    DatePickerButton::new(&mut self.end)
                        .id_source(&end_id)
                        .show_icon(false),
                )
                .changed()
            {
                self.end = self.end.clamp(min, max);
                edited = true;
            }
        });

        if edited {
            self.changed.emit();
        }
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.start.format(DATE_FMT).to_string(),
            self.end.format(DATE_FMT).to_string(),
        ]
    }

    fn on_change(&mut self, tx: mpsc::Sender<()>) {
        self.changed.connect(tx);
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
