use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;

use eframe::egui::{self, Align2, Color32, FontId, RichText, Rounding, Sense, Stroke, Ui, Vec2};
use strum::IntoEnumIterator;

use super::date_range::DateRangeElement;
use super::element::{ChangeSignal, FilterElement};
use super::multi_select::MultiSelect;
use super::{FilterKind, FilterOptions, RowData, INDEX_KEY};
use crate::ui_constants::filter;

/// Stable identity of a row for the lifetime of the process. The positional
/// index is recomputed on every structural change and never identifies a row.
pub type RowId = u64;

static NEXT_ROW_ID: AtomicU64 = AtomicU64::new(1);

/// One logical filter unit: a delete affordance, an index/color badge, one
/// element per FilterKind and a result-count plaque. Child change signals are
/// fanned into a row-local channel and re-emitted as one row change; the
/// delete affordance emits a one-shot signal carrying the RowId. Whether
/// deletion is currently allowed is the panel's policy, surfaced here only as
/// the `delete_enabled` flag.
pub struct FilterRow {
    id: RowId,
    index: usize,
    color: Option<Color32>,
    count: u64,
    delete_enabled: bool,
    elements: Vec<(FilterKind, Box<dyn FilterElement>)>,
    element_rx: mpsc::Receiver<()>,
    changed: ChangeSignal,
    delete_subscribers: Vec<mpsc::Sender<RowId>>,
}

impl FilterRow {
    pub fn new(options: &FilterOptions, index: usize, palette: &[Color32]) -> Self {
        let id = NEXT_ROW_ID.fetch_add(1, Ordering::Relaxed);
        let (tx, element_rx) = mpsc::channel();

        let elements: Vec<(FilterKind, Box<dyn FilterElement>)> = FilterKind::iter()
            .map(|kind| {
                let key = format!("{}_{}", kind.key(), id);
                let mut element: Box<dyn FilterElement> = match kind {
                    FilterKind::DateRange => Box::new(DateRangeElement::new(
                        options.min_date,
                        options.max_date,
                        key,
                    )),
                    FilterKind::Countries => {
                        Box::new(MultiSelect::new(options.countries.clone(), kind.label(), key))
                    }
                    FilterKind::Continents => Box::new(MultiSelect::new(
                        options.continents.clone(),
                        kind.label(),
                        key,
                    )),
                    FilterKind::PageNames => Box::new(MultiSelect::new(
                        options.page_names.clone(),
                        kind.label(),
                        key,
                    )),
                };
                element.on_change(tx.clone());
                (kind, element)
            })
            .collect();

        Self {
            id,
            index,
            color: palette.get(index).copied(),
            count: 0,
            delete_enabled: true,
            elements,
            element_rx,
            changed: ChangeSignal::new(),
            delete_subscribers: Vec::new(),
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn color(&self) -> Option<Color32> {
        self.color
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn delete_enabled(&self) -> bool {
        self.delete_enabled
    }

    pub fn set_delete_enabled(&mut self, enabled: bool) {
        self.delete_enabled = enabled;
    }

    /// Reassign position and recompute the badge color from the palette.
    /// Filter values are untouched.
    pub fn update_index(&mut self, new_index: usize, palette: &[Color32]) {
        self.index = new_index;
        self.color = palette.get(new_index).copied();
    }

    /// Update the displayed result count; zero renders in the alert state.
    pub fn update_count(&mut self, count: u64) {
        self.count = count;
    }

    /// Mapping from filter-kind key to the element's current values, plus the
    /// row's position under INDEX_KEY.
    pub fn data(&self) -> RowData {
        let mut data = RowData::new();
        for (kind, element) in &self.elements {
            data.insert(kind.key().to_string(), element.values());
        }
        data.insert(INDEX_KEY.to_string(), vec![self.index.to_string()]);
        data
    }

    pub fn on_change(&mut self, tx: mpsc::Sender<()>) {
        self.changed.connect(tx);
    }

    pub fn on_delete(&mut self, tx: mpsc::Sender<RowId>) {
        self.delete_subscribers.push(tx);
    }

    /// Mutable access to one child element (e.g. for programmatic edits).
    pub fn element_mut(&mut self, kind: FilterKind) -> &mut dyn FilterElement {
        self.elements
            .iter_mut()
            .find(|(k, _)| *k == kind)
            .map(|(_, e)| e.as_mut())
            .expect("every FilterKind has an element")
    }

    /// Emit the one-shot delete signal. The panel removes the row; the row
    /// itself never decides whether deletion is allowed.
    pub fn request_delete(&self) {
        for tx in &self.delete_subscribers {
            let _ = tx.send(self.id);
        }
    }

    /// Coalesce pending child change signals into at most one row emission.
    pub fn pump(&mut self) {
        let mut any = false;
        while self.element_rx.try_recv().is_ok() {
            any = true;
        }
        if any {
            self.changed.emit();
        }
    }

    pub fn show(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let delete = ui.add_enabled(
                self.delete_enabled,
                egui::Button::new(RichText::new("✖").size(12.0)),
            );
            if delete.clicked() {
                self.request_delete();
            }

            self.show_badge(ui);

            for (_, element) in &mut self.elements {
                element.show(ui);
            }

            self.show_count(ui);
        });

        self.pump();
    }

    fn show_badge(&self, ui: &mut Ui) {
        let (rect, _) =
            ui.allocate_exact_size(Vec2::splat(filter::BADGE_SIZE), Sense::hover());
        let fill = self.color.unwrap_or(Color32::from_gray(70));
        ui.painter()
            .rect(rect, Rounding::same(filter::ROUNDING), fill, Stroke::NONE);
        // Badge shows the 1-based position; the payload index stays 0-based.
        ui.painter().text(
            rect.center(),
            Align2::CENTER_CENTER,
            (self.index + 1).to_string(),
            FontId::proportional(12.0),
            Color32::WHITE,
        );
    }

    fn show_count(&self, ui: &mut Ui) {
        let (bg, fg) = if self.count == 0 {
            (Color32::from_rgb(90, 35, 35), Color32::from_rgb(240, 170, 170))
        } else {
            (Color32::from_rgb(35, 55, 90), Color32::from_rgb(170, 205, 240))
        };
        egui::Frame::none()
            .fill(bg)
            .rounding(Rounding::same(filter::ROUNDING))
            .inner_margin(egui::Margin::symmetric(8.0, 4.0))
            .show(ui, |ui| {
                ui.label(RichText::new(format!("{} hits", self.count)).color(fg).size(12.0));
            });
    }
}
