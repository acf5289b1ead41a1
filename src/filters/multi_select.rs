use std::any::Any;
use std::sync::mpsc;

use eframe::egui::{
    self, pos2, Color32, Id, RichText, Rounding, ScrollArea, Sense, Stroke, TextEdit, Ui, Vec2,
};

use super::element::{ChangeSignal, FilterElement};
use crate::ui_constants::{filter, spacing};

/// Categorical multi-select with inline summary, popup list, search and
/// per-option checkboxes. Selection is a subset of the fixed vocabulary;
/// empty means "no restriction".
pub struct MultiSelect {
    label: String,
    key: String,
    options: Vec<String>,
    selected: Vec<bool>,
    changed: ChangeSignal,
}

impl MultiSelect {
    /// `key` must be stable and unique across all pickers in the UI.
    pub fn new(options: Vec<String>, label: &str, key: String) -> Self {
        let selected = vec![false; options.len()];
        Self {
            label: label.to_string(),
            key,
            options,
            selected,
            changed: ChangeSignal::new(),
        }
    }

    /// Programmatic toggle of one option, emitting the same change signal a
    /// click would. Returns false when the value is not in the vocabulary.
    pub fn toggle(&mut self, value: &str) -> bool {
        match self.options.iter().position(|o| o == value) {
            Some(i) => {
                self.selected[i] = !self.selected[i];
                self.changed.emit();
                true
            }
            None => false,
        }
    }

    fn selected_count(&self) -> usize {
        self.selected.iter().filter(|s| **s).count()
    }
}

impl FilterElement for MultiSelect {
    fn show(&mut self, ui: &mut Ui) {
        let rounding = Rounding::same(filter::ROUNDING);
        let border_color = Color32::from_gray(80);
        let container_bg = Color32::from_rgb(30, 30, 30);
        let hover_bg = Color32::from_rgba_premultiplied(255, 255, 255, 6);
        let accent = Color32::from_rgb(85, 130, 210);

        // Collapsed control
        let height = (ui.spacing().interact_size.y * 1.4).clamp(28.0, 40.0);
        let (container_rect, response) =
            ui.allocate_exact_size(Vec2::new(filter::ELEMENT_WIDTH, height), Sense::click());
        let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);
        let painter = ui.painter();

        painter.rect(
            container_rect,
            rounding,
            container_bg,
            Stroke::new(1.0, border_color),
        );
        if response.hovered() {
            painter.rect(
                container_rect.shrink2(Vec2::new(2.0, 2.0)),
                rounding,
                hover_bg,
                Stroke::NONE,
            );
        }

        // Summary text: placeholder while nothing is selected
        let n = self.selected_count();
        let (summary, text_color) = if n == 0 {
            (format!("Select {}", self.label), Color32::from_gray(140))
        } else {
            (format!("{} ({})", self.label, n), Color32::from_gray(210))
        };
        painter.text(
            pos2(
                container_rect.left() + spacing::MEDIUM,
                container_rect.center().y,
            ),
            egui::Align2::LEFT_CENTER,
            summary,
            egui::FontId::proportional(13.0),
            text_color,
        );

        // Open/close popup state
        let popup_id: Id = Id::new(("multi_select_popup", self.key.as_str()));
        let mut is_open = ui
            .memory(|m| m.data.get_temp::<bool>(popup_id))
            .unwrap_or(false);
        if response.clicked() {
            is_open = !is_open;
        }

        // Caret and active border depending on open state
        let cx = container_rect.right() - 14.0;
        let cy = container_rect.center().y + 1.0;
        let w = 8.0;
        let h = 5.0;
        let col = if is_open {
            Color32::from_gray(230)
        } else {
            Color32::from_gray(200)
        };
        if is_open {
            painter.line_segment(
                [pos2(cx - w * 0.5, cy + h * 0.5), pos2(cx, cy - h * 0.5)],
                Stroke::new(1.5, col),
            );
            painter.line_segment(
                [pos2(cx + w * 0.5, cy + h * 0.5), pos2(cx, cy - h * 0.5)],
                Stroke::new(1.5, col),
            );
            painter.rect_stroke(container_rect, rounding, Stroke::new(1.0, accent));
        } else {
            painter.line_segment(
                [pos2(cx - w * 0.5, cy - h * 0.5), pos2(cx, cy + h * 0.5)],
                Stroke::new(1.5, col),
            );
            painter.line_segment(
                [pos2(cx + w * 0.5, cy - h * 0.5), pos2(cx, cy + h * 0.5)],
                Stroke::new(1.5, col),
            );
        }

        // Popup with search and checkbox rows
        if is_open {
            let popup_pos = pos2(
                container_rect.left(),
                container_rect.bottom() + spacing::SMALL,
            );
            let popup_width = container_rect.width();

            let search_id: Id = Id::new(("multi_select_search", self.key.as_str()));
            let mut q = ui
                .memory(|m| m.data.get_temp::<String>(search_id))
                .unwrap_or_default();

            let MultiSelect {
                options,
                selected,
                changed,
                ..
            } = self;

            let inner = crate::views::ui_helpers::show_popup_area(
                ui,
                popup_id,
                popup_pos,
                popup_width,
                |ui| {
                    ui.add(
                        TextEdit::singleline(&mut q)
                            .hint_text("Search...")
                            .desired_width(popup_width - spacing::MEDIUM),
                    );
                    ui.separator();

                    let ql = q.to_lowercase();
                    ScrollArea::vertical()
                        .max_height(filter::POPUP_MAX_HEIGHT)
                        .show(ui, |ui| {
                            ui.set_width(popup_width - spacing::MEDIUM);
                            for (i, name) in options.iter().enumerate() {
                                if !ql.is_empty() && !name.to_lowercase().contains(&ql) {
                                    continue;
                                }
                                if ui
                                    .checkbox(
                                        &mut selected[i],
                                        RichText::new(name).color(Color32::from_gray(210)),
                                    )
                                    .changed()
                                {
                                    changed.emit();
                                }
                            }
                        });
                },
            );

            ui.memory_mut(|m| {
                m.data.insert_temp(search_id, q);
            });

            // Close when clicking anywhere outside the control and the popup
            let popup_rect = inner.response.rect;
            if crate::views::ui_helpers::clicked_outside(ui, &[popup_rect, container_rect]) {
                is_open = false;
            }
        }

        ui.memory_mut(|m| {
            m.data.insert_temp(popup_id, is_open);
        });
    }

    fn values(&self) -> Vec<String> {
        self.options
            .iter()
            .zip(&self.selected)
            .filter(|(_, sel)| **sel)
            .map(|(o, _)| o.clone())
            .collect()
    }

    fn on_change(&mut self, tx: mpsc::Sender<()>) {
        self.changed.connect(tx);
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
