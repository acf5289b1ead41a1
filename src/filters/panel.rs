use std::sync::mpsc;

use eframe::egui::{self, Color32, RichText, Ui};

use super::row::{FilterRow, RowId};
use super::{FilterOptions, RowData};
use crate::ui_constants::{spacing, MAX_FILTER_ROWS};

/// Owns the ordered list of filter rows and enforces the lifecycle
/// invariants: row count in [1, MAX_FILTER_ROWS] once the options template
/// has arrived, contiguous 0-based indices after every mutation, delete
/// disabled on a singleton row, add disabled while loading or at capacity.
///
/// The options template and the color palette arrive independently and in
/// unspecified order; `set_options` and `set_palette` are both idempotent
/// "apply latest known state" operations, so recoloring is safe at any point
/// in the row lifecycle.
pub struct FilterPanel {
    options: Option<FilterOptions>,
    palette: Vec<Color32>,
    rows: Vec<FilterRow>,
    row_change_tx: mpsc::Sender<()>,
    row_change_rx: mpsc::Receiver<()>,
    delete_tx: mpsc::Sender<RowId>,
    delete_rx: mpsc::Receiver<RowId>,
    data_subscribers: Vec<mpsc::Sender<Vec<RowData>>>,
    resize_subscribers: Vec<mpsc::Sender<()>>,
}

impl FilterPanel {
    pub fn new() -> Self {
        let (row_change_tx, row_change_rx) = mpsc::channel();
        let (delete_tx, delete_rx) = mpsc::channel();
        Self {
            options: None,
            palette: Vec::new(),
            rows: Vec::new(),
            row_change_tx,
            row_change_rx,
            delete_tx,
            delete_rx,
            data_subscribers: Vec::new(),
            resize_subscribers: Vec::new(),
        }
    }

    /// Template arrived: leave the Loading state and create the first row.
    pub fn set_options(&mut self, options: FilterOptions) {
        self.options = Some(options);
        if self.rows.is_empty() {
            self.add_row();
        }
    }

    /// Palette arrived (possibly after rows already exist): store it and
    /// retroactively recolor/reindex every row.
    pub fn set_palette(&mut self, palette: Vec<Color32>) {
        self.palette = palette;
        self.refresh_rows();
    }

    pub fn is_ready(&self) -> bool {
        self.options.is_some()
    }

    pub fn can_add(&self) -> bool {
        self.options.is_some() && self.rows.len() < MAX_FILTER_ROWS
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[FilterRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [FilterRow] {
        &mut self.rows
    }

    /// Append a new row built from the stored template, wire its change and
    /// delete signals, then emit resize followed by data-change.
    pub fn add_row(&mut self) {
        let Some(options) = &self.options else {
            log::warn!("add_row ignored: filter options not loaded yet");
            return;
        };
        if self.rows.len() >= MAX_FILTER_ROWS {
            log::warn!("add_row ignored: already at {MAX_FILTER_ROWS} rows");
            return;
        }

        let mut row = FilterRow::new(options, self.rows.len(), &self.palette);
        row.on_change(self.row_change_tx.clone());
        row.on_delete(self.delete_tx.clone());
        self.rows.push(row);

        self.emit_resize();
        self.emit_data_change();
    }

    /// Each row's data in row order (which equals current index order).
    pub fn aggregate_data(&self) -> Vec<RowData> {
        self.rows.iter().map(|row| row.data()).collect()
    }

    /// Re-derive and publish the aggregate to all data subscribers.
    pub fn emit_data_change(&self) {
        let data = self.aggregate_data();
        for tx in &self.data_subscribers {
            let _ = tx.send(data.clone());
        }
    }

    /// Recompute affordance states and index/color assignments, then publish
    /// a payload-less resize signal for layout consumers.
    pub fn emit_resize(&mut self) {
        let deletable = self.rows.len() > 1;
        for row in &mut self.rows {
            row.set_delete_enabled(deletable);
        }
        self.refresh_rows();
        for tx in &self.resize_subscribers {
            let _ = tx.send(());
        }
    }

    /// Full rebuild of index/color assignments: walk rows in list order and
    /// assign 0, 1, 2, ... contiguously. Never patch incrementally.
    fn refresh_rows(&mut self) {
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.update_index(i, &self.palette);
        }
    }

    /// Push consumer-supplied result counts into rows positionally. A length
    /// mismatch is tolerated: pairs are applied up to the shorter sequence.
    pub fn apply_result_counts(&mut self, counts: &[u64]) {
        if counts.len() != self.rows.len() {
            log::warn!(
                "result count length {} does not match row count {}",
                counts.len(),
                self.rows.len()
            );
        }
        for (row, &count) in self.rows.iter_mut().zip(counts) {
            row.update_count(count);
        }
    }

    pub fn on_data_change(&mut self, tx: mpsc::Sender<Vec<RowData>>) {
        self.data_subscribers.push(tx);
    }

    pub fn on_resize(&mut self, tx: mpsc::Sender<()>) {
        self.resize_subscribers.push(tx);
    }

    /// Process pending row signals: deletions first (remove, re-derive
    /// indices/colors/affordances, re-emit aggregate), then value changes
    /// (coalesced into at most one aggregate emission). Callable without a
    /// `Ui` so the lifecycle machinery runs headless.
    pub fn pump(&mut self) {
        for row in &mut self.rows {
            row.pump();
        }

        let mut structure_changed = false;
        while let Ok(id) = self.delete_rx.try_recv() {
            if self.rows.len() <= 1 {
                log::warn!("ignoring delete for row {id}: at least one row must remain");
                continue;
            }
            let before = self.rows.len();
            self.rows.retain(|row| row.id() != id);
            if self.rows.len() != before {
                structure_changed = true;
            }
        }
        if structure_changed {
            self.emit_resize();
            self.emit_data_change();
        }

        let mut value_changed = false;
        while self.row_change_rx.try_recv().is_ok() {
            value_changed = true;
        }
        // A structural change already re-emitted the aggregate this frame.
        if value_changed && !structure_changed {
            self.emit_data_change();
        }
    }

    pub fn show(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Filters").strong());
        ui.separator();

        for row in &mut self.rows {
            row.show(ui);
            ui.add_space(spacing::SMALL);
        }

        if !self.is_ready() {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                ui.label(RichText::new("Loading filter options...").weak());
            });
        }

        ui.add_space(spacing::MEDIUM);
        if ui
            .add_enabled(self.can_add(), egui::Button::new("Add Filter"))
            .clicked()
        {
            self.add_row();
        }

        self.pump();
    }
}

impl Default for FilterPanel {
    fn default() -> Self {
        Self::new()
    }
}
