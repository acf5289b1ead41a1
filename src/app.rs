// App state and UI drawing. Async fetching lives in the fetch submodule,
// the filter composition engine in crate::filters.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use eframe::egui::{self, RichText};
use eframe::App;

pub mod config;
mod fetch;
mod logs_ui;
mod runtime;
mod state;

pub use fetch::FetchError;
pub use runtime::rt;

use crate::filters::{FilterPanel, RowData};
use crate::ui_constants::{spacing, QUERY_DEBOUNCE_MS};
use state::NetState;

/// The dashboard shell: hosts the filter panel, runs the backend query loop
/// as the panel's consumer, and feeds result counts back into the rows.
pub struct DashApp {
    panel: FilterPanel,
    net: NetState,
    data_rx: mpsc::Receiver<Vec<RowData>>,
    resize_rx: mpsc::Receiver<()>,
    // Debounced query scheduling: latest payload wins
    pending_query: Option<Vec<RowData>>,
    query_due_at: Option<Instant>,
    last_counts: Vec<u64>,
    started: bool,
}

impl Default for DashApp {
    fn default() -> Self {
        let mut panel = FilterPanel::new();
        let (data_tx, data_rx) = mpsc::channel();
        let (resize_tx, resize_rx) = mpsc::channel();
        panel.on_data_change(data_tx);
        panel.on_resize(resize_tx);
        Self {
            panel,
            net: NetState::new(),
            data_rx,
            resize_rx,
            pending_query: None,
            query_due_at: None,
            last_counts: Vec::new(),
            started: false,
        }
    }
}

impl App for DashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Any new logs? ensure we repaint to keep the logs window fresh
        if crate::logger::take_new_flag() {
            ctx.request_repaint();
        }

        // Kick off the two independent startup fetches exactly once; their
        // completion order is unspecified and the panel tolerates either.
        if !self.started {
            self.started = true;
            self.start_fetch_options(ctx);
            self.start_fetch_palette(ctx);
        }

        self.poll_incoming(ctx);

        // Right panel: the filter composition engine
        egui::SidePanel::right("filters_panel")
            .frame(
                egui::Frame::none()
                    .fill(egui::Color32::from_rgb(30, 30, 30))
                    .inner_margin(10.0),
            )
            .resizable(false)
            .show(ctx, |ui| {
                self.panel.show(ui);

                ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                    if ui.button("Logs").clicked() {
                        logs_ui::open_logs();
                        ctx.request_repaint();
                    }
                });
            });

        // Aggregate changes from the panel: debounce the backend query so a
        // burst of edits produces a single request.
        let mut latest: Option<Vec<RowData>> = None;
        while let Ok(data) = self.data_rx.try_recv() {
            latest = Some(data);
        }
        if let Some(data) = latest {
            self.pending_query = Some(data);
            self.query_due_at = Some(Instant::now() + Duration::from_millis(QUERY_DEBOUNCE_MS));
            ctx.request_repaint_after(Duration::from_millis(QUERY_DEBOUNCE_MS));
        }

        // Resize signals: row count changed, surrounding layout may adjust
        let mut resized = false;
        while self.resize_rx.try_recv().is_ok() {
            resized = true;
        }
        if resized {
            log::debug!("Filter panel resized to {} rows", self.panel.row_count());
            ctx.request_repaint();
        }

        // Run the debounced query once the deadline passed
        if let Some(due) = self.query_due_at {
            if Instant::now() >= due {
                self.query_due_at = None;
                if let Some(payload) = self.pending_query.take() {
                    self.start_query(ctx, payload);
                }
            }
        }

        // Central panel: query status and per-row hit counts (charts are
        // rendered elsewhere)
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(spacing::LARGE);
            ui.vertical_centered(|ui| {
                ui.heading("Traffic Dashboard");
            });
            ui.add_space(spacing::MEDIUM);

            if let Some(err) = &self.net.last_error {
                ui.vertical_centered(|ui| {
                    ui.colored_label(egui::Color32::RED, format!("Error: {}", err));
                });
            } else if self.net.loading {
                ui.vertical_centered(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label("Querying...");
                });
            } else if !self.panel.is_ready() {
                ui.vertical_centered(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label("Loading...");
                });
            } else {
                let total: u64 = self.last_counts.iter().sum();
                ui.label(format!(
                    "{} filter(s) active, {} hits total",
                    self.panel.row_count(),
                    total
                ));
                ui.add_space(spacing::SMALL);
                for row in self.panel.rows() {
                    let badge = RichText::new(format!("■ {}", row.index() + 1)).color(
                        row.color().unwrap_or(egui::Color32::from_gray(140)),
                    );
                    ui.horizontal(|ui| {
                        ui.label(badge);
                        ui.label(format!("{} hits", row.count()));
                    });
                }
            }
        });

        // Logs window (separate OS viewport)
        logs_ui::draw_logs_viewport(ctx);
    }
}
