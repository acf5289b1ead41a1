// Async fetch wiring extracted from app.rs to keep the update loop readable.

use std::sync::mpsc;

use eframe::egui::Color32;

use super::fetch::FetchError;
use crate::filters::FilterOptions;

pub struct NetState {
    /// Request id counter for count queries; stale responses are dropped.
    pub counter: u64,
    pub loading: bool,
    pub last_error: Option<String>,
    pub options_tx: mpsc::Sender<Result<FilterOptions, FetchError>>,
    pub options_rx: mpsc::Receiver<Result<FilterOptions, FetchError>>,
    pub palette_tx: mpsc::Sender<Result<Vec<Color32>, FetchError>>,
    pub palette_rx: mpsc::Receiver<Result<Vec<Color32>, FetchError>>,
    pub counts_tx: mpsc::Sender<(u64, Result<Vec<u64>, FetchError>)>,
    pub counts_rx: mpsc::Receiver<(u64, Result<Vec<u64>, FetchError>)>,
}

impl NetState {
    pub fn new() -> Self {
        let (options_tx, options_rx) = mpsc::channel();
        let (palette_tx, palette_rx) = mpsc::channel();
        let (counts_tx, counts_rx) = mpsc::channel();
        Self {
            counter: 0,
            loading: false,
            last_error: None,
            options_tx,
            options_rx,
            palette_tx,
            palette_rx,
            counts_tx,
            counts_rx,
        }
    }
}
