use eframe::egui::{self, Color32};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::{config, rt};
use crate::filters::{FilterOptions, RowData};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid color token {0:?}")]
    Color(String),
}

async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
    Ok(reqwest::get(url)
        .await?
        .error_for_status()?
        .json::<T>()
        .await?)
}

fn parse_palette(tokens: Vec<String>) -> Result<Vec<Color32>, FetchError> {
    tokens
        .into_iter()
        .map(|t| Color32::from_hex(&t).map_err(|_| FetchError::Color(t)))
        .collect()
}

impl super::DashApp {
    /// Fire-and-forget fetch of the filter-option template. Failure is
    /// logged; the panel simply stays in the Loading state.
    pub(super) fn start_fetch_options(&self, ctx: &egui::Context) {
        let tx = self.net.options_tx.clone();
        let ctx2 = ctx.clone();
        let url = format!("{}/filter-options", config::base_url());
        rt().spawn(async move {
            let res = fetch_json::<FilterOptions>(&url).await;
            if let Err(e) = &res {
                log::error!("Filter options fetch failed: {e}");
            }
            let _ = tx.send(res);
            ctx2.request_repaint();
        });
    }

    /// Fire-and-forget fetch of the color palette. Independent of the options
    /// fetch; completion order is unspecified and the panel tolerates either.
    pub(super) fn start_fetch_palette(&self, ctx: &egui::Context) {
        let tx = self.net.palette_tx.clone();
        let ctx2 = ctx.clone();
        let url = format!("{}/colors", config::base_url());
        rt().spawn(async move {
            let res = fetch_json::<Vec<String>>(&url).await.and_then(parse_palette);
            if let Err(e) = &res {
                log::error!("Color palette fetch failed: {e}");
            }
            let _ = tx.send(res);
            ctx2.request_repaint();
        });
    }

    /// POST the aggregate filter payload and receive per-row result counts.
    /// Responses are tagged with a request id so stale ones can be dropped.
    pub(super) fn start_query(&mut self, ctx: &egui::Context, payload: Vec<RowData>) {
        self.net.loading = true;
        self.net.counter = self.net.counter.wrapping_add(1);
        let req_id = self.net.counter;

        let tx = self.net.counts_tx.clone();
        let ctx2 = ctx.clone();
        let url = format!("{}/filter-counts/", config::base_url());
        rt().spawn(async move {
            let res = async {
                let counts = reqwest::Client::new()
                    .post(&url)
                    .json(&payload)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<Vec<u64>>()
                    .await?;
                Ok::<_, FetchError>(counts)
            }
            .await;
            if let Err(e) = &res {
                log::error!("Count query failed: {e}");
            }
            let _ = tx.send((req_id, res));
            ctx2.request_repaint();
        });
    }

    /// Poll incoming async messages and update state accordingly.
    pub(super) fn poll_incoming(&mut self, ctx: &egui::Context) {
        while let Ok(res) = self.net.options_rx.try_recv() {
            match res {
                Ok(options) => {
                    log::info!(
                        "Filter options loaded: {} countries, {} continents, {} pages",
                        options.countries.len(),
                        options.continents.len(),
                        options.page_names.len()
                    );
                    self.panel.set_options(options);
                }
                Err(e) => {
                    // No retry; the add affordance stays disabled.
                    self.net.last_error = Some(e.to_string());
                }
            }
            ctx.request_repaint();
        }

        while let Ok(res) = self.net.palette_rx.try_recv() {
            match res {
                Ok(palette) => {
                    log::info!("Color palette loaded: {} colors", palette.len());
                    self.panel.set_palette(palette);
                }
                Err(e) => {
                    // Rows keep their stale/empty colors.
                    log::warn!("Keeping current palette: {e}");
                }
            }
            ctx.request_repaint();
        }

        while let Ok((req_id, res)) = self.net.counts_rx.try_recv() {
            if req_id != self.net.counter {
                continue;
            }
            self.net.loading = false;
            match res {
                Ok(counts) => {
                    self.net.last_error = None;
                    self.panel.apply_result_counts(&counts);
                    self.last_counts = counts;
                }
                Err(e) => {
                    self.net.last_error = Some(e.to_string());
                }
            }
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_palette;

    #[test]
    fn parses_hex_palette_tokens() {
        let palette =
            parse_palette(vec!["#4c78a8".to_string(), "#f58518".to_string()]).unwrap();
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn rejects_malformed_color_token() {
        assert!(parse_palette(vec!["not-a-color".to_string()]).is_err());
    }
}
