use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the dashboard backend serving /filter-options, /colors
    /// and /filter-counts/.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

lazy_static! {
    pub static ref APP_CONFIG: RwLock<AppConfig> = RwLock::new(AppConfig::default());
}

fn config_file_path() -> PathBuf {
    // Allow override for tests via env var
    if let Ok(p) = std::env::var("LOGDASH_CONFIG_PATH") {
        return PathBuf::from(p);
    }
    PathBuf::from("dash_config.json")
}

impl AppConfig {
    pub fn load_from_file(path: &std::path::Path) -> std::io::Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: AppConfig = serde_json::from_str(&data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(cfg)
    }
}

pub fn load_config_from_disk() {
    let path = config_file_path();
    match AppConfig::load_from_file(&path) {
        Ok(cfg) => {
            *APP_CONFIG.write().unwrap() = cfg;
            log::info!("Loaded config from {}", path.to_string_lossy());
        }
        Err(e) => {
            // Keep defaults if missing/unreadable
            log::info!(
                "Using default config; cannot load {}: {}",
                path.to_string_lossy(),
                e
            );
        }
    }
}

pub fn base_url() -> String {
    APP_CONFIG.read().unwrap().base_url.clone()
}
