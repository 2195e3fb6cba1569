use serde::{Deserialize, Serialize};

use crate::commission::ViewMode;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub watch: WatchSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. Requests wait on the platform's own timeout when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Propagate fetch failures instead of substituting zero-valued defaults
    #[serde(default)]
    pub strict: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            strict: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReportSettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub default_user_id: Option<i64>,
    #[serde(default)]
    pub default_view: ViewMode,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            default_user_id: None,
            default_view: ViewMode::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WatchSettings {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_interval_secs() -> u64 {
    60
}
