mod settings;

pub use settings::{ApiSettings, Config, ReportSettings, WatchSettings, DEFAULT_BASE_URL};

use crate::error::{CommissionsError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `api.base_url`
pub const BASE_URL_ENV: &str = "COMMISSIONS_API_BASE_URL";

/// Get the config directory path (~/.commissions/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "commissions") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.commissions/
    let home = dirs_home().ok_or_else(|| {
        CommissionsError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".commissions"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Load config.toml from the config directory
pub fn load_config(config_dir: &Path) -> Result<Config> {
    if !config_dir.exists() {
        return Err(CommissionsError::ConfigNotFound(config_dir.to_path_buf()));
    }
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(CommissionsError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| CommissionsError::ConfigParse { path, source: e })
}

/// Load config.toml, or built-in defaults when the directory was never initialized.
/// The base URL environment override is applied either way.
pub fn resolve_config(config_dir: &Path) -> Result<Config> {
    let mut config = if config_dir.exists() {
        load_config(config_dir)?
    } else {
        log::info!(
            "No config at {}, using built-in defaults",
            config_dir.display()
        );
        Config::default()
    };

    if let Ok(url) = std::env::var(BASE_URL_ENV) {
        if !url.trim().is_empty() {
            config.api.base_url = url.trim().to_string();
        }
    }

    Ok(config)
}

/// Write the template config into a fresh config directory
pub fn init_config_dir(config_dir: &Path) -> Result<PathBuf> {
    if config_dir.exists() {
        return Err(CommissionsError::AlreadyInitialized(
            config_dir.to_path_buf(),
        ));
    }

    fs::create_dir_all(config_dir)?;
    let path = config_dir.join("config.toml");
    fs::write(&path, CONFIG_TEMPLATE)?;
    Ok(path)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[api]
base_url = "http://127.0.0.1:5001"   # overridden by COMMISSIONS_API_BASE_URL
# timeout_secs = 30                  # optional, no timeout by default
strict = false                       # true: fail the load instead of showing zeros

[report]
currency_symbol = "$"
# default_user_id = 1                # used when --user is omitted
default_view = "yearly"              # yearly, monthly or weekly

[watch]
interval_secs = 60
"#;
