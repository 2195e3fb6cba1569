use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommissionsError {
    #[error("Config directory not found at {0}. Run 'commissions init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("No sales rep specified. Use --user <id> or set report.default_user_id in config.toml.")]
    MissingUser,

    #[error("Invalid month '{0}'. Expected a number from 1 to 12.")]
    InvalidMonth(u32),

    #[error("Invalid year range {from}..{to}: from year must not be after to year")]
    InvalidYearRange { from: i32, to: i32 },

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("Unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to load commissions: {0}")]
    LoadAborted(Box<CommissionsError>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CommissionsError>;
