//! Shared data model and configuration for tweetsent.

pub mod accounts;
pub mod app_config;
pub mod config;
pub mod posts;

use thiserror::Error;

pub use accounts::{load_account_groups, parse_account_groups, AccountGroup, AccountGroups};
pub use app_config::{AppConfig, CollectSettings, TwitterCredentials};
pub use config::{load_app_config, load_app_config_from_env, load_collect_settings};
pub use posts::{EnrichedRecord, LexiconScores, PolarityClass, RawPost};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read accounts file {path}: {source}")]
    AccountsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse accounts file: {0}")]
    AccountsFileParse(#[from] serde_yaml::Error),

    #[error("accounts validation failed: {0}")]
    Validation(String),
}
