//! Shared configuration for the `EchoLens` workspace.

mod app_config;
mod config;

pub use app_config::{AppConfig, Environment, ScoringMode};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
