use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Invalid(#[from] CoreError),

    #[error("Duplicate item identifier '{0}' across income and expense items")]
    DuplicateItemId(String),
}
