//! Configuration management for the loan advisory pipeline
//!
//! Supports loading configuration from:
//! - TOML files
//! - Environment variables (LOAN_ADVISOR_ prefix)
//! - Runtime overrides

pub mod settings;

pub use settings::{
    AgentSettings, GeminiSettings, MistralSettings, SarvamSettings, ServerSettings,
    ServicesSettings, Settings, load_settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
