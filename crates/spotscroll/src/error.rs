//! Scroll engine error types
//!
//! Input handling never fails; these cover setup only.

use thiserror::Error;

/// Errors raised while configuring a scroller
#[derive(Error, Debug)]
pub enum ScrollError {
    /// A configuration value is out of range
    #[error("Invalid scroll configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text is not valid TOML for `ScrollConfig`
    #[error("Failed to parse scroll configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration file could not be read
    #[error("Failed to read scroll configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for scroll engine setup
pub type Result<T> = std::result::Result<T, ScrollError>;
