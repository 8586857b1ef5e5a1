//! # Error Types
//!
//! Custom error types for GamePad to Mouse using `thiserror`.

use thiserror::Error;

/// Main error type for GamePad to Mouse
#[derive(Debug, Error)]
pub enum GamepadMouseError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings store (de)serialization errors
    #[error("Settings store error: {0}")]
    Store(#[from] serde_json::Error),

    /// Controller access errors
    #[error("Controller error: {0}")]
    Controller(String),

    /// Synthetic input device errors
    #[error("Output device error: {0}")]
    Output(String),

    /// Missing access to `/dev/uinput` or `/dev/input`
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Autostart registration errors
    #[error("Autostart error: {0}")]
    Autostart(String),
}

/// Result type alias for GamePad to Mouse
pub type Result<T> = std::result::Result<T, GamepadMouseError>;
