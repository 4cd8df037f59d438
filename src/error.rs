//! Error handling for the HMI player
//!
//! This module defines the error types and a Result alias used throughout
//! the crate. Most failures in the player are recoverable and only logged;
//! the variants here are what the recoverable paths log and what the fatal
//! startup path reports.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for HMI player operations
#[derive(Error, Debug)]
pub enum HmiError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// The scene document could not be read or parsed as a whole
    #[error("Scene document error: {0}")]
    SceneDocument(String),

    /// A single scene descriptor could not be built
    #[error("Descriptor #{index}: {message}")]
    Descriptor { index: usize, message: String },

    /// A control's action descriptor was malformed
    #[error("Action error: {0}")]
    Action(#[from] ActionParseError),

    /// An asset (image) could not be resolved from any candidate
    #[error("Asset error: {0}")]
    Asset(String),

    /// No usable typeface was found; fatal at startup
    #[error("No font could be loaded (tried {} paths)", tried.len())]
    FontUnavailable { tried: Vec<PathBuf> },

    /// Errors related to the persisted variable snapshot
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<HmiError>,
    },
}

impl HmiError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        HmiError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Reasons an action descriptor string is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionParseError {
    #[error("malformed set_variable descriptor '{0}'")]
    SetVariable(String),

    #[error("malformed toggle_variable descriptor '{0}'")]
    ToggleVariable(String),

    #[error("toggle_variable '{descriptor}' has negative max {max}")]
    NegativeToggleMax { descriptor: String, max: i64 },
}

/// Result type alias for HMI player operations
pub type Result<T> = std::result::Result<T, HmiError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<HmiError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| HmiError::with_context(e.into(), context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| HmiError::with_context(e.into(), f()))
    }
}
