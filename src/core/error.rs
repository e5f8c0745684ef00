//! Custom error types for uishots
//!
//! One error enum for the whole run. Every variant is fatal to the run that
//! raised it; page-side errors are only logged and never end up here.

use std::path::PathBuf;

use chromiumoxide::error::CdpError;
use thiserror::Error;

/// Main error type for screenshot runs
#[derive(Error, Debug)]
pub enum ShotError {
    /// The browser process could not be started
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    /// Browser automation errors
    #[error("Browser error: {0}")]
    Browser(String),

    /// DevTools protocol errors
    #[error("DevTools error: {0}")]
    Cdp(#[from] CdpError),

    /// A waited-for element never appeared
    #[error("Timed out after {timeout_ms}ms waiting for {target}")]
    ElementNotFound { target: String, timeout_ms: u64 },

    /// The built UI entry point does not exist
    #[error("UI bundle not found at {}", .0.display())]
    BundleNotFound(PathBuf),

    /// The page called a stub that is not registered
    #[error("Unknown stub '{0}'")]
    UnknownStub(String),

    /// A stub was called with arguments it cannot handle
    #[error("Stub error: {0}")]
    Stub(String),

    /// Invalid scenario content
    #[error("Scenario error: {0}")]
    Scenario(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for uishots operations
pub type Result<T> = std::result::Result<T, ShotError>;

impl ShotError {
    /// Create a launch error
    pub fn launch(msg: impl Into<String>) -> Self {
        Self::Launch(msg.into())
    }

    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Create a stub error
    pub fn stub(msg: impl Into<String>) -> Self {
        Self::Stub(msg.into())
    }

    /// Create a scenario error
    pub fn scenario(msg: impl Into<String>) -> Self {
        Self::Scenario(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an element-not-found error
    pub fn not_found(target: impl Into<String>, timeout_ms: u64) -> Self {
        Self::ElementNotFound {
            target: target.into(),
            timeout_ms,
        }
    }

    /// Wrap an error with additional context
    pub fn with_context<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ShotError::not_found("button 'Settings'", 30000);
        assert_eq!(
            err.to_string(),
            "Timed out after 30000ms waiting for button 'Settings'"
        );
    }

    #[test]
    fn test_context_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = ShotError::with_context("writing home-dark.png", io);
        assert_eq!(err.to_string(), "writing home-dark.png: read-only");
        assert!(std::error::Error::source(&err).is_some());
    }
}
