use std::time::Duration;

use thiserror::Error;

// === ScriptExecutionError ===

/// Errors from injecting a script into a tab's content view.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptExecutionError {
    /// The adapter cannot run scripts (cross-origin iframe).
    #[error("Script execution is not supported by this webview")]
    Unsupported,
    /// No live webview is registered for the tab.
    #[error("No webview attached to tab: {0}")]
    Detached(String),
    /// The tab was closed or its webview swapped before the result arrived.
    #[error("Script result discarded for tab: {0}")]
    Discarded(String),
    /// The injected script threw or the host rejected it.
    #[error("Script failed: {0}")]
    Script(String),
}

// === PolicyCheckError ===

/// Failures talking to the focus-mode backend. The navigation gate never
/// surfaces these to the user; it fails open.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyCheckError {
    /// Transport failure (connection refused, reset, DNS...).
    #[error("Focus backend unreachable: {0}")]
    Network(String),
    /// No answer within the configured bound.
    #[error("Focus check timed out after {0:?}")]
    Timeout(Duration),
    /// Non-success HTTP status.
    #[error("Focus backend returned status {0}")]
    Status(u16),
    /// Response body did not match the expected shape.
    #[error("Malformed focus response: {0}")]
    Decode(String),
}

impl PolicyCheckError {
    /// Classifies a transport error. `timeout` is the client-side request
    /// bound, reported when reqwest gave up waiting.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            PolicyCheckError::Timeout(timeout)
        } else if err.is_decode() {
            PolicyCheckError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            PolicyCheckError::Status(status.as_u16())
        } else {
            PolicyCheckError::Network(err.to_string())
        }
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    Io(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    Serialization(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === ClientError ===

/// Errors building the HTTP client for the focus backend.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid backend URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}
