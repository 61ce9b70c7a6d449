use serde::{Deserialize, Serialize};

/// Chromium net error for a load cancelled by the user or a new navigation.
pub const ERR_ABORTED: i32 = -3;
/// Chromium net error for a load blocked by the client (e.g. an ad blocker).
pub const ERR_BLOCKED_BY_CLIENT: i32 = -27;

/// Which platform surface backs an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebviewKind {
    /// Native embedded webview with script access.
    Embedded,
    /// Sandboxed iframe; cross-origin content cannot be scripted.
    Frame,
}

/// What an adapter can actually do. Callers branch on this instead of
/// discovering failures at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub supports_script_execution: bool,
}

impl WebviewKind {
    pub fn capabilities(self) -> Capabilities {
        match self {
            WebviewKind::Embedded => Capabilities {
                supports_script_execution: true,
            },
            WebviewKind::Frame => Capabilities {
                supports_script_execution: false,
            },
        }
    }
}

/// Failed load as reported by the content view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadFailure {
    pub code: i32,
    pub description: String,
    pub url: String,
}

impl LoadFailure {
    /// User-cancelled and client-blocked loads are not failures.
    pub fn is_suppressed(&self) -> bool {
        matches!(self.code, ERR_ABORTED | ERR_BLOCKED_BY_CLIENT)
    }
}

/// Normalized lifecycle events produced by every adapter variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebviewEvent {
    NavigationStarted { url: String },
    NavigationCommitted { url: String },
    TitleChanged { title: String },
    LoadFailed(LoadFailure),
    LoadFinished,
}

/// Raw events as the embedded webview host emits them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeWebviewEvent {
    StartLoading { url: String },
    Navigate { url: String },
    NavigateInPage { url: String, is_main_frame: bool },
    TitleUpdated { title: String },
    FailLoad(LoadFailure),
    StopLoading,
}
