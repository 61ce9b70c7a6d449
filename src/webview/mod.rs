//! Webview adapters.
//!
//! A [`WebviewAdapter`] normalizes one platform content surface into a common
//! contract: `load`, `execute_script` and a broadcast stream of
//! [`WebviewEvent`]s. Two variants exist:
//!
//! - [`EmbeddedWebview`] wraps a native embedded webview and can run scripts.
//! - [`FrameWebview`] wraps a sandboxed iframe; it only loads and reports
//!   titles, and `execute_script` always fails with
//!   [`ScriptExecutionError::Unsupported`].
//!
//! Callers should branch on [`WebviewAdapter::capabilities`] before relying on
//! script execution.

pub mod embedded;
pub mod frame;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::types::errors::ScriptExecutionError;
use crate::types::webview::{Capabilities, WebviewEvent, WebviewKind};

pub use embedded::{EmbeddedHost, EmbeddedWebview};
pub use frame::{FrameHost, FrameWebview};

/// Buffered events per subscriber before the slowest one starts lagging.
pub(crate) const EVENT_BUFFER: usize = 64;

/// Uniform contract over a platform content view.
#[async_trait(?Send)]
pub trait WebviewAdapter {
    fn kind(&self) -> WebviewKind;

    fn capabilities(&self) -> Capabilities {
        self.kind().capabilities()
    }

    /// Starts loading `url`. Failures are reported as `LoadFailed` events.
    fn load(&self, url: &str);

    /// Runs `code` in the page and resolves with its serialized result.
    async fn execute_script(&self, code: &str) -> Result<String, ScriptExecutionError>;

    /// Subscribes to normalized lifecycle events.
    fn subscribe(&self) -> broadcast::Receiver<WebviewEvent>;
}
