use std::cell::RefCell;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::sync::broadcast;

use super::{WebviewAdapter, EVENT_BUFFER};
use crate::types::errors::ScriptExecutionError;
use crate::types::webview::{LoadFailure, NativeWebviewEvent, WebviewEvent, WebviewKind};

/// Generic net error used when the host refuses a load outright.
pub const ERR_FAILED: i32 = -2;

/// The native embedded webview as the platform exposes it.
#[async_trait(?Send)]
pub trait EmbeddedHost {
    fn load_url(&self, url: &str) -> Result<(), String>;
    async fn evaluate_script(&self, code: &str) -> Result<String, String>;
}

/// Adapter over a native embedded webview: full script execution and
/// fine-grained navigation events.
pub struct EmbeddedWebview<H: EmbeddedHost> {
    host: H,
    events: broadcast::Sender<WebviewEvent>,
    committed_url: RefCell<Option<String>>,
}

impl<H: EmbeddedHost> EmbeddedWebview<H> {
    pub fn new(host: H) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            host,
            events,
            committed_url: RefCell::new(None),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Translates a raw host event into zero or one normalized events.
    pub fn handle_native_event(&self, event: NativeWebviewEvent) {
        let normalized = match event {
            NativeWebviewEvent::StartLoading { url } => Some(WebviewEvent::NavigationStarted { url }),
            NativeWebviewEvent::Navigate { url } => self.commit(url),
            NativeWebviewEvent::NavigateInPage { url, is_main_frame } => {
                if is_main_frame {
                    self.commit(url)
                } else {
                    None
                }
            }
            NativeWebviewEvent::TitleUpdated { title } => {
                if title.is_empty() {
                    None
                } else {
                    Some(WebviewEvent::TitleChanged { title })
                }
            }
            NativeWebviewEvent::FailLoad(failure) => {
                if failure.is_suppressed() {
                    debug!("ignoring load failure {} for {}", failure.code, failure.url);
                    None
                } else {
                    warn!(
                        "webview failed to load {}: {} ({})",
                        failure.url, failure.description, failure.code
                    );
                    Some(WebviewEvent::LoadFailed(failure))
                }
            }
            NativeWebviewEvent::StopLoading => Some(WebviewEvent::LoadFinished),
        };

        if let Some(event) = normalized {
            let _ = self.events.send(event);
        }
    }

    fn commit(&self, url: String) -> Option<WebviewEvent> {
        let mut committed = self.committed_url.borrow_mut();
        if committed.as_deref() == Some(url.as_str()) {
            return None;
        }
        *committed = Some(url.clone());
        Some(WebviewEvent::NavigationCommitted { url })
    }
}

#[async_trait(?Send)]
impl<H: EmbeddedHost> WebviewAdapter for EmbeddedWebview<H> {
    fn kind(&self) -> WebviewKind {
        WebviewKind::Embedded
    }

    fn load(&self, url: &str) {
        debug!("embedded webview loading {}", url);
        match self.host.load_url(url) {
            // The page commit for a requested load is already known.
            Ok(()) => *self.committed_url.borrow_mut() = Some(url.to_string()),
            Err(description) => {
                warn!("embedded webview refused {}: {}", url, description);
                let _ = self.events.send(WebviewEvent::LoadFailed(LoadFailure {
                    code: ERR_FAILED,
                    description,
                    url: url.to_string(),
                }));
            }
        }
    }

    async fn execute_script(&self, code: &str) -> Result<String, ScriptExecutionError> {
        self.host
            .evaluate_script(code)
            .await
            .map_err(ScriptExecutionError::Script)
    }

    fn subscribe(&self) -> broadcast::Receiver<WebviewEvent> {
        self.events.subscribe()
    }
}
