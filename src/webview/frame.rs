use std::cell::RefCell;

use async_trait::async_trait;
use log::debug;
use tokio::sync::broadcast;

use super::{WebviewAdapter, EVENT_BUFFER};
use crate::types::errors::ScriptExecutionError;
use crate::types::webview::{WebviewEvent, WebviewKind};

/// The sandboxed iframe the mobile shell renders pages into.
pub trait FrameHost {
    fn set_src(&self, url: &str);
}

/// Adapter over an iframe. Loads and reports what the frame exposes on load;
/// cross-origin content cannot be scripted.
pub struct FrameWebview<H: FrameHost> {
    host: H,
    events: broadcast::Sender<WebviewEvent>,
    src: RefCell<Option<String>>,
}

impl<H: FrameHost> FrameWebview<H> {
    pub fn new(host: H) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            host,
            events,
            src: RefCell::new(None),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Called from the frame's load callback. `location` and `title` are
    /// `None` when the browser hides them from a cross-origin document.
    pub fn handle_frame_loaded(&self, location: Option<&str>, title: Option<&str>) {
        if let Some(location) = location.filter(|l| !l.is_empty() && *l != "about:blank") {
            let mut src = self.src.borrow_mut();
            if src.as_deref() != Some(location) {
                *src = Some(location.to_string());
                let _ = self.events.send(WebviewEvent::NavigationCommitted {
                    url: location.to_string(),
                });
            }
        } else {
            debug!("frame location not readable, keeping {:?}", self.src.borrow());
        }

        if let Some(title) = title.filter(|t| !t.is_empty()) {
            let _ = self.events.send(WebviewEvent::TitleChanged {
                title: title.to_string(),
            });
        }

        let _ = self.events.send(WebviewEvent::LoadFinished);
    }
}

#[async_trait(?Send)]
impl<H: FrameHost> WebviewAdapter for FrameWebview<H> {
    fn kind(&self) -> WebviewKind {
        WebviewKind::Frame
    }

    fn load(&self, url: &str) {
        *self.src.borrow_mut() = Some(url.to_string());
        self.host.set_src(url);
        let _ = self.events.send(WebviewEvent::NavigationStarted {
            url: url.to_string(),
        });
    }

    async fn execute_script(&self, _code: &str) -> Result<String, ScriptExecutionError> {
        Err(ScriptExecutionError::Unsupported)
    }

    fn subscribe(&self) -> broadcast::Receiver<WebviewEvent> {
        self.events.subscribe()
    }
}
