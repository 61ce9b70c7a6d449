//! App core.
//!
//! Composition root holding the settings engine, the tab registry, the
//! navigation gate and the shell event router for one application session.

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::managers::tab_manager::{TabManager, TabManagerTrait};
use crate::navigation::gate::NavigationGate;
use crate::services::focus_client::{FocusClient, FocusPolicy};
use crate::services::poller::ScopedPoller;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::shell::router::ShellEventRouter;
use crate::types::events::ShellNotification;

/// Central application struct wiring the browser core together.
pub struct App<P: FocusPolicy = FocusClient> {
    pub settings_engine: SettingsEngine,
    pub tabs: Rc<RefCell<TabManager>>,
    pub gate: Rc<NavigationGate<P>>,
    pub router: ShellEventRouter<P>,
    pub notifications: UnboundedReceiver<ShellNotification>,
}

impl App<FocusClient> {
    /// Loads settings (from `config_path` or the platform default) and
    /// connects the gate to the HTTP focus backend.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(config_path);
        let settings = settings_engine.load()?;
        let client = FocusClient::new(&settings.backend)?;
        info!("focus backend at {}", client.base_url());
        Ok(Self::with_policy(settings_engine, client))
    }
}

impl<P: FocusPolicy> App<P> {
    /// Builds the core around an already loaded settings engine and any
    /// focus policy implementation.
    pub fn with_policy(settings_engine: SettingsEngine, policy: P) -> Self {
        let settings = settings_engine.get_settings().clone();
        let tabs = Rc::new(RefCell::new(TabManager::new()));
        let gate = Rc::new(NavigationGate::new(policy, Rc::clone(&tabs), &settings));
        let (router, notifications) = ShellEventRouter::new(
            Rc::clone(&gate),
            Duration::from_millis(settings.navigation.dedup_window_ms),
        );
        Self {
            settings_engine,
            tabs,
            gate,
            router,
            notifications,
        }
    }

    /// Startup sequence: make sure a tab exists and pick up a focus session
    /// that is still active on the backend.
    pub async fn startup(&mut self) {
        if self.tabs.borrow().tab_count() == 0 {
            self.tabs.borrow_mut().add_tab(None);
        }
        let focused = self.gate.sync_focus_mode().await;
        info!("startup complete, focus mode {}", if focused { "on" } else { "off" });
    }

    /// Starts the periodic focus-status refresh. Ticks arrive on the returned
    /// receiver and are answered on this thread with
    /// [`NavigationGate::sync_focus_mode`]. Dropping the poller, or the
    /// receiver, stops it.
    pub fn focus_status_poller(&self) -> (ScopedPoller, UnboundedReceiver<()>) {
        let (ticks, rx) = mpsc::unbounded_channel();
        let period = Duration::from_millis(self.settings_engine.get_settings().polling.interval_ms);
        let poller = ScopedPoller::start("focus-status", period, move || {
            let ticks = ticks.clone();
            async move {
                if ticks.send(()).is_err() {
                    debug!("focus status receiver dropped, stopping poller");
                    return ControlFlow::Break(());
                }
                ControlFlow::Continue(())
            }
        });
        (poller, rx)
    }
}
