//! Navigation gate.
//!
//! Every navigation (address bar, in-page commit, open-in-new-tab, shell
//! command) enters here. With focus mode off the gate is `Open` and allows
//! immediately; with focus mode on it is `Guarded` and asks the external
//! [`FocusPolicy`] first. A rejected check enters the `Blocked` sub-state and
//! the registry and webview are left untouched.
//!
//! Async results are tagged on issue and checked on resolution:
//! - a per-tab ticket makes the last-issued request win;
//! - a guard epoch drops verdicts that straddle a focus-mode toggle.
//!
//! Only applied verdicts are counted in [`FocusStats`]; every completed
//! check bumps `checked`. Policy failures and timeouts fail open.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::managers::script_runner;
use crate::managers::tab_manager::{TabManager, TabManagerTrait};
use crate::navigation::address::normalize_input;
use crate::services::focus_client::FocusPolicy;
use crate::types::errors::PolicyCheckError;
use crate::types::focus::{
    BlockedPage, FocusSessionRequest, FocusStats, UrlCheckRequest, DEFAULT_BLOCK_REASON,
};
use crate::types::settings::{SearchEngine, ShellSettings};
use crate::types::tab::DEFAULT_TAB_TITLE;
use crate::types::webview::WebviewEvent;
use crate::webview::WebviewAdapter;

/// Where a navigation request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationSource {
    /// Address bar, suggestion panel, programmatic request: the webview must load it.
    Requested,
    /// The webview already moved there (link click, redirect).
    PageCommitted,
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Allowed { tab_id: String, url: String },
    Blocked(BlockedPage),
    /// A later request for the same tab was issued before this one resolved.
    Superseded,
    /// Focus mode was toggled off and on again while the check was in flight.
    Discarded,
    /// The tab closed before the navigation could be applied.
    UnknownTab,
    /// Address-bar input was blank.
    EmptyInput,
}

impl NavigationOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, NavigationOutcome::Allowed { .. })
    }
}

#[derive(Debug, Clone)]
enum Target {
    Tab(String),
    NewTab,
}

enum Verdict {
    Allow,
    Block(BlockedPage),
    FailOpen,
}

#[derive(Debug, Default)]
struct GateState {
    focus_mode_active: bool,
    blocked: Option<BlockedPage>,
    guard_epoch: u64,
    next_ticket: u64,
    latest_ticket: HashMap<String, u64>,
    stats: FocusStats,
}

impl GateState {
    fn issue_ticket(&mut self, tab_id: &str) -> u64 {
        self.next_ticket += 1;
        self.latest_ticket.insert(tab_id.to_string(), self.next_ticket);
        self.next_ticket
    }

    fn is_latest(&self, tab_id: &str, ticket: u64) -> bool {
        self.latest_ticket.get(tab_id) == Some(&ticket)
    }
}

/// Focus-mode aware entry point for all navigation.
pub struct NavigationGate<P: FocusPolicy> {
    policy: P,
    tabs: Rc<RefCell<TabManager>>,
    state: RefCell<GateState>,
    check_timeout: Duration,
    use_quick_check: bool,
    search_engine: SearchEngine,
}

impl<P: FocusPolicy> NavigationGate<P> {
    pub fn new(policy: P, tabs: Rc<RefCell<TabManager>>, settings: &ShellSettings) -> Self {
        Self {
            policy,
            tabs,
            state: RefCell::new(GateState::default()),
            check_timeout: Duration::from_millis(settings.backend.policy_timeout_ms),
            use_quick_check: settings.backend.use_quick_check,
            search_engine: settings.navigation.search_engine,
        }
    }

    pub fn tabs(&self) -> &Rc<RefCell<TabManager>> {
        &self.tabs
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn focus_mode_active(&self) -> bool {
        self.state.borrow().focus_mode_active
    }

    pub fn blocked(&self) -> Option<BlockedPage> {
        self.state.borrow().blocked.clone()
    }

    pub fn stats(&self) -> FocusStats {
        self.state.borrow().stats
    }

    /// Switches between `Open` and `Guarded`. Turning focus mode off clears any
    /// block synchronously and invalidates checks still in flight.
    pub fn set_focus_mode(&self, active: bool) {
        let mut state = self.state.borrow_mut();
        if state.focus_mode_active != active {
            state.guard_epoch += 1;
            info!("focus mode {}", if active { "enabled" } else { "disabled" });
        }
        state.focus_mode_active = active;
        if !active {
            state.blocked = None;
        }
    }

    /// Navigates the active tab, or a fresh tab if none exists.
    pub async fn request_navigation(&self, url: &str) -> NavigationOutcome {
        let active = self.tabs.borrow().active_tab_id().map(str::to_string);
        let target = match active {
            Some(id) => Target::Tab(id),
            None => Target::NewTab,
        };
        self.navigate(target, url.to_string(), NavigationSource::Requested).await
    }

    pub async fn request_navigation_in(&self, tab_id: &str, url: &str) -> NavigationOutcome {
        self.navigate(Target::Tab(tab_id.to_string()), url.to_string(), NavigationSource::Requested)
            .await
    }

    /// Opens `url` in a new tab. While guarded the tab is only created once
    /// the URL is allowed.
    pub async fn request_new_tab(&self, url: &str) -> NavigationOutcome {
        self.navigate(Target::NewTab, url.to_string(), NavigationSource::Requested).await
    }

    /// Normalizes address-bar input and navigates the active tab.
    pub async fn submit_address(&self, input: &str) -> NavigationOutcome {
        match normalize_input(input, self.search_engine) {
            Some(url) => self.request_navigation(&url).await,
            None => NavigationOutcome::EmptyInput,
        }
    }

    async fn navigate(&self, target: Target, url: String, source: NavigationSource) -> NavigationOutcome {
        if let Target::Tab(tab_id) = &target {
            if self.tabs.borrow().get_tab(tab_id).is_none() {
                return NavigationOutcome::UnknownTab;
            }
        }

        let (ticket, epoch, guarded) = {
            let mut state = self.state.borrow_mut();
            let ticket = match &target {
                Target::Tab(tab_id) => Some(state.issue_ticket(tab_id)),
                Target::NewTab => None,
            };
            (ticket, state.guard_epoch, state.focus_mode_active)
        };

        if !guarded {
            return self.commit(target, url, source);
        }

        let verdict = self.check(&url).await;

        {
            let state = self.state.borrow();
            if let (Target::Tab(tab_id), Some(ticket)) = (&target, ticket) {
                if !state.is_latest(tab_id, ticket) {
                    debug!("dropping superseded navigation to {} in tab {}", url, tab_id);
                    return NavigationOutcome::Superseded;
                }
            }
            if state.guard_epoch != epoch {
                if state.focus_mode_active {
                    debug!("dropping verdict for {} from an earlier focus session", url);
                    return NavigationOutcome::Discarded;
                }
                drop(state);
                debug!("focus mode ended while checking {}, navigating unguarded", url);
                return self.commit(target, url, source);
            }
        }

        let mut state = self.state.borrow_mut();
        match verdict {
            Verdict::Allow => state.stats.allowed += 1,
            Verdict::FailOpen => state.stats.failed_open += 1,
            Verdict::Block(page) => {
                info!("focus mode blocked {}: {}", page.url, page.reason);
                state.stats.blocked += 1;
                state.blocked = Some(page.clone());
                return NavigationOutcome::Blocked(page);
            }
        }
        drop(state);
        self.commit(target, url, source)
    }

    async fn check(&self, url: &str) -> Verdict {
        let request = UrlCheckRequest {
            url: url.to_string(),
            use_quick_check: self.use_quick_check,
        };
        let result = self.bounded(self.policy.check_url(&request)).await;

        self.state.borrow_mut().stats.checked += 1;
        match result {
            Ok(response) if response.allowed => Verdict::Allow,
            Ok(response) => Verdict::Block(BlockedPage {
                url: url.to_string(),
                reason: response
                    .reason
                    .unwrap_or_else(|| DEFAULT_BLOCK_REASON.to_string()),
                topic: response.topic.unwrap_or_default(),
            }),
            Err(e) => {
                error!("focus check for {} failed, allowing: {}", url, e);
                Verdict::FailOpen
            }
        }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, PolicyCheckError>>,
    ) -> Result<T, PolicyCheckError> {
        match tokio::time::timeout(self.check_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(PolicyCheckError::Timeout(self.check_timeout)),
        }
    }

    fn commit(&self, target: Target, url: String, source: NavigationSource) -> NavigationOutcome {
        let (tab_id, webview) = {
            let mut tabs = self.tabs.borrow_mut();
            let tab_id = match target {
                Target::Tab(tab_id) => {
                    if !tabs.update_tab_url(&tab_id, &url) {
                        return NavigationOutcome::UnknownTab;
                    }
                    tab_id
                }
                Target::NewTab => tabs.add_tab(Some(&url)),
            };
            let webview = tabs.webview(&tab_id);
            (tab_id, webview)
        };
        self.state.borrow_mut().blocked = None;

        if source == NavigationSource::Requested {
            if let Some(webview) = webview {
                webview.load(&url);
            }
        }
        NavigationOutcome::Allowed { tab_id, url }
    }

    /// Applies a normalized webview event for `tab_id`. In-page navigations
    /// go through the gate like any other request.
    pub async fn on_webview_event(&self, tab_id: &str, event: WebviewEvent) -> Option<NavigationOutcome> {
        match event {
            WebviewEvent::NavigationStarted { .. } => {
                self.tabs.borrow_mut().set_tab_loading(tab_id, true);
                None
            }
            WebviewEvent::NavigationCommitted { url } => {
                let current = self.tabs.borrow().get_tab(tab_id).map(|t| t.url.clone())?;
                if current == url {
                    return None;
                }
                Some(
                    self.navigate(Target::Tab(tab_id.to_string()), url, NavigationSource::PageCommitted)
                        .await,
                )
            }
            WebviewEvent::TitleChanged { title } => {
                self.tabs.borrow_mut().update_tab_title(tab_id, &title);
                None
            }
            WebviewEvent::LoadFailed(failure) => {
                if failure.is_suppressed() {
                    debug!("ignoring load failure {} in tab {}", failure.code, tab_id);
                } else {
                    warn!("tab {} failed to load {}: {}", tab_id, failure.url, failure.description);
                    self.tabs.borrow_mut().set_tab_loading(tab_id, false);
                }
                None
            }
            WebviewEvent::LoadFinished => {
                self.tabs.borrow_mut().set_tab_loading(tab_id, false);
                let scriptable = self
                    .tabs
                    .borrow()
                    .webview(tab_id)
                    .is_some_and(|w| w.capabilities().supports_script_execution);
                if scriptable {
                    let refresh = script_runner::refresh_title(&self.tabs, tab_id);
                    if tokio::time::timeout(self.check_timeout, refresh).await.is_err() {
                        warn!("title refresh for tab {} timed out after {:?}", tab_id, self.check_timeout);
                    }
                }
                None
            }
        }
    }

    /// Goes back on the active tab. Always leaves the blocked screen.
    pub fn go_back(&self) -> Option<String> {
        self.state.borrow_mut().blocked = None;
        self.replay(|tabs| tabs.navigate_back())
    }

    pub fn go_forward(&self) -> Option<String> {
        self.replay(|tabs| tabs.navigate_forward())
    }

    fn replay(&self, step: impl FnOnce(&mut TabManager) -> Option<String>) -> Option<String> {
        let (tab_id, url, webview) = {
            let mut tabs = self.tabs.borrow_mut();
            let tab_id = tabs.active_tab_id()?.to_string();
            let url = step(&mut tabs)?;
            let webview = tabs.webview(&tab_id);
            (tab_id, url, webview)
        };
        self.state.borrow_mut().issue_ticket(&tab_id);
        if let Some(webview) = webview.filter(|_| !url.is_empty()) {
            webview.load(&url);
        }
        Some(url)
    }

    /// Shows the home placeholder in the active tab.
    pub fn go_home(&self) -> bool {
        let tab_id = {
            let mut tabs = self.tabs.borrow_mut();
            let Some(tab_id) = tabs.active_tab_id().map(str::to_string) else {
                return false;
            };
            tabs.update_tab_url(&tab_id, "");
            tabs.update_tab_title(&tab_id, DEFAULT_TAB_TITLE);
            tab_id
        };
        let mut state = self.state.borrow_mut();
        state.issue_ticket(&tab_id);
        state.blocked = None;
        true
    }

    /// Reloads the active tab's page in its webview.
    pub fn reload(&self) -> bool {
        let (url, webview) = {
            let tabs = self.tabs.borrow();
            let Some(tab) = tabs.get_active_tab() else {
                return false;
            };
            (tab.url.clone(), tabs.webview(&tab.id))
        };
        match webview {
            Some(webview) if !url.is_empty() => {
                webview.load(&url);
                true
            }
            _ => false,
        }
    }

    /// Mounts `adapter` for `tab_id` and loads the tab's current page into it.
    pub fn attach_webview(&self, tab_id: &str, adapter: &Rc<dyn WebviewAdapter>) -> bool {
        let url = {
            let mut tabs = self.tabs.borrow_mut();
            if !tabs.register_webview(tab_id, adapter) {
                return false;
            }
            tabs.get_tab(tab_id).map(|t| t.url.clone()).unwrap_or_default()
        };
        if !url.is_empty() {
            adapter.load(&url);
        }
        true
    }

    pub fn detach_webview(&self, tab_id: &str) -> bool {
        self.tabs.borrow_mut().unregister_webview(tab_id)
    }

    /// Closes a tab and abandons navigations still pending for it.
    pub fn close_tab(&self, tab_id: &str) -> bool {
        let closed = self.tabs.borrow_mut().close_tab(tab_id);
        if closed {
            self.state.borrow_mut().latest_ticket.remove(tab_id);
        }
        closed
    }

    /// Starts a backend focus session, then guards navigation.
    pub async fn begin_focus_session(&self, request: &FocusSessionRequest) -> Result<String, PolicyCheckError> {
        let session_id = self.bounded(self.policy.start_session(request)).await?;
        info!("focus session {} started for topic '{}'", session_id, request.topic);
        self.set_focus_mode(true);
        Ok(session_id)
    }

    /// Ends the backend focus session, then opens the gate. On failure the
    /// local state is left as it was.
    pub async fn end_focus_session(&self) -> Result<(), PolicyCheckError> {
        match self.bounded(self.policy.end_session()).await {
            Ok(()) => {
                self.set_focus_mode(false);
                Ok(())
            }
            Err(e) => {
                error!("failed to end focus session: {}", e);
                Err(e)
            }
        }
    }

    /// Aligns the local flag with the backend's active session, if reachable.
    pub async fn sync_focus_mode(&self) -> bool {
        match self.bounded(self.policy.active_session()).await {
            Ok(active) => self.set_focus_mode(active),
            Err(e) => warn!("could not read focus session state: {}", e),
        }
        self.focus_mode_active()
    }
}
