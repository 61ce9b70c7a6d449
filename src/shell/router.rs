//! Shell event router.
//!
//! Bridges host IPC messages, typed UI commands and webview events into
//! exactly one navigation gate or tab registry operation each, and emits
//! [`ShellNotification`]s for the chat panel and the platform shell.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::managers::tab_manager::{TabManager, TabManagerTrait};
use crate::navigation::gate::{NavigationGate, NavigationOutcome};
use crate::services::focus_client::FocusPolicy;
use crate::shell::dedup::RecentUrls;
use crate::types::events::{HostChannel, HostMessage, ShellCommand, ShellEvent, ShellNotification};
use crate::types::tab::{AI_CHAT_TITLE, AI_CHAT_URL};

/// The host side of the IPC bridge. Implementations forward every message
/// arriving on `channel` into `sink`.
pub trait HostBridge {
    fn subscribe(&mut self, channel: HostChannel, sink: UnboundedSender<ShellEvent>);
}

/// What the router did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Navigation(NavigationOutcome),
    TabOpened(String),
    TabClosed(String),
    Handled,
    /// A repeated open-in-new-tab inside the dedup window.
    Duplicate,
    /// Nothing to act on (unknown tab, nothing to go back to...).
    Ignored,
}

pub struct ShellEventRouter<P: FocusPolicy> {
    gate: Rc<NavigationGate<P>>,
    recent: RefCell<RecentUrls>,
    host_attached: Cell<bool>,
    inbox: UnboundedSender<ShellEvent>,
    inbox_rx: RefCell<Option<UnboundedReceiver<ShellEvent>>>,
    notifications: UnboundedSender<ShellNotification>,
}

impl<P: FocusPolicy> ShellEventRouter<P> {
    /// Creates the router and the receiving end of its notifications.
    pub fn new(
        gate: Rc<NavigationGate<P>>,
        dedup_window: Duration,
    ) -> (Self, UnboundedReceiver<ShellNotification>) {
        let (inbox, inbox_rx) = mpsc::unbounded_channel();
        let (notifications, notifications_rx) = mpsc::unbounded_channel();
        let router = Self {
            gate,
            recent: RefCell::new(RecentUrls::new(dedup_window)),
            host_attached: Cell::new(false),
            inbox,
            inbox_rx: RefCell::new(Some(inbox_rx)),
            notifications,
        };
        (router, notifications_rx)
    }

    pub fn gate(&self) -> &Rc<NavigationGate<P>> {
        &self.gate
    }

    fn tabs(&self) -> &Rc<RefCell<TabManager>> {
        self.gate.tabs()
    }

    /// Sender for UI collaborators to push commands into the router.
    pub fn sender(&self) -> UnboundedSender<ShellEvent> {
        self.inbox.clone()
    }

    /// Subscribes to every host channel. Only the first call registers;
    /// later calls (UI remounts) are ignored and return `false`.
    pub fn attach_host(&self, bridge: &mut dyn HostBridge) -> bool {
        if self.host_attached.replace(true) {
            debug!("host channels already subscribed, skipping");
            return false;
        }
        for channel in HostChannel::ALL {
            bridge.subscribe(channel, self.inbox.clone());
            debug!("subscribed to host channel {}", channel.name());
        }
        true
    }

    /// Dispatches inbox events for as long as the returned future is polled.
    /// Only the first caller drains; later calls return immediately.
    ///
    /// Events start in arrival order but are dispatched concurrently on the
    /// current task, so a pending policy check never holds back the events
    /// queued behind it. Overlapping navigations are ordered by the gate.
    /// Returns once the inbox is closed and every dispatch has finished.
    pub async fn run(&self) {
        let Some(mut inbox) = self.inbox_rx.borrow_mut().take() else {
            debug!("router inbox already being drained");
            return;
        };
        let mut in_flight: FuturesUnordered<LocalBoxFuture<'_, RouteOutcome>> = FuturesUnordered::new();
        let mut open = true;
        loop {
            tokio::select! {
                // In-flight work is polled first so every event starts in
                // arrival order before the next one is taken.
                biased;
                Some(outcome) = in_flight.next(), if !in_flight.is_empty() => {
                    debug!("routed event: {:?}", outcome);
                }
                event = inbox.recv(), if open => match event {
                    Some(event) => in_flight.push(self.dispatch(event).boxed_local()),
                    None => {
                        debug!("router inbox closed, {} dispatches pending", in_flight.len());
                        open = false;
                    }
                },
                else => break,
            }
        }
    }

    pub async fn dispatch(&self, event: ShellEvent) -> RouteOutcome {
        match event {
            ShellEvent::Host(message) => self.on_host_message(message).await,
            ShellEvent::Command(command) => self.on_command(command).await,
            ShellEvent::Webview { tab_id, event } => match self.gate.on_webview_event(&tab_id, event).await {
                Some(outcome) => self.navigation(outcome),
                None => RouteOutcome::Handled,
            },
        }
    }

    async fn on_host_message(&self, message: HostMessage) -> RouteOutcome {
        match message {
            HostMessage::AskAiWithSelection { selected_text } => {
                self.notify(ShellNotification::OpenAiChat {
                    message: format!("Explain or help with: \"{}\"", selected_text),
                    context: selected_text,
                });
                RouteOutcome::Handled
            }
            HostMessage::OpenLinkNewTab { url } => {
                if !self.recent.borrow_mut().admit(&url) {
                    debug!("suppressed duplicate new tab for {}", url);
                    return RouteOutcome::Duplicate;
                }
                let outcome = self.gate.request_new_tab(&url).await;
                self.navigation(outcome)
            }
        }
    }

    async fn on_command(&self, command: ShellCommand) -> RouteOutcome {
        match command {
            ShellCommand::NavigateToUrl { url } => {
                let outcome = self.gate.request_navigation(&url).await;
                self.navigation(outcome)
            }
            ShellCommand::SubmitAddress { input } => {
                let outcome = self.gate.submit_address(&input).await;
                self.navigation(outcome)
            }
            ShellCommand::OpenAiChatFullscreen => {
                let tab_id = {
                    let mut tabs = self.tabs().borrow_mut();
                    let tab_id = tabs.add_tab(Some(AI_CHAT_URL));
                    tabs.update_tab_title(&tab_id, AI_CHAT_TITLE);
                    tab_id
                };
                self.notify(ShellNotification::AiChatTabOpened {
                    tab_id: tab_id.clone(),
                });
                RouteOutcome::TabOpened(tab_id)
            }
            ShellCommand::CloseAiChatTab => {
                let tab_id = self
                    .tabs()
                    .borrow()
                    .find_tab_by_url(AI_CHAT_URL)
                    .map(|t| t.id.clone());
                match tab_id {
                    Some(tab_id) => {
                        self.notify(ShellNotification::AiChatTabClosed {
                            tab_id: tab_id.clone(),
                        });
                        self.close(tab_id)
                    }
                    None => RouteOutcome::Ignored,
                }
            }
            ShellCommand::NewTab => RouteOutcome::TabOpened(self.tabs().borrow_mut().add_tab(None)),
            ShellCommand::CloseTab { tab_id } => self.close(tab_id),
            ShellCommand::SwitchTab { tab_id } => {
                if self.tabs().borrow_mut().switch_tab(&tab_id) {
                    RouteOutcome::Handled
                } else {
                    RouteOutcome::Ignored
                }
            }
            ShellCommand::GoBack => self.handled(self.gate.go_back().is_some()),
            ShellCommand::GoForward => self.handled(self.gate.go_forward().is_some()),
            ShellCommand::GoHome => self.handled(self.gate.go_home()),
            ShellCommand::Reload => self.handled(self.gate.reload()),
            ShellCommand::SetFocusMode { active } => {
                self.gate.set_focus_mode(active);
                RouteOutcome::Handled
            }
            ShellCommand::EndFocusSession => self.handled(self.gate.end_focus_session().await.is_ok()),
        }
    }

    fn close(&self, tab_id: String) -> RouteOutcome {
        if !self.gate.close_tab(&tab_id) {
            return RouteOutcome::Ignored;
        }
        if self.tabs().borrow().tab_count() == 0 {
            info!("last tab closed");
            self.notify(ShellNotification::LastTabClosed);
        }
        RouteOutcome::TabClosed(tab_id)
    }

    fn navigation(&self, outcome: NavigationOutcome) -> RouteOutcome {
        if let NavigationOutcome::Blocked(page) = &outcome {
            self.notify(ShellNotification::NavigationBlocked(page.clone()));
        }
        RouteOutcome::Navigation(outcome)
    }

    fn handled(&self, applied: bool) -> RouteOutcome {
        if applied {
            RouteOutcome::Handled
        } else {
            RouteOutcome::Ignored
        }
    }

    fn notify(&self, notification: ShellNotification) {
        if self.notifications.send(notification).is_err() {
            debug!("no listener for shell notifications");
        }
    }
}
