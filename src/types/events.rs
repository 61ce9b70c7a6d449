use serde::{Deserialize, Serialize};

use super::focus::BlockedPage;
use super::webview::WebviewEvent;

/// Named IPC channels delivered by the host process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostChannel {
    AskAiWithSelection,
    OpenLinkNewTab,
}

impl HostChannel {
    pub const ALL: [HostChannel; 2] = [HostChannel::AskAiWithSelection, HostChannel::OpenLinkNewTab];

    pub fn name(self) -> &'static str {
        match self {
            HostChannel::AskAiWithSelection => "ask-ai-with-selection",
            HostChannel::OpenLinkNewTab => "open-link-new-tab",
        }
    }
}

/// Payloads arriving on the host channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "kebab-case")]
pub enum HostMessage {
    AskAiWithSelection {
        #[serde(rename = "selectedText")]
        selected_text: String,
    },
    OpenLinkNewTab {
        url: String,
    },
}

impl HostMessage {
    /// Parses a raw IPC body such as `{"channel":"open-link-new-tab","url":"..."}`.
    /// Unknown channels and malformed bodies yield `None`.
    pub fn from_ipc(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    pub fn channel(&self) -> HostChannel {
        match self {
            HostMessage::AskAiWithSelection { .. } => HostChannel::AskAiWithSelection,
            HostMessage::OpenLinkNewTab { .. } => HostChannel::OpenLinkNewTab,
        }
    }
}

/// Commands issued by shell UI collaborators (URL bar, suggestion panel,
/// chat panel, tab strip).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "kebab-case")]
pub enum ShellCommand {
    NavigateToUrl { url: String },
    SubmitAddress { input: String },
    OpenAiChatFullscreen,
    CloseAiChatTab,
    NewTab,
    CloseTab { tab_id: String },
    SwitchTab { tab_id: String },
    GoBack,
    GoForward,
    GoHome,
    Reload,
    SetFocusMode { active: bool },
    EndFocusSession,
}

/// Everything the router consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Host(HostMessage),
    Command(ShellCommand),
    Webview { tab_id: String, event: WebviewEvent },
}

impl From<HostMessage> for ShellEvent {
    fn from(message: HostMessage) -> Self {
        ShellEvent::Host(message)
    }
}

impl From<ShellCommand> for ShellEvent {
    fn from(command: ShellCommand) -> Self {
        ShellEvent::Command(command)
    }
}

/// Notifications the router emits towards shell collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellNotification {
    OpenAiChat { message: String, context: String },
    AiChatTabOpened { tab_id: String },
    AiChatTabClosed { tab_id: String },
    NavigationBlocked(BlockedPage),
    /// The registry became empty; the platform shell decides whether to quit.
    LastTabClosed,
}
