use serde::{Deserialize, Serialize};

/// Title shown until the webview reports a page title.
pub const DEFAULT_TAB_TITLE: &str = "New Tab";

/// Internal address of the full-screen AI chat pseudo-tab.
pub const AI_CHAT_URL: &str = "/ai-chat-fullscreen";

/// Title given to the AI chat pseudo-tab.
pub const AI_CHAT_TITLE: &str = "🤖 AI Chat";

/// Represents a browser tab with its current state.
///
/// An empty `url` is the home placeholder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tab {
    pub id: String,
    pub url: String,
    pub title: String,
    pub loading: bool,
    pub history: TabHistory,
    pub created_at: i64,
}

impl Tab {
    pub fn is_home(&self) -> bool {
        self.url.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.history.forward.is_empty()
    }
}

/// Back and forward stacks of previously visited URLs. The top of each stack
/// is the last element.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TabHistory {
    pub back: Vec<String>,
    pub forward: Vec<String>,
}
