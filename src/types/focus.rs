use serde::{Deserialize, Serialize};

/// Reason shown on the blocked page when the policy check gives none.
pub const DEFAULT_BLOCK_REASON: &str = "This URL is not relevant to your focus topic";

/// Body of a focus-mode URL check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UrlCheckRequest {
    pub url: String,
    pub use_quick_check: bool,
}

/// Verdict returned by the focus-mode URL check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UrlCheckResponse {
    pub allowed: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

impl UrlCheckResponse {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            ..Self::default()
        }
    }

    pub fn block(reason: &str, topic: &str) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.to_string()),
            topic: Some(topic.to_string()),
        }
    }
}

/// A navigation rejected by focus mode. Present until the next allowed
/// navigation, a back navigation, or focus mode being switched off.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockedPage {
    pub url: String,
    pub reason: String,
    pub topic: String,
}

/// Parameters for starting a focus session on the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FocusSessionRequest {
    pub topic: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub allowed_domains: Vec<String>,
}

/// Counters of policy verdicts seen by the navigation gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FocusStats {
    pub checked: u64,
    pub allowed: u64,
    pub blocked: u64,
    pub failed_open: u64,
}
