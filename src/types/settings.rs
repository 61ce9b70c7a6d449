use serde::{Deserialize, Serialize};

/// Top-level shell settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ShellSettings {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub navigation: NavigationSettings,
    #[serde(default)]
    pub polling: PollingSettings,
}

/// Where the AI backend lives and how patiently we talk to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendSettings {
    pub api_base_url: String,
    /// Upper bound for a focus-mode URL check before failing open.
    pub policy_timeout_ms: u64,
    /// Ask the backend for the keyword-only check instead of the AI check.
    pub use_quick_check: bool,
    /// Transport timeout applied to every HTTP request.
    pub request_timeout_ms: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            policy_timeout_ms: 5_000,
            use_quick_check: false,
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NavigationSettings {
    pub search_engine: SearchEngine,
    /// Window in which repeated open-in-new-tab requests for a URL collapse.
    pub dedup_window_ms: u64,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            search_engine: SearchEngine::Google,
            dedup_window_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollingSettings {
    pub interval_ms: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self { interval_ms: 5_000 }
    }
}

/// Search engine used for address-bar input that is not a URL.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    #[default]
    Google,
    Bing,
    DuckDuckGo,
    Brave,
    Ecosia,
}

impl SearchEngine {
    pub fn query_base(self) -> &'static str {
        match self {
            SearchEngine::Google => "https://www.google.com/search?q=",
            SearchEngine::Bing => "https://www.bing.com/search?q=",
            SearchEngine::DuckDuckGo => "https://duckduckgo.com/?q=",
            SearchEngine::Brave => "https://search.brave.com/search?q=",
            SearchEngine::Ecosia => "https://www.ecosia.org/search?q=",
        }
    }
}
