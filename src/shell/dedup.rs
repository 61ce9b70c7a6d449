use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

/// URLs seen recently, used to collapse duplicate open-in-new-tab signals
/// fired by several listeners on the same host channel. Entries expire after
/// `window`.
#[derive(Debug)]
pub struct RecentUrls {
    window: Duration,
    seen: HashMap<String, Instant>,
}

impl RecentUrls {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            seen: HashMap::new(),
        }
    }

    /// Records `url` and returns `true` if it was not seen within the window.
    pub fn admit(&mut self, url: &str) -> bool {
        let now = Instant::now();
        let window = self.window;
        self.seen.retain(|_, at| now.duration_since(*at) < window);
        if self.seen.contains_key(url) {
            return false;
        }
        self.seen.insert(url.to_string(), now);
        true
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
