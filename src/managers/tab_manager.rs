use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use uuid::Uuid;

use crate::types::tab::{Tab, TabHistory, DEFAULT_TAB_TITLE};
use crate::webview::WebviewAdapter;

/// Trait defining the tab registry interface.
///
/// Operations naming a tab that no longer exists are silent no-ops: closing
/// races are expected while async work is in flight, so they report `false`
/// or `None` instead of failing.
pub trait TabManagerTrait {
    fn add_tab(&mut self, url: Option<&str>) -> String;
    fn close_tab(&mut self, tab_id: &str) -> bool;
    fn switch_tab(&mut self, tab_id: &str) -> bool;
    fn update_tab_url(&mut self, tab_id: &str, url: &str) -> bool;
    fn update_tab_title(&mut self, tab_id: &str, title: &str) -> bool;
    fn set_tab_loading(&mut self, tab_id: &str, loading: bool) -> bool;
    fn navigate_back(&mut self) -> Option<String>;
    fn navigate_forward(&mut self) -> Option<String>;
    fn register_webview(&mut self, tab_id: &str, adapter: &Rc<dyn WebviewAdapter>) -> bool;
    fn unregister_webview(&mut self, tab_id: &str) -> bool;
    fn webview(&self, tab_id: &str) -> Option<Rc<dyn WebviewAdapter>>;
    fn webview_generation(&self, tab_id: &str) -> Option<u64>;
    fn get_tab(&self, tab_id: &str) -> Option<&Tab>;
    fn get_all_tabs(&self) -> Vec<&Tab>;
    fn get_active_tab(&self) -> Option<&Tab>;
    fn active_tab_id(&self) -> Option<&str>;
    fn find_tab_by_url(&self, url: &str) -> Option<&Tab>;
    fn can_go_back(&self, tab_id: &str) -> bool;
    fn can_go_forward(&self, tab_id: &str) -> bool;
    fn tab_count(&self) -> usize;
    fn get_tab_order(&self) -> &[String];
}

/// Weak handle to the webview currently mounted for a tab.
struct WebviewSlot {
    adapter: Option<Weak<dyn WebviewAdapter>>,
    generation: u64,
}

/// In-memory tab registry: ordered tabs, the active pointer, per-tab history
/// and weak references to mounted webviews.
pub struct TabManager {
    tabs: Vec<Tab>,
    tab_order: Vec<String>,
    active_tab_id: Option<String>,
    webviews: HashMap<String, WebviewSlot>,
}

impl TabManager {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            tab_order: Vec::new(),
            active_tab_id: None,
            webviews: HashMap::new(),
        }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn find_tab_index(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    fn find_order_index(&self, tab_id: &str) -> Option<usize> {
        self.tab_order.iter().position(|id| id == tab_id)
    }

    fn tab_mut(&mut self, tab_id: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == tab_id)
    }

    fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        let id = self.active_tab_id.clone()?;
        self.tab_mut(&id)
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TabManagerTrait for TabManager {
    /// Create a tab (home placeholder when `url` is `None`), append it and
    /// make it active. Returns the new tab's ID.
    fn add_tab(&mut self, url: Option<&str>) -> String {
        let id = Uuid::new_v4().to_string();
        self.tabs.push(Tab {
            id: id.clone(),
            url: url.unwrap_or_default().to_string(),
            title: DEFAULT_TAB_TITLE.to_string(),
            loading: false,
            history: TabHistory::default(),
            created_at: Self::now(),
        });
        self.tab_order.push(id.clone());
        self.active_tab_id = Some(id.clone());
        id
    }

    /// Close a tab. If it was active, activate its left neighbour, else the
    /// tab that took its place. Closing the last tab leaves the registry
    /// empty; the shell decides what that means.
    fn close_tab(&mut self, tab_id: &str) -> bool {
        let (Some(tab_idx), Some(order_idx)) =
            (self.find_tab_index(tab_id), self.find_order_index(tab_id))
        else {
            debug!("close_tab: unknown tab {}", tab_id);
            return false;
        };

        let was_active = self.active_tab_id.as_deref() == Some(tab_id);

        self.tabs.remove(tab_idx);
        self.tab_order.remove(order_idx);
        self.webviews.remove(tab_id);

        if self.tab_order.is_empty() {
            self.active_tab_id = None;
        } else if was_active {
            let next = order_idx.saturating_sub(1).min(self.tab_order.len() - 1);
            self.active_tab_id = Some(self.tab_order[next].clone());
        }
        true
    }

    fn switch_tab(&mut self, tab_id: &str) -> bool {
        if self.active_tab_id.as_deref() == Some(tab_id) {
            return true;
        }
        if self.find_tab_index(tab_id).is_none() {
            debug!("switch_tab: unknown tab {}", tab_id);
            return false;
        }
        self.active_tab_id = Some(tab_id.to_string());
        true
    }

    /// Point a tab at `url`, pushing the previous URL onto its back stack and
    /// clearing the forward stack.
    fn update_tab_url(&mut self, tab_id: &str, url: &str) -> bool {
        match self.tab_mut(tab_id) {
            Some(tab) => {
                let previous = std::mem::replace(&mut tab.url, url.to_string());
                tab.history.back.push(previous);
                tab.history.forward.clear();
                true
            }
            None => {
                debug!("update_tab_url: unknown tab {}", tab_id);
                false
            }
        }
    }

    fn update_tab_title(&mut self, tab_id: &str, title: &str) -> bool {
        match self.tab_mut(tab_id) {
            Some(tab) => {
                tab.title = if title.is_empty() {
                    DEFAULT_TAB_TITLE.to_string()
                } else {
                    title.to_string()
                };
                true
            }
            None => false,
        }
    }

    fn set_tab_loading(&mut self, tab_id: &str, loading: bool) -> bool {
        match self.tab_mut(tab_id) {
            Some(tab) => {
                tab.loading = loading;
                true
            }
            None => false,
        }
    }

    /// Replay one step back on the active tab. Returns the URL now shown.
    fn navigate_back(&mut self) -> Option<String> {
        let tab = self.active_tab_mut()?;
        let target = tab.history.back.pop()?;
        let current = std::mem::replace(&mut tab.url, target);
        tab.history.forward.push(current);
        Some(tab.url.clone())
    }

    /// Replay one step forward on the active tab. Returns the URL now shown.
    fn navigate_forward(&mut self) -> Option<String> {
        let tab = self.active_tab_mut()?;
        let target = tab.history.forward.pop()?;
        let current = std::mem::replace(&mut tab.url, target);
        tab.history.back.push(current);
        Some(tab.url.clone())
    }

    /// Attach a weak reference to the tab's mounted webview, replacing any
    /// previous one (remounts).
    fn register_webview(&mut self, tab_id: &str, adapter: &Rc<dyn WebviewAdapter>) -> bool {
        if self.find_tab_index(tab_id).is_none() {
            return false;
        }
        let slot = self.webviews.entry(tab_id.to_string()).or_insert(WebviewSlot {
            adapter: None,
            generation: 0,
        });
        slot.adapter = Some(Rc::downgrade(adapter));
        slot.generation += 1;
        true
    }

    fn unregister_webview(&mut self, tab_id: &str) -> bool {
        match self.webviews.get_mut(tab_id) {
            Some(slot) if slot.adapter.is_some() => {
                slot.adapter = None;
                slot.generation += 1;
                true
            }
            _ => false,
        }
    }

    fn webview(&self, tab_id: &str) -> Option<Rc<dyn WebviewAdapter>> {
        self.webviews
            .get(tab_id)
            .and_then(|slot| slot.adapter.as_ref())
            .and_then(Weak::upgrade)
    }

    /// Changes on every register/unregister; `None` once the tab is gone.
    fn webview_generation(&self, tab_id: &str) -> Option<u64> {
        self.find_tab_index(tab_id)?;
        Some(self.webviews.get(tab_id).map_or(0, |slot| slot.generation))
    }

    fn get_tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    fn get_all_tabs(&self) -> Vec<&Tab> {
        self.tab_order
            .iter()
            .filter_map(|id| self.tabs.iter().find(|t| t.id == *id))
            .collect()
    }

    fn get_active_tab(&self) -> Option<&Tab> {
        self.active_tab_id
            .as_ref()
            .and_then(|id| self.tabs.iter().find(|t| t.id == *id))
    }

    fn active_tab_id(&self) -> Option<&str> {
        self.active_tab_id.as_deref()
    }

    fn find_tab_by_url(&self, url: &str) -> Option<&Tab> {
        self.get_all_tabs().into_iter().find(|t| t.url == url)
    }

    fn can_go_back(&self, tab_id: &str) -> bool {
        self.get_tab(tab_id).is_some_and(Tab::can_go_back)
    }

    fn can_go_forward(&self, tab_id: &str) -> bool {
        self.get_tab(tab_id).is_some_and(Tab::can_go_forward)
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    fn get_tab_order(&self) -> &[String] {
        &self.tab_order
    }
}
