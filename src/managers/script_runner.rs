//! Tab-scoped script execution.
//!
//! A script started against a tab is tagged with the tab's webview
//! generation. If the tab is closed, or its webview unregistered or replaced,
//! before the script resolves, the result is dropped with
//! [`ScriptExecutionError::Discarded`].

use std::cell::RefCell;

use log::debug;

use crate::managers::tab_manager::{TabManager, TabManagerTrait};
use crate::types::errors::ScriptExecutionError;

/// Script used to read the page title after a load.
pub const TITLE_SCRIPT: &str = "document.title";

/// Runs `code` in the webview mounted for `tab_id`.
///
/// The registry borrow is released before awaiting, so other tab operations
/// may run while the script is in flight.
pub async fn execute_in_tab(
    tabs: &RefCell<TabManager>,
    tab_id: &str,
    code: &str,
) -> Result<String, ScriptExecutionError> {
    let (adapter, generation) = {
        let tabs = tabs.borrow();
        let adapter = tabs
            .webview(tab_id)
            .ok_or_else(|| ScriptExecutionError::Detached(tab_id.to_string()))?;
        (adapter, tabs.webview_generation(tab_id))
    };

    if !adapter.capabilities().supports_script_execution {
        return Err(ScriptExecutionError::Unsupported);
    }

    let result = adapter.execute_script(code).await;

    if tabs.borrow().webview_generation(tab_id) != generation {
        debug!("dropping stale script result for tab {}", tab_id);
        return Err(ScriptExecutionError::Discarded(tab_id.to_string()));
    }
    result
}

/// Refreshes the tab title from `document.title` when the adapter can run
/// scripts. Returns the title applied, if any.
pub async fn refresh_title(tabs: &RefCell<TabManager>, tab_id: &str) -> Option<String> {
    match execute_in_tab(tabs, tab_id, TITLE_SCRIPT).await {
        Ok(raw) => {
            // Hosts return the JSON-serialized value; fall back to the raw text.
            let title = serde_json::from_str::<String>(&raw).unwrap_or(raw);
            if title.is_empty() {
                return None;
            }
            tabs.borrow_mut().update_tab_title(tab_id, &title).then_some(title)
        }
        Err(e) => {
            debug!("title refresh skipped for tab {}: {}", tab_id, e);
            None
        }
    }
}
