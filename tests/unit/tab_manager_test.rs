use std::rc::Rc;

use focusbrowser::managers::tab_manager::{TabManager, TabManagerTrait};
use focusbrowser::types::tab::DEFAULT_TAB_TITLE;
use focusbrowser::webview::{FrameHost, FrameWebview, WebviewAdapter};

struct NoopFrame;

impl FrameHost for NoopFrame {
    fn set_src(&self, _url: &str) {}
}

fn frame() -> Rc<dyn WebviewAdapter> {
    Rc::new(FrameWebview::new(NoopFrame))
}

#[test]
fn test_add_tab_returns_unique_ids() {
    let mut mgr = TabManager::new();
    let id1 = mgr.add_tab(None);
    let id2 = mgr.add_tab(None);
    assert_ne!(id1, id2);
    assert_eq!(mgr.tab_count(), 2);
}

#[test]
fn test_add_tab_becomes_active() {
    let mut mgr = TabManager::new();
    mgr.add_tab(None);
    let id = mgr.add_tab(Some("https://example.com"));
    assert_eq!(mgr.active_tab_id(), Some(id.as_str()));
    assert_eq!(mgr.get_active_tab().unwrap().url, "https://example.com");
}

#[test]
fn test_add_tab_defaults_to_home() {
    let mut mgr = TabManager::new();
    let id = mgr.add_tab(None);
    let tab = mgr.get_tab(&id).unwrap();
    assert!(tab.is_home());
    assert_eq!(tab.title, DEFAULT_TAB_TITLE);
    assert!(!tab.loading);
}

#[test]
fn test_close_active_tab_activates_left_neighbour() {
    let mut mgr = TabManager::new();
    let id1 = mgr.add_tab(None);
    let id2 = mgr.add_tab(None);
    let id3 = mgr.add_tab(None);
    mgr.switch_tab(&id2);

    assert!(mgr.close_tab(&id2));

    assert_eq!(mgr.active_tab_id(), Some(id1.as_str()));
    assert_eq!(mgr.get_tab_order(), &[id1, id3]);
}

#[test]
fn test_close_inactive_tab_keeps_active() {
    let mut mgr = TabManager::new();
    let id1 = mgr.add_tab(None);
    let id2 = mgr.add_tab(None);

    assert!(mgr.close_tab(&id1));

    assert_eq!(mgr.active_tab_id(), Some(id2.as_str()));
}

#[test]
fn test_close_last_tab_leaves_registry_empty() {
    let mut mgr = TabManager::new();
    let id = mgr.add_tab(None);

    assert!(mgr.close_tab(&id));

    assert_eq!(mgr.tab_count(), 0);
    assert!(mgr.get_active_tab().is_none());
    assert!(mgr.active_tab_id().is_none());
}

#[test]
fn test_unknown_tab_operations_are_noops() {
    let mut mgr = TabManager::new();
    let id = mgr.add_tab(Some("https://a.example"));

    assert!(!mgr.close_tab("missing"));
    assert!(!mgr.switch_tab("missing"));
    assert!(!mgr.update_tab_url("missing", "https://b.example"));
    assert!(!mgr.update_tab_title("missing", "Title"));
    assert!(!mgr.set_tab_loading("missing", true));
    assert!(!mgr.can_go_back("missing"));
    assert_eq!(mgr.active_tab_id(), Some(id.as_str()));
    assert_eq!(mgr.tab_count(), 1);
}

#[test]
fn test_update_url_pushes_history_and_clears_forward() {
    let mut mgr = TabManager::new();
    let id = mgr.add_tab(Some("https://a.example"));
    mgr.update_tab_url(&id, "https://b.example");
    mgr.update_tab_url(&id, "https://c.example");
    mgr.navigate_back();
    assert!(mgr.can_go_forward(&id));

    mgr.update_tab_url(&id, "https://d.example");

    let tab = mgr.get_tab(&id).unwrap();
    assert_eq!(tab.history.back, vec!["https://a.example", "https://b.example"]);
    assert!(tab.history.forward.is_empty());
}

#[test]
fn test_back_and_forward_replay_history() {
    let mut mgr = TabManager::new();
    let id = mgr.add_tab(Some("https://a.example"));
    mgr.update_tab_url(&id, "https://b.example");

    assert_eq!(mgr.navigate_back(), Some("https://a.example".to_string()));
    assert!(!mgr.can_go_back(&id));
    assert_eq!(mgr.navigate_back(), None);
    assert_eq!(mgr.navigate_forward(), Some("https://b.example".to_string()));
    assert_eq!(mgr.navigate_forward(), None);
}

#[test]
fn test_empty_title_falls_back_to_default() {
    let mut mgr = TabManager::new();
    let id = mgr.add_tab(None);
    mgr.update_tab_title(&id, "Photosynthesis");
    assert_eq!(mgr.get_tab(&id).unwrap().title, "Photosynthesis");

    mgr.update_tab_title(&id, "");
    assert_eq!(mgr.get_tab(&id).unwrap().title, DEFAULT_TAB_TITLE);
}

#[test]
fn test_find_tab_by_url() {
    let mut mgr = TabManager::new();
    mgr.add_tab(Some("https://a.example"));
    let id = mgr.add_tab(Some("https://b.example"));
    assert_eq!(mgr.find_tab_by_url("https://b.example").unwrap().id, id);
    assert!(mgr.find_tab_by_url("https://c.example").is_none());
}

#[test]
fn test_get_all_tabs_follows_order() {
    let mut mgr = TabManager::new();
    let ids: Vec<String> = (0..3).map(|_| mgr.add_tab(None)).collect();
    let listed: Vec<String> = mgr.get_all_tabs().iter().map(|t| t.id.clone()).collect();
    assert_eq!(listed, ids);
}

// === Webview registration ===

#[test]
fn test_register_webview_holds_weak_reference() {
    let mut mgr = TabManager::new();
    let id = mgr.add_tab(None);
    let adapter = frame();

    assert!(mgr.register_webview(&id, &adapter));
    assert!(mgr.webview(&id).is_some());

    drop(adapter);
    assert!(mgr.webview(&id).is_none());
}

#[test]
fn test_register_webview_for_unknown_tab_fails() {
    let mut mgr = TabManager::new();
    assert!(!mgr.register_webview("missing", &frame()));
}

#[test]
fn test_generation_changes_on_every_mount() {
    let mut mgr = TabManager::new();
    let id = mgr.add_tab(None);
    let adapter = frame();
    assert_eq!(mgr.webview_generation(&id), Some(0));

    mgr.register_webview(&id, &adapter);
    let mounted = mgr.webview_generation(&id);
    assert!(mgr.unregister_webview(&id));
    let unmounted = mgr.webview_generation(&id);
    assert!(!mgr.unregister_webview(&id));

    assert_ne!(mounted, Some(0));
    assert_ne!(mounted, unmounted);
    assert!(mgr.webview(&id).is_none());
}

#[test]
fn test_closing_tab_forgets_webview() {
    let mut mgr = TabManager::new();
    let id = mgr.add_tab(None);
    let adapter = frame();
    mgr.register_webview(&id, &adapter);

    mgr.close_tab(&id);

    assert!(mgr.webview(&id).is_none());
    assert_eq!(mgr.webview_generation(&id), None);
}
