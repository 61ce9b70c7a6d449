//! focusbrowser: console demo of the browser core.
//!
//! Drives the tab registry, navigation gate and shell router against the
//! configured focus backend, with a headless stand-in for the embedded
//! webview. Set `RUST_LOG=debug` for the full event trace.

use std::rc::Rc;

use async_trait::async_trait;
use focusbrowser::app::App;
use focusbrowser::managers::tab_manager::TabManagerTrait;
use focusbrowser::types::events::{HostMessage, ShellCommand, ShellEvent};
use focusbrowser::types::webview::NativeWebviewEvent;
use focusbrowser::webview::{EmbeddedHost, EmbeddedWebview, WebviewAdapter};

/// Prints loads instead of rendering them.
struct HeadlessHost;

#[async_trait(?Send)]
impl EmbeddedHost for HeadlessHost {
    fn load_url(&self, url: &str) -> Result<(), String> {
        println!("  [webview] load {}", url);
        Ok(())
    }

    async fn evaluate_script(&self, _code: &str) -> Result<String, String> {
        Ok("\"Headless page\"".to_string())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut app = match App::new(None) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("failed to start: {}", e);
            std::process::exit(1);
        }
    };
    app.startup().await;

    let (mut status_poller, mut status_ticks) = app.focus_status_poller();
    if status_ticks.recv().await.is_some() {
        app.gate.sync_focus_mode().await;
    }

    let webview = Rc::new(EmbeddedWebview::new(HeadlessHost));
    let adapter: Rc<dyn WebviewAdapter> = webview.clone();
    let tab_id = match app.tabs.borrow().active_tab_id() {
        Some(id) => id.to_string(),
        None => return,
    };
    app.gate.attach_webview(&tab_id, &adapter);

    let script = [
        ShellEvent::Command(ShellCommand::SubmitAddress {
            input: "rust-lang.org".to_string(),
        }),
        ShellEvent::Command(ShellCommand::SubmitAddress {
            input: "borrow checker explained".to_string(),
        }),
        ShellEvent::Host(HostMessage::OpenLinkNewTab {
            url: "https://doc.rust-lang.org/book/".to_string(),
        }),
        ShellEvent::Host(HostMessage::OpenLinkNewTab {
            url: "https://doc.rust-lang.org/book/".to_string(),
        }),
        ShellEvent::Command(ShellCommand::SwitchTab { tab_id: tab_id.clone() }),
        ShellEvent::Command(ShellCommand::GoBack),
    ];

    for event in script {
        println!("> {:?}", event);
        let outcome = app.router.dispatch(event).await;
        println!("  => {:?}", outcome);
    }

    let mut events = adapter.subscribe();
    webview.handle_native_event(NativeWebviewEvent::StopLoading);
    if let Ok(event) = events.try_recv() {
        app.router
            .dispatch(ShellEvent::Webview {
                tab_id: tab_id.clone(),
                event,
            })
            .await;
    }

    println!();
    for tab in app.tabs.borrow().get_all_tabs() {
        let marker = if app.tabs.borrow().active_tab_id() == Some(tab.id.as_str()) { "*" } else { " " };
        println!("{} {:<24} {}", marker, tab.title, tab.url);
    }
    println!("focus stats: {:?}", app.gate.stats());

    while let Ok(notification) = app.notifications.try_recv() {
        println!("notification: {:?}", notification);
    }
    status_poller.stop();
}
