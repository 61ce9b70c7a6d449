mod support;

use focusbrowser::types::errors::ScriptExecutionError;
use focusbrowser::types::webview::{
    LoadFailure, NativeWebviewEvent, WebviewEvent, WebviewKind, ERR_ABORTED, ERR_BLOCKED_BY_CLIENT,
};
use focusbrowser::webview::embedded::ERR_FAILED;
use focusbrowser::webview::{EmbeddedWebview, FrameWebview, WebviewAdapter};
use rstest::rstest;
use support::{RecordingFrame, RecordingHost};
use tokio::sync::broadcast::Receiver;

fn drain(rx: &mut Receiver<WebviewEvent>) -> Vec<WebviewEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn failure(code: i32) -> LoadFailure {
    LoadFailure {
        code,
        description: format!("net error {}", code),
        url: "https://example.com".to_string(),
    }
}

// === Capabilities ===

#[test]
fn test_capabilities_by_kind() {
    let embedded = EmbeddedWebview::new(RecordingHost::new());
    let frame = FrameWebview::new(RecordingFrame::default());

    assert_eq!(embedded.kind(), WebviewKind::Embedded);
    assert!(embedded.capabilities().supports_script_execution);

    assert_eq!(frame.kind(), WebviewKind::Frame);
    assert!(!frame.capabilities().supports_script_execution);
}

// === Embedded ===

#[tokio::test]
async fn test_embedded_executes_script() {
    let webview = EmbeddedWebview::new(RecordingHost::new().answering(Ok("\"Mitosis\"")));
    assert_eq!(webview.execute_script("document.title").await.unwrap(), "\"Mitosis\"");
    assert_eq!(*webview.host().scripts.borrow(), vec!["document.title".to_string()]);
}

#[tokio::test]
async fn test_embedded_script_error_is_reported() {
    let webview = EmbeddedWebview::new(RecordingHost::new().answering(Err("ReferenceError: foo")));
    assert_eq!(
        webview.execute_script("foo()").await,
        Err(ScriptExecutionError::Script("ReferenceError: foo".to_string()))
    );
}

#[test]
fn test_embedded_normalizes_native_lifecycle() {
    let webview = EmbeddedWebview::new(RecordingHost::new());
    let mut rx = webview.subscribe();

    webview.handle_native_event(NativeWebviewEvent::StartLoading {
        url: "https://a.example".to_string(),
    });
    webview.handle_native_event(NativeWebviewEvent::Navigate {
        url: "https://a.example".to_string(),
    });
    webview.handle_native_event(NativeWebviewEvent::TitleUpdated {
        title: "A".to_string(),
    });
    webview.handle_native_event(NativeWebviewEvent::StopLoading);

    assert_eq!(
        drain(&mut rx),
        vec![
            WebviewEvent::NavigationStarted {
                url: "https://a.example".to_string()
            },
            WebviewEvent::NavigationCommitted {
                url: "https://a.example".to_string()
            },
            WebviewEvent::TitleChanged {
                title: "A".to_string()
            },
            WebviewEvent::LoadFinished,
        ]
    );
}

#[test]
fn test_embedded_drops_sub_frame_and_repeated_commits() {
    let webview = EmbeddedWebview::new(RecordingHost::new());
    let mut rx = webview.subscribe();

    webview.load("https://a.example");
    webview.handle_native_event(NativeWebviewEvent::Navigate {
        url: "https://a.example".to_string(),
    });
    webview.handle_native_event(NativeWebviewEvent::NavigateInPage {
        url: "https://ads.example/frame".to_string(),
        is_main_frame: false,
    });
    webview.handle_native_event(NativeWebviewEvent::NavigateInPage {
        url: "https://a.example#section".to_string(),
        is_main_frame: true,
    });
    webview.handle_native_event(NativeWebviewEvent::TitleUpdated { title: String::new() });

    assert_eq!(
        drain(&mut rx),
        vec![WebviewEvent::NavigationCommitted {
            url: "https://a.example#section".to_string()
        }]
    );
    assert_eq!(webview.host().loaded(), vec!["https://a.example".to_string()]);
}

#[rstest]
#[case(ERR_ABORTED)]
#[case(ERR_BLOCKED_BY_CLIENT)]
fn test_embedded_suppresses_benign_failures(#[case] code: i32) {
    let webview = EmbeddedWebview::new(RecordingHost::new());
    let mut rx = webview.subscribe();

    webview.handle_native_event(NativeWebviewEvent::FailLoad(failure(code)));

    assert!(drain(&mut rx).is_empty());
}

#[rstest]
#[case(-2)]
#[case(-105)]
#[case(-106)]
fn test_embedded_reports_real_failures(#[case] code: i32) {
    let webview = EmbeddedWebview::new(RecordingHost::new());
    let mut rx = webview.subscribe();

    webview.handle_native_event(NativeWebviewEvent::FailLoad(failure(code)));

    assert_eq!(drain(&mut rx), vec![WebviewEvent::LoadFailed(failure(code))]);
}

#[test]
fn test_embedded_refused_load_becomes_failure() {
    let webview = EmbeddedWebview::new(RecordingHost::new().refusing());
    let mut rx = webview.subscribe();

    webview.load("https://a.example");

    match drain(&mut rx).as_slice() {
        [WebviewEvent::LoadFailed(f)] => {
            assert_eq!(f.code, ERR_FAILED);
            assert_eq!(f.url, "https://a.example");
        }
        other => panic!("unexpected events: {:?}", other),
    }
}

#[test]
fn test_embedded_commit_after_refused_load_is_reported() {
    let webview = EmbeddedWebview::new(RecordingHost::new().refusing());
    let mut rx = webview.subscribe();
    webview.load("https://a.example");
    drain(&mut rx);

    webview.handle_native_event(NativeWebviewEvent::Navigate {
        url: "https://a.example".to_string(),
    });

    assert_eq!(
        drain(&mut rx),
        vec![WebviewEvent::NavigationCommitted {
            url: "https://a.example".to_string()
        }]
    );
}

// === Frame ===

#[tokio::test]
async fn test_frame_never_executes_scripts() {
    let frame = FrameWebview::new(RecordingFrame::default());
    frame.load("https://a.example");
    assert_eq!(
        frame.execute_script("document.title").await,
        Err(ScriptExecutionError::Unsupported)
    );
}

#[test]
fn test_frame_load_sets_src_and_reports_start() {
    let frame = FrameWebview::new(RecordingFrame::default());
    let mut rx = frame.subscribe();

    frame.load("https://a.example");

    assert_eq!(*frame.host().srcs.borrow(), vec!["https://a.example".to_string()]);
    assert_eq!(
        drain(&mut rx),
        vec![WebviewEvent::NavigationStarted {
            url: "https://a.example".to_string()
        }]
    );
}

#[test]
fn test_frame_same_origin_load_reports_commit_and_title() {
    let frame = FrameWebview::new(RecordingFrame::default());
    frame.load("https://a.example");
    let mut rx = frame.subscribe();

    frame.handle_frame_loaded(Some("https://a.example/next"), Some("Next"));

    assert_eq!(
        drain(&mut rx),
        vec![
            WebviewEvent::NavigationCommitted {
                url: "https://a.example/next".to_string()
            },
            WebviewEvent::TitleChanged {
                title: "Next".to_string()
            },
            WebviewEvent::LoadFinished,
        ]
    );
}

#[test]
fn test_frame_cross_origin_load_only_finishes() {
    let frame = FrameWebview::new(RecordingFrame::default());
    frame.load("https://a.example");
    let mut rx = frame.subscribe();

    frame.handle_frame_loaded(None, None);
    frame.handle_frame_loaded(Some("https://a.example"), Some(""));

    assert_eq!(
        drain(&mut rx),
        vec![WebviewEvent::LoadFinished, WebviewEvent::LoadFinished]
    );
}
