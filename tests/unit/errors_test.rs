use std::error::Error;
use std::time::Duration;

use focusbrowser::types::errors::*;

// === ScriptExecutionError Tests ===

#[test]
fn script_error_display_variants() {
    assert_eq!(
        ScriptExecutionError::Unsupported.to_string(),
        "Script execution is not supported by this webview"
    );
    assert_eq!(
        ScriptExecutionError::Detached("tab-1".to_string()).to_string(),
        "No webview attached to tab: tab-1"
    );
    assert_eq!(
        ScriptExecutionError::Discarded("tab-2".to_string()).to_string(),
        "Script result discarded for tab: tab-2"
    );
    assert_eq!(
        ScriptExecutionError::Script("TypeError".to_string()).to_string(),
        "Script failed: TypeError"
    );
}

// === PolicyCheckError Tests ===

#[test]
fn policy_error_display_variants() {
    assert_eq!(
        PolicyCheckError::Network("refused".to_string()).to_string(),
        "Focus backend unreachable: refused"
    );
    assert_eq!(
        PolicyCheckError::Timeout(Duration::from_secs(5)).to_string(),
        "Focus check timed out after 5s"
    );
    assert_eq!(
        PolicyCheckError::Status(502).to_string(),
        "Focus backend returned status 502"
    );
    assert_eq!(
        PolicyCheckError::Decode("missing field".to_string()).to_string(),
        "Malformed focus response: missing field"
    );
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::Io("disk full".to_string()).to_string(),
        "Settings I/O error: disk full"
    );
    assert_eq!(
        SettingsError::InvalidKey("a.b".to_string()).to_string(),
        "Invalid settings key: a.b"
    );
}

// === ClientError Tests ===

#[test]
fn client_error_keeps_parse_source() {
    let source = url::Url::parse("::").unwrap_err();
    let err = ClientError::InvalidBaseUrl {
        url: "::".to_string(),
        source,
    };
    assert!(err.to_string().starts_with("Invalid backend URL '::'"));
    assert!(err.source().is_some());
}

#[test]
fn errors_implement_error_trait() {
    let err: Box<dyn Error> = Box::new(PolicyCheckError::Status(404));
    assert!(err.source().is_none());
}
