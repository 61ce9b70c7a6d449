//! focusbrowser: tab, navigation and focus-mode core of an AI study browser.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod managers;
pub mod navigation;
pub mod services;
pub mod shell;
pub mod types;
pub mod webview;
