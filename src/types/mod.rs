// Shared type definitions for the browser core.
// Each submodule defines plain data used across managers, the gate and the router.

pub mod errors;
pub mod events;
pub mod focus;
pub mod settings;
pub mod tab;
pub mod webview;
