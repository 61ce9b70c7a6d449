// Browser core state managers
// Managers own the tab registry and the operations that must respect its lifetime rules.

pub mod script_runner;
pub mod tab_manager;
