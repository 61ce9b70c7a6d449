//! Navigation: address normalization and the focus-mode gate.

pub mod address;
pub mod gate;

pub use gate::{NavigationGate, NavigationOutcome, NavigationSource};
