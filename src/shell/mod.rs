//! Shell event routing and request de-duplication.

pub mod dedup;
pub mod router;

pub use router::{HostBridge, RouteOutcome, ShellEventRouter};
