//! # Event Handlers
//!
//! Long-running tasks spawned at startup. Handlers observe the bus; they
//! never issue commands, so events cannot cascade.

pub mod audit;
pub mod maintenance;

pub use audit::AuditHandler;
pub use maintenance::TokenSweeper;
