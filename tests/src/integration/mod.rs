//! Integration tests across the wired subsystems.

pub mod concurrency;
pub mod dispatch_rules;
pub mod properties;
pub mod scenarios;
pub mod wire;
