//! # Trace Runtime Library
//!
//! Wires the Water-Trace subsystems together and exposes the surfaces the
//! UI or API layer calls. The `trace-runtime` binary is a thin wrapper.
//!
//! ## Architectural Patterns
//!
//! - **Hexagonal Architecture**: subsystems see only ports; this crate picks
//!   the adapters
//! - **Event-Driven**: accepted transitions reach the audit log and metrics
//!   through the bus, never through direct calls
//! - **No Cascade**: handlers observe; they never issue commands

#![warn(missing_docs)]
#![allow(clippy::type_complexity)]

pub mod adapters;
pub mod container;
pub mod handlers;
pub mod runtime;
pub mod surface;

pub use container::{ConfigError, RuntimeConfig, ServiceContainer};
pub use runtime::TraceRuntime;
pub use surface::TraceSurface;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
