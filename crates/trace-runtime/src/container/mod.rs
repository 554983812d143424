//! # Service Container
//!
//! Holds every subsystem instance with its adapters, wired once at startup.

pub mod config;
pub mod services;

pub use config::{ConfigError, RuntimeConfig};
pub use services::{Dispatcher, ServiceContainer, Verifier};
