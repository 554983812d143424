//! # Domain Module
//!
//! Core domain types for report triage.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
