//! # Domain Module
//!
//! The public unit projection and lookup errors.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
