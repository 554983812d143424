//! # Algorithms Module
//!
//! The capability table and the pure functions driven by it.

pub mod classification;
pub mod transition;

pub use classification::{assess, classify};
pub use transition::{
    allowed_commands, ensure_legal, replay, required_roles, target_status, transition, CREATE_UNIT_ROLES,
    UNIT_CAPABILITIES,
};
