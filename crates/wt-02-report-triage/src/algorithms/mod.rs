//! # Algorithms Module
//!
//! The triage capability table and the transition function.

pub mod triage;

pub use triage::{
    allowed_commands, required_roles, target_status, transition, ANNOTATE_ROLES,
    REPORT_CAPABILITIES, TRIAGE_READ_ROLES,
};
