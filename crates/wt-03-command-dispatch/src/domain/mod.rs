//! # Domain Module
//!
//! Error taxonomy, receipts and role queues for command dispatch.

pub mod errors;
pub mod queues;
pub mod value_objects;

pub use errors::*;
pub use queues::*;
pub use value_objects::*;
