//! # Adapters
//!
//! Port implementations that connect one subsystem to another.

pub mod history;

pub use history::StoreHistoryReader;
