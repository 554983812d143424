//! # Adapters Module

pub mod disclosure;

pub use disclosure::WithheldCodes;
