//! # Ports Module

pub mod inbound;
pub mod outbound;

pub use inbound::VerificationApi;
pub use outbound::{DisclosurePolicy, HistoryReader};
