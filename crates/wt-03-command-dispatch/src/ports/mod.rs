//! # Ports Module
//!
//! Inbound API and outbound collaborator traits for command dispatch.

pub mod inbound;
pub mod outbound;

pub use inbound::CommandApi;
pub use outbound::{Clock, CredentialResolver, LedgerSink, ReportStore, UnitStore};
