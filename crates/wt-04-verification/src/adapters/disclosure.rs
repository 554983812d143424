//! Disclosure Adapter
//!
//! Implements `DisclosurePolicy` with a set of withheld codes that can be
//! changed at runtime.

use crate::ports::outbound::DisclosurePolicy;
use parking_lot::RwLock;
use shared_types::UnitCode;
use std::collections::HashSet;
use tracing::info;

/// In-memory withheld-code list. Empty means every code is disclosed.
#[derive(Debug, Default)]
pub struct WithheldCodes {
    codes: RwLock<HashSet<UnitCode>>,
}

impl WithheldCodes {
    /// Withhold the given codes.
    pub fn new(codes: impl IntoIterator<Item = UnitCode>) -> Self {
        Self {
            codes: RwLock::new(codes.into_iter().collect()),
        }
    }

    /// Start withholding `code`. Returns false if it was already withheld.
    pub fn withhold(&self, code: UnitCode) -> bool {
        info!(code = %code, "Code withheld from public verification");
        self.codes.write().insert(code)
    }

    /// Disclose `code` again. Returns false if it was not withheld.
    pub fn release(&self, code: &UnitCode) -> bool {
        self.codes.write().remove(code)
    }

    /// Number of withheld codes.
    pub fn len(&self) -> usize {
        self.codes.read().len()
    }

    /// Whether nothing is withheld.
    pub fn is_empty(&self) -> bool {
        self.codes.read().is_empty()
    }
}

impl DisclosurePolicy for WithheldCodes {
    fn is_withheld(&self, code: &UnitCode) -> bool {
        self.codes.read().contains(code)
    }
}
