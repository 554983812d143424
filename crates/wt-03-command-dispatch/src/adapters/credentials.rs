//! Credential Adapter
//!
//! Implements `CredentialResolver` with an in-process token table. Tokens
//! carry an explicit expiry; nothing is cached on the caller's side.

use crate::domain::CredentialError;
use crate::ports::outbound::{Clock, CredentialResolver};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{CapabilityToken, Principal, Timestamp};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug)]
struct Grant {
    principal: Principal,
    expires_at: Timestamp,
    revoked: bool,
}

/// In-memory token issuer and resolver.
pub struct StaticCredentialResolver {
    grants: RwLock<HashMap<String, Grant>>,
    clock: Arc<dyn Clock>,
    ttl_millis: u64,
}

impl StaticCredentialResolver {
    /// Create a resolver whose tokens live for `ttl_millis`.
    pub fn new(clock: Arc<dyn Clock>, ttl_millis: u64) -> Self {
        Self {
            grants: RwLock::new(HashMap::new()),
            clock,
            ttl_millis,
        }
    }

    /// Issue a token for `principal` with the default lifetime.
    pub fn issue(&self, principal: Principal) -> CapabilityToken {
        self.issue_with_ttl(principal, self.ttl_millis)
    }

    /// Issue a token for `principal` that expires after `ttl_millis`.
    pub fn issue_with_ttl(&self, principal: Principal, ttl_millis: u64) -> CapabilityToken {
        let raw = format!("wt_{}", Uuid::new_v4().simple());
        let expires_at = self.clock.now().saturating_add(ttl_millis);
        info!(principal = %principal.id, role = %principal.role, expires_at, "Token issued");
        self.grants.write().insert(
            raw.clone(),
            Grant {
                principal,
                expires_at,
                revoked: false,
            },
        );
        CapabilityToken::new(raw)
    }

    /// Revoke a token. Returns false if it was never issued.
    pub fn revoke(&self, token: &CapabilityToken) -> bool {
        match self.grants.write().get_mut(token.expose()) {
            Some(grant) => {
                grant.revoked = true;
                true
            }
            None => false,
        }
    }

    /// Drop expired grants. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut grants = self.grants.write();
        let before = grants.len();
        grants.retain(|_, grant| grant.expires_at > now);
        before - grants.len()
    }
}

#[async_trait]
impl CredentialResolver for StaticCredentialResolver {
    async fn resolve(&self, token: &CapabilityToken) -> Result<Principal, CredentialError> {
        let grants = self.grants.read();
        let grant = grants.get(token.expose()).ok_or(CredentialError::Unknown)?;
        if grant.revoked {
            return Err(CredentialError::Revoked);
        }
        if grant.expires_at <= self.clock.now() {
            return Err(CredentialError::Expired {
                expired_at: grant.expires_at,
            });
        }
        debug!(principal = %grant.principal.id, role = %grant.principal.role, "Token resolved");
        Ok(grant.principal.clone())
    }
}
