use crate::kernel::services::ports::{AuthSettings, IdentityGate, Unauthenticated};
use crate::models::OwnerId;
use rustc_hash::FxHashMap;

/// Bearer-token gate backed by a fixed token table.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenGate {
    tokens: FxHashMap<String, OwnerId>,
}

impl StaticTokenGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(auth: &AuthSettings) -> Self {
        let mut gate = Self::new();
        for (token, owner) in &auth.tokens {
            gate.insert(token.clone(), OwnerId::new(owner.as_str()));
        }
        gate
    }

    pub fn insert(&mut self, token: impl Into<String>, owner: OwnerId) {
        self.tokens.insert(token.into(), owner);
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl IdentityGate for StaticTokenGate {
    fn verify(&self, credentials: Option<&str>) -> Result<OwnerId, Unauthenticated> {
        let raw = credentials.ok_or(Unauthenticated)?.trim();
        let token = raw
            .strip_prefix("Bearer ")
            .or_else(|| raw.strip_prefix("bearer "))
            .unwrap_or(raw)
            .trim();
        if token.is_empty() {
            return Err(Unauthenticated);
        }
        self.tokens.get(token).cloned().ok_or(Unauthenticated)
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/identity.rs"]
mod tests;
