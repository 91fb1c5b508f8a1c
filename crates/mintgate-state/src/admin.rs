//! # Administrative Capability
//!
//! Privileged mutators on the engine take `&AdminCapability`. The engine
//! is created together with exactly one capability and keeps only its id;
//! presenting any other capability yields `PrivilegeDenied`.
//!
//! Comparison is constant-time (`subtle`) so a caller probing with forged
//! ids learns nothing from response timing.

use subtle::ConstantTimeEq;
use uuid::Uuid;

use mintgate_core::IssuanceError;

/// Proof of administrative privilege over one engine.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCapability(Uuid);

impl AdminCapability {
    /// Mint a fresh random capability.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Rebuild a capability from its persisted id.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// The capability id, for persistence.
    pub fn id(&self) -> Uuid {
        self.0
    }

    /// Check `presented` against this (expected) capability.
    pub(crate) fn authorize(&self, presented: &AdminCapability) -> Result<(), IssuanceError> {
        if bool::from(self.0.as_bytes().ct_eq(presented.0.as_bytes())) {
            Ok(())
        } else {
            tracing::warn!("administrative call rejected: capability mismatch");
            Err(IssuanceError::PrivilegeDenied)
        }
    }
}

impl std::fmt::Debug for AdminCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminCapability([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_capability_authorizes() {
        let cap = AdminCapability::generate();
        let copy = AdminCapability::from_uuid(cap.id());
        assert!(cap.authorize(&copy).is_ok());
    }

    #[test]
    fn test_foreign_capability_denied() {
        let cap = AdminCapability::generate();
        let other = AdminCapability::generate();
        assert_eq!(cap.authorize(&other), Err(IssuanceError::PrivilegeDenied));
    }

    #[test]
    fn test_debug_is_redacted() {
        let cap = AdminCapability::generate();
        let dbg = format!("{cap:?}");
        assert!(!dbg.contains(&cap.id().to_string()));
        assert!(dbg.contains("REDACTED"));
    }
}
