//! # Metadata Resolver
//!
//! Pure function of `(base_uri, id, revealed)`:
//!
//! - unissued id → `UnknownItem`
//! - unrevealed → `base_uri` unchanged (the placeholder)
//! - revealed, empty `base_uri` → `""`
//! - revealed → `base_uri + id + ".json"`

use mintgate_core::{Count, IssuanceError, ItemId, PhaseState};

/// Suffix appended to revealed item URIs.
pub const METADATA_SUFFIX: &str = ".json";

/// Resolve the metadata URI of `id` given `issued` items so far.
pub fn resolve_uri(phase: &PhaseState, issued: Count, id: ItemId) -> Result<String, IssuanceError> {
    if id.get() == 0 || id.get() > issued {
        return Err(IssuanceError::UnknownItem(id.get()));
    }
    if !phase.revealed {
        return Ok(phase.base_uri.clone());
    }
    if phase.base_uri.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("{}{}{}", phase.base_uri, id, METADATA_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase(revealed: bool, base_uri: &str) -> PhaseState {
        PhaseState {
            revealed,
            base_uri: base_uri.to_string(),
            ..PhaseState::default()
        }
    }

    #[test]
    fn test_unknown_item() {
        let p = phase(true, "ipfs://x/");
        assert_eq!(resolve_uri(&p, 3, ItemId(4)), Err(IssuanceError::UnknownItem(4)));
        assert_eq!(resolve_uri(&p, 3, ItemId(0)), Err(IssuanceError::UnknownItem(0)));
    }

    #[test]
    fn test_placeholder_until_revealed() {
        let p = phase(false, "ipfs://hidden.json");
        assert_eq!(resolve_uri(&p, 3, ItemId(2)).unwrap(), "ipfs://hidden.json");
        // Stable across calls.
        assert_eq!(resolve_uri(&p, 3, ItemId(2)).unwrap(), "ipfs://hidden.json");
    }

    #[test]
    fn test_revealed_uri() {
        let p = phase(true, "ipfs://cid/");
        assert_eq!(resolve_uri(&p, 3, ItemId(3)).unwrap(), "ipfs://cid/3.json");
    }

    #[test]
    fn test_revealed_empty_base() {
        let p = phase(true, "");
        assert_eq!(resolve_uri(&p, 3, ItemId(1)).unwrap(), "");
    }
}
