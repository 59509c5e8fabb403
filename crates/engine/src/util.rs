//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Reject empty or all-whitespace names. Accepted names are kept verbatim.
pub(crate) fn require_name(value: &str, label: &str) -> ResultEngine<String> {
    if value.trim().is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(value.to_string())
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| EngineError::Validation(format!("invalid {label} id: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_kept_verbatim_and_required() {
        assert_eq!(require_name("  Food ", "budget").unwrap(), "  Food ");
        assert_eq!(
            require_name("   ", "category"),
            Err(EngineError::Validation(
                "category name must not be empty".to_string()
            ))
        );
    }
}
