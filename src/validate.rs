//! Input guard functions.
//!
//! Every facade validates before resolving or preparing anything remote, so
//! invalid input is rejected synchronously and never costs a round trip.

use crate::error::{AdapterError, AdapterResult};

/// Minimum plausible length for an account identifier.
const MIN_ADDRESS_LEN: usize = 4;

/// Fail with `InvalidAddress` on an empty or malformed account identifier.
///
/// The check is chain-agnostic: non-empty, ASCII-alphanumeric, no interior
/// whitespace. Bindings perform the chain-specific checksum on their side.
pub fn assert_address(value: &str, field: &str) -> AdapterResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AdapterError::InvalidAddress {
            field: field.to_string(),
            reason: "empty string".to_string(),
        });
    }
    if trimmed.len() < MIN_ADDRESS_LEN {
        return Err(AdapterError::InvalidAddress {
            field: field.to_string(),
            reason: format!("shorter than {MIN_ADDRESS_LEN} characters"),
        });
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AdapterError::InvalidAddress {
            field: field.to_string(),
            reason: "contains non-alphanumeric characters".to_string(),
        });
    }
    Ok(())
}

/// Fail with `EmptyField` when the value is empty or whitespace-only.
pub fn assert_non_empty(value: &str, field: &str) -> AdapterResult<()> {
    if value.trim().is_empty() {
        return Err(AdapterError::EmptyField {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Narrow to the 32-bit unsigned width most contract ids use.
pub fn bounded_u32(value: u64, field: &str) -> AdapterResult<u32> {
    u32::try_from(value).map_err(|_| AdapterError::OutOfRange {
        field: field.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_rules() {
        assert!(assert_address("GABCDEF123", "admin").is_ok());
        assert!(assert_address("", "admin").is_err());
        assert!(assert_address("   ", "admin").is_err());
        assert!(assert_address("ab", "admin").is_err());
        assert!(assert_address("GABC DEF", "admin").is_err());
        assert!(assert_address("GABC-DEF", "admin").is_err());

        let err = assert_address("", "organizer").unwrap_err();
        assert!(err.to_string().contains("organizer"));
    }

    #[test]
    fn test_non_empty() {
        assert!(assert_non_empty("hello", "title").is_ok());
        assert!(matches!(
            assert_non_empty(" \t", "title"),
            Err(AdapterError::EmptyField { .. })
        ));
    }

    #[test]
    fn test_bounded_u32() {
        assert_eq!(bounded_u32(0, "id").unwrap(), 0);
        assert_eq!(bounded_u32(u64::from(u32::MAX), "id").unwrap(), u32::MAX);
        assert!(matches!(
            bounded_u32(u64::from(u32::MAX) + 1, "id"),
            Err(AdapterError::OutOfRange { .. })
        ));
    }
}
