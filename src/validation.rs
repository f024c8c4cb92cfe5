//! Input validation for identifiers that get interpolated into SQL.
//!
//! Whitelist, not blacklist: only alphanumerics and underscore are allowed,
//! checked before any DDL text is assembled. Quoting still happens at the
//! connection layer; this check exists so a hostile view name can never
//! reach the statement builder at all.

use crate::error::{ViewError, ViewResult};

/// Longest identifier any supported backend accepts (Postgres truncates at 63)
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validate a view/table identifier.
///
/// Allows: alphanumeric + underscore, not starting with a digit.
/// Rejects: quotes, semicolons, dashes, spaces, dots, empty names.
pub fn validate_identifier(identifier: &str, param_name: &str) -> ViewResult<()> {
    if identifier.is_empty() {
        return Err(ViewError::InvalidIdentifier {
            name: identifier.to_string(),
            reason: format!("{param_name} must not be empty"),
        });
    }

    if identifier.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ViewError::InvalidIdentifier {
            name: identifier.to_string(),
            reason: format!("{param_name} exceeds {MAX_IDENTIFIER_LENGTH} characters"),
        });
    }

    if identifier.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return Err(ViewError::InvalidIdentifier {
            name: identifier.to_string(),
            reason: format!("{param_name} must not start with a digit"),
        });
    }

    if let Some(bad) = identifier.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
        return Err(ViewError::InvalidIdentifier {
            name: identifier.to_string(),
            reason: format!("{param_name} contains disallowed character '{bad}'"),
        });
    }

    Ok(())
}
