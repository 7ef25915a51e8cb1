//! Column identifier validation.
//!
//! Raw column strings are the only user text that ends up verbatim in SQL,
//! so they must match `^[a-zA-Z_][a-zA-Z0-9_]*$` before any builder accepts
//! them. Typed [`Field`](crate::Field) references skip this check.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

const IDENTIFIER_PATTERN: &str = r"^[a-zA-Z_][a-zA-Z0-9_]*$";

/// Compiled identifier grammar, built on first use.
fn identifier_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| match Regex::new(IDENTIFIER_PATTERN) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::error!(
                    pattern = IDENTIFIER_PATTERN,
                    error = %e,
                    "Identifier pattern failed to compile, rejecting all raw columns"
                );
                None
            }
        })
        .as_ref()
}

/// Check a raw column name against the identifier grammar.
pub fn is_valid_identifier(name: &str) -> bool {
    identifier_regex().is_some_and(|regex| regex.is_match(name))
}

/// Validate a raw column name, failing with `InvalidColumnIdentifier`.
///
/// # Example
///
/// ```
/// use sqlmapper_core::identifiers::validate_column;
///
/// assert!(validate_column("user_name").is_ok());
/// assert!(validate_column("name; DROP TABLE users").is_err());
/// ```
pub fn validate_column(name: &str) -> Result<()> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(Error::InvalidColumnIdentifier(name.to_string()))
    }
}
