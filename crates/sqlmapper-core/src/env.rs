//! Reading optional settings from the process environment.
//!
//! An unset or blank variable is absent. A variable that is set but not
//! valid Unicode is a configuration error, never silently ignored.

use std::env::VarError;

use crate::error::{Error, Result};

/// Classify the outcome of `std::env::var(key)`, trimming a present value.
pub fn configured_value(
    key: &str,
    lookup: std::result::Result<String, VarError>,
) -> Result<Option<String>> {
    match lookup {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => Ok(Some(raw.trim().to_string())),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(Error::config(
            key,
            raw.to_string_lossy(),
            "is not valid Unicode",
        )),
    }
}
