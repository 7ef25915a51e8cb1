//! Batch splitting configuration.

use std::collections::HashMap;
use std::env::VarError;

use sqlmapper_core::{Error, Result, configured_value};

/// Property key for the chunk size.
pub const MAX_BATCH_SIZE_KEY: &str = "maxBatchSize";

/// Environment variable for the chunk size.
pub const MAX_BATCH_SIZE_ENV: &str = "SQLMAPPER_MAX_BATCH_SIZE";

/// Chunk size used when nothing is configured.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 500;

/// Configuration for a [`BatchRewriter`](crate::BatchRewriter).
///
/// The chunk size is always positive; every constructor checks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    max_batch_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl BatchConfig {
    /// Create a configuration with an explicit chunk size (must be positive).
    pub fn new(max_batch_size: usize) -> Result<Self> {
        if max_batch_size == 0 {
            return Err(Error::config(
                MAX_BATCH_SIZE_KEY,
                "0",
                "must be a positive integer",
            ));
        }
        Ok(Self { max_batch_size })
    }

    /// Read `maxBatchSize` from a property map, defaulting when absent.
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self> {
        match properties.get(MAX_BATCH_SIZE_KEY) {
            Some(raw) => Self::new(parse_size(MAX_BATCH_SIZE_KEY, raw)?),
            None => Ok(Self::default()),
        }
    }

    /// Read `SQLMAPPER_MAX_BATCH_SIZE`, defaulting when unset or blank.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(std::env::var(MAX_BATCH_SIZE_ENV))
    }

    fn from_lookup(lookup: std::result::Result<String, VarError>) -> Result<Self> {
        match configured_value(MAX_BATCH_SIZE_ENV, lookup)? {
            Some(raw) => Self::new(parse_size(MAX_BATCH_SIZE_ENV, &raw)?),
            None => Ok(Self::default()),
        }
    }

    /// Largest list passed to one statement invocation.
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Set the chunk size.
    pub fn with_max_batch_size(self, max_batch_size: usize) -> Result<Self> {
        Self::new(max_batch_size)
    }
}

fn parse_size(key: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|size| *size > 0)
        .ok_or_else(|| Error::config(key, raw, "must be a positive integer"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_500() {
        assert_eq!(BatchConfig::default().max_batch_size(), 500);
    }

    #[test]
    fn test_zero_rejected() {
        assert!(BatchConfig::new(0).is_err());
        assert!(BatchConfig::default().with_max_batch_size(0).is_err());
        assert_eq!(BatchConfig::new(1).unwrap().max_batch_size(), 1);
    }

    #[test]
    fn test_from_properties() {
        let mut props = HashMap::new();
        assert_eq!(BatchConfig::from_properties(&props).unwrap(), BatchConfig::default());

        props.insert(MAX_BATCH_SIZE_KEY.to_string(), " 200 ".to_string());
        assert_eq!(BatchConfig::from_properties(&props).unwrap().max_batch_size(), 200);

        props.insert(MAX_BATCH_SIZE_KEY.to_string(), "lots".to_string());
        let err = BatchConfig::from_properties(&props).unwrap_err();
        assert!(matches!(err, Error::Config(ref e) if e.key == "maxBatchSize" && e.value == "lots"));

        props.insert(MAX_BATCH_SIZE_KEY.to_string(), "-5".to_string());
        assert!(BatchConfig::from_properties(&props).is_err());
    }

    #[test]
    fn test_environment_lookup() {
        assert_eq!(
            BatchConfig::from_lookup(Err(VarError::NotPresent)).unwrap(),
            BatchConfig::default()
        );
        assert_eq!(
            BatchConfig::from_lookup(Ok(" ".to_string())).unwrap(),
            BatchConfig::default()
        );
        assert_eq!(
            BatchConfig::from_lookup(Ok("50".to_string())).unwrap().max_batch_size(),
            50
        );
        assert!(BatchConfig::from_lookup(Ok("0".to_string())).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_environment_value_is_rejected() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(b"\xff50".to_vec());
        let err = BatchConfig::from_lookup(Err(VarError::NotUnicode(raw))).unwrap_err();
        assert!(matches!(err, Error::Config(ref e) if e.key == MAX_BATCH_SIZE_ENV));
    }
}
