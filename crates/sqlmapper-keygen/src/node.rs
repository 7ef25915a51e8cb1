//! Snowflake node-id resolution.
//!
//! Priority order:
//! 1. an explicit value from the caller, range-checked
//! 2. the `SNOWFLAKE_NODE_ID` environment variable, parsed and range-checked
//!    (unset or blank counts as absent, a non-Unicode value is an error)
//! 3. a hash of `pid@host` reduced modulo 1024, or `1` if the host name
//!    cannot be determined
//!
//! The host name comes from `HOSTNAME`, then `COMPUTERNAME` on Windows, then
//! `/proc/sys/kernel/hostname` and `/etc/hostname`. A process that finds none
//! of these gets node `1`, so hosts like that should set `SNOWFLAKE_NODE_ID`
//! explicitly to keep ids unique across a cluster.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use std::env::VarError;

use sqlmapper_core::{Error, Result, configured_value};

/// Environment variable holding the node id.
pub const NODE_ID_ENV: &str = "SNOWFLAKE_NODE_ID";

/// Largest valid node id (10 bits).
pub const MAX_NODE_ID: i64 = 1023;

const FALLBACK_NODE_ID: i64 = 1;

/// Which rule produced a node id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeIdSource {
    /// Supplied by the caller.
    Explicit,
    /// Read from `SNOWFLAKE_NODE_ID`.
    Environment,
    /// Hashed from process id and host name.
    Derived,
    /// Derivation failed; the fixed fallback was used.
    Fallback,
}

impl NodeIdSource {
    /// Name used in logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            NodeIdSource::Explicit => "explicit",
            NodeIdSource::Environment => "environment",
            NodeIdSource::Derived => "derived",
            NodeIdSource::Fallback => "fallback",
        }
    }
}

/// Check that `node_id` fits in 10 bits.
pub fn validate_node_id(node_id: i64) -> Result<i64> {
    if (0..=MAX_NODE_ID).contains(&node_id) {
        Ok(node_id)
    } else {
        Err(Error::config(
            "nodeId",
            node_id.to_string(),
            "must be between 0 and 1023",
        ))
    }
}

/// Parse a configured node id string.
pub fn parse_node_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| (0..=MAX_NODE_ID).contains(id))
        .ok_or_else(|| Error::config(NODE_ID_ENV, raw, "must be an integer between 0 and 1023"))
}

/// Resolve a node id from an explicit value and a raw configuration value.
pub fn resolve_node_id(
    explicit: Option<i64>,
    configured: Option<&str>,
) -> Result<(i64, NodeIdSource)> {
    if let Some(id) = explicit {
        return Ok((validate_node_id(id)?, NodeIdSource::Explicit));
    }
    if let Some(raw) = configured.filter(|raw| !raw.trim().is_empty()) {
        return Ok((parse_node_id(raw)?, NodeIdSource::Environment));
    }
    Ok(match derive_node_id() {
        Some(id) => (id, NodeIdSource::Derived),
        None => (FALLBACK_NODE_ID, NodeIdSource::Fallback),
    })
}

/// Resolve a node id from `SNOWFLAKE_NODE_ID`, deriving one when unset.
pub fn node_id_from_env() -> Result<(i64, NodeIdSource)> {
    node_id_from_lookup(std::env::var(NODE_ID_ENV))
}

fn node_id_from_lookup(
    lookup: std::result::Result<String, VarError>,
) -> Result<(i64, NodeIdSource)> {
    let configured = configured_value(NODE_ID_ENV, lookup)?;
    resolve_node_id(None, configured.as_deref())
}

const HOST_NAME_VARS: [&str; 2] = ["HOSTNAME", "COMPUTERNAME"];
const HOST_NAME_FILES: [&str; 2] = ["/proc/sys/kernel/hostname", "/etc/hostname"];

fn host_name() -> Option<String> {
    HOST_NAME_VARS
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .chain(
            HOST_NAME_FILES
                .iter()
                .filter_map(|path| std::fs::read_to_string(path).ok()),
        )
        .map(|h| h.trim().to_string())
        .find(|h| !h.is_empty())
}

fn derive_node_id() -> Option<i64> {
    let seed = format!("{}@{}", std::process::id(), host_name()?);
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    i64::try_from(hasher.finish() % 1024).ok()
}
