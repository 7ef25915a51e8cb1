//! Snowflake identifier generator.
//!
//! Layout of a generated id, high bit first:
//!
//! ```text
//! | 41 bits: ms since 2021-01-01T00:00:00Z | 10 bits: node | 12 bits: sequence |
//! ```
//!
//! One generator instance owns its `(sequence, last_timestamp)` state behind
//! a single mutex; every `next_id` call serializes on it. The only blocking
//! inside the critical section is the bounded rollback wait (at most 10 ms)
//! and the spin until the next millisecond once a sequence is exhausted.

use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;

use rand::Rng;
use sqlmapper_core::{Error, Result};

use crate::clock::{Clock, SystemClock};
use crate::node::{NodeIdSource, node_id_from_env, validate_node_id};

/// 2021-01-01T00:00:00Z in Unix milliseconds.
pub const EPOCH_MILLIS: i64 = 1_609_459_200_000;

const NODE_SHIFT: u32 = 12;
const TIMESTAMP_SHIFT: u32 = 22;
const SEQUENCE_MASK: i64 = 0xFFF;
const NODE_MASK: i64 = 0x3FF;

/// Largest backward clock jump absorbed by waiting.
pub const MAX_ROLLBACK_WAIT_MS: i64 = 5;

#[derive(Debug)]
struct State {
    sequence: i64,
    last_timestamp: i64,
}

/// Clock-safe, monotonic 64-bit id source.
///
/// # Example
///
/// ```ignore
/// let generator = SnowflakeGenerator::from_env()?;
/// let id = generator.next_id()?;
/// assert_eq!(SnowflakeId::decompose(id).node_id, generator.node_id());
/// ```
#[derive(Debug)]
pub struct SnowflakeGenerator<C: Clock = SystemClock> {
    node_id: i64,
    clock: C,
    state: Mutex<State>,
}

impl SnowflakeGenerator<SystemClock> {
    /// Create a generator with an explicit node id in `0..=1023`.
    pub fn new(node_id: i64) -> Result<Self> {
        Self::with_clock(node_id, SystemClock)
    }

    /// Create a generator whose node id comes from `SNOWFLAKE_NODE_ID`, or
    /// is derived from the process identity when the variable is unset.
    pub fn from_env() -> Result<Self> {
        let (node_id, source) = node_id_from_env()?;
        Ok(Self::build(node_id, source, SystemClock))
    }
}

impl<C: Clock> SnowflakeGenerator<C> {
    /// Create a generator reading time from `clock`.
    pub fn with_clock(node_id: i64, clock: C) -> Result<Self> {
        let node_id = validate_node_id(node_id)?;
        Ok(Self::build(node_id, NodeIdSource::Explicit, clock))
    }

    fn build(node_id: i64, source: NodeIdSource, clock: C) -> Self {
        tracing::info!(node_id, source = source.as_str(), "Snowflake generator ready");
        Self {
            node_id,
            clock,
            state: Mutex::new(State {
                sequence: 0,
                last_timestamp: -1,
            }),
        }
    }

    /// The node id embedded in every generated id.
    pub fn node_id(&self) -> i64 {
        self.node_id
    }

    /// Generate the next id.
    ///
    /// Fails with `ClockRollback` when the clock is behind the last issued
    /// timestamp by more than 5 ms, or is still behind after waiting twice
    /// the drift.
    pub fn next_id(&self) -> Result<i64> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut now = self.clock.now_millis();

        if now < state.last_timestamp {
            let drift = state.last_timestamp - now;
            if drift > MAX_ROLLBACK_WAIT_MS {
                tracing::warn!(drift_ms = drift, "Clock moved backwards beyond recovery bound");
                return Err(Error::ClockRollback { drift_ms: drift });
            }
            tracing::warn!(drift_ms = drift, "Clock moved backwards, waiting");
            self.clock
                .sleep(Duration::from_millis(drift.unsigned_abs() * 2));
            now = self.clock.now_millis();
            if now < state.last_timestamp {
                return Err(Error::ClockRollback {
                    drift_ms: state.last_timestamp - now,
                });
            }
        }

        if now == state.last_timestamp {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                while now <= state.last_timestamp {
                    std::hint::spin_loop();
                    now = self.clock.now_millis();
                }
            }
        } else {
            // Start each millisecond at 1 or 2 so nodes sharing an id by
            // misconfiguration are less likely to collide on their first id.
            state.sequence = rand::thread_rng().gen_range(1..3);
        }

        state.last_timestamp = now;
        Ok(((now - EPOCH_MILLIS) << TIMESTAMP_SHIFT) | (self.node_id << NODE_SHIFT) | state.sequence)
    }
}

/// A source of 64-bit ids, as consumed by the key assigner.
pub trait IdGenerator: Send + Sync {
    /// Produce the next id.
    fn next_id(&self) -> Result<i64>;
}

impl<C: Clock> IdGenerator for SnowflakeGenerator<C> {
    fn next_id(&self) -> Result<i64> {
        SnowflakeGenerator::next_id(self)
    }
}

/// Process-wide generator configured from the environment.
///
/// Built on first successful call; a configuration error is returned to
/// every caller until the environment is fixed.
pub fn global() -> Result<&'static SnowflakeGenerator> {
    static GLOBAL: OnceLock<SnowflakeGenerator> = OnceLock::new();
    if let Some(generator) = GLOBAL.get() {
        return Ok(generator);
    }
    let generator = SnowflakeGenerator::from_env()?;
    Ok(GLOBAL.get_or_init(|| generator))
}

/// The three fields of a Snowflake id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnowflakeId {
    /// Unix milliseconds
    pub timestamp_millis: i64,
    pub node_id: i64,
    pub sequence: i64,
}

impl SnowflakeId {
    /// Split an id into its fields.
    pub const fn decompose(id: i64) -> Self {
        Self {
            timestamp_millis: (id >> TIMESTAMP_SHIFT) + EPOCH_MILLIS,
            node_id: (id >> NODE_SHIFT) & NODE_MASK,
            sequence: id & SEQUENCE_MASK,
        }
    }
}
