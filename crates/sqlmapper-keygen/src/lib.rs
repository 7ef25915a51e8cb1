//! Primary-key generation for SQLMapper Rust.
//!
//! `sqlmapper-keygen` fills null primary keys immediately before an insert.
//!
//! # Role In The Architecture
//!
//! - **Snowflake ids**: [`SnowflakeGenerator`] produces time-ordered 64-bit
//!   ids from an injectable [`Clock`], with the node id resolved from an
//!   explicit value, `SNOWFLAKE_NODE_ID`, or the process identity.
//! - **Custom generators**: [`GeneratorRegistry`] maps names used by
//!   `KeyStrategy::Custom` to caller-supplied [`KeyGenerator`]s.
//! - **Assignment**: [`KeyAssigner`] reads the key field's strategy from the
//!   entity metadata and writes the generated value back.
//!
//! Generators are explicitly constructed and owned. [`snowflake::global`] is a
//! convenience over one environment-configured instance.

pub mod assigner;
pub mod clock;
pub mod node;
pub mod registry;
pub mod snowflake;

pub use assigner::KeyAssigner;
pub use clock::{Clock, SystemClock};
pub use node::{MAX_NODE_ID, NODE_ID_ENV, NodeIdSource, resolve_node_id};
pub use registry::{GeneratorRegistry, KeyGenerator};
pub use snowflake::{EPOCH_MILLIS, IdGenerator, SnowflakeGenerator, SnowflakeId};
