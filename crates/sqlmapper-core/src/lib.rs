//! Core types and traits for SQLMapper Rust.
//!
//! `sqlmapper-core` is the **foundation layer** for the workspace. It defines the
//! data model every other crate shares and holds no behavior beyond validation.
//!
//! # Role In The Architecture
//!
//! - **Contract layer**: `Entity` is implemented by user types and exposes a
//!   precomputed field table instead of anything discovered at runtime.
//! - **Data model**: `Value`, `SqlType` and `FieldInfo` describe parameters and
//!   columns for the query builders and the key assigner.
//! - **Validation**: raw column strings are checked against the identifier
//!   grammar before they can reach SQL text.
//!
//! # Who Uses This Crate
//!
//! - `sqlmapper-query` turns `Entity` metadata, conditions and update specs into SQL.
//! - `sqlmapper-keygen` reads `FieldInfo::key_strategy` to fill keys before inserts.
//! - `sqlmapper-session` dispatches requests and reports host failures as `Error`.
//!
//! Most applications should use the `sqlmapper` facade.

pub mod entity;
pub mod env;
pub mod error;
pub mod field;
pub mod identifiers;
pub mod types;
pub mod value;

pub use entity::{Entity, EntityInfo};
pub use env::configured_value;
pub use error::{ConfigError, Error, ExecutionError, Result};
pub use field::{Field, FieldFill, FieldInfo, KeyStrategy, LogicDelete};
pub use identifiers::{is_valid_identifier, validate_column};
pub use types::SqlType;
pub use value::Value;
