//! Condition trees, update specs and SQL synthesis for SQLMapper Rust.
//!
//! `sqlmapper-query` turns data-access intents into parameterized SQL text.
//!
//! # Role In The Architecture
//!
//! - **Condition model**: [`Condition`] is a closed predicate tree and
//!   [`ConditionWrapper`] accumulates top-level predicates, ORDER BY and
//!   GROUP BY for one entity.
//! - **Partial updates**: [`UpdateSpec`] holds ordered column overrides.
//! - **Synthesis**: [`synth`] walks the tree and emits SQL whose placeholders
//!   carry a [`ParamPath`] into the caller's object graph.
//! - **Entity statements**: [`SelectBuilder`], [`InsertBuilder`],
//!   [`InsertManyBuilder`], [`UpdateBuilder`], [`BatchUpdateBuilder`] and
//!   [`DeleteBuilder`] derive complete statements from `Entity` metadata.
//!
//! Nothing here executes SQL. Synthesis is pure and safe to run
//! concurrently for distinct inputs.

pub mod builder;
pub mod column;
pub mod condition;
pub mod param;
pub mod select;
pub mod synth;
pub mod update;
pub mod wrapper;

#[cfg(test)]
mod fixtures;

pub use builder::{BatchUpdateBuilder, DeleteBuilder, InsertBuilder, InsertManyBuilder, UpdateBuilder};
pub use column::IntoColumn;
pub use condition::{Condition, Logic, Operator};
pub use param::{Dialect, EntityList, EntityRef, ParamPath, Params, Resolve, Segment, Statement};
pub use select::SelectBuilder;
pub use synth::{SqlWriter, build_condition, build_set_clause, build_where_clause};
pub use update::UpdateSpec;
pub use wrapper::{ConditionWrapper, OrderItem};
