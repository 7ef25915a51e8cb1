//! SQLMapper Rust - type-safe SQL fragment synthesis for mapper-style data access.
//!
//! `sqlmapper` is the facade crate. It re-exports the workspace so most
//! applications depend on this crate alone.
//!
//! # What Lives Where
//!
//! - `sqlmapper-core`: `Value`, `Error`, field metadata and the `Entity` trait
//! - `sqlmapper-query`: conditions, wrappers, update specs and SQL synthesis
//! - `sqlmapper-keygen`: Snowflake ids and primary-key assignment
//! - `sqlmapper-session`: statement registry, batch splitting, auto-fill and
//!   the request dispatcher
//!
//! # Example
//!
//! ```ignore
//! use sqlmapper::prelude::*;
//!
//! let wrapper = ConditionWrapper::<User>::new()
//!     .eq("user_name", "alice")?
//!     .gt(User::AGE, 18)?
//!     .in_list("status", [1, 2])?
//!     .order_by_desc("id")?;
//!
//! // user_name = #{conditions[0].value} AND age > ... AND status IN (...)
//! let where_clause = build_where_clause(&wrapper, Dialect::Named)?;
//!
//! // SELECT ... FROM user_info WHERE ... AND is_deleted = 0 ORDER BY id DESC
//! let (sql, params) = SelectBuilder::by_condition(&wrapper).build()?;
//! ```

pub use sqlmapper_core as core;
pub use sqlmapper_keygen as keygen;
pub use sqlmapper_query as query;
pub use sqlmapper_session as session;

pub use sqlmapper_core::{
    ConfigError, Entity, EntityInfo, Error, ExecutionError, Field, FieldFill, FieldInfo,
    KeyStrategy, LogicDelete, Result, SqlType, Value, is_valid_identifier,
    validate_column,
};
pub use sqlmapper_keygen::{
    Clock, GeneratorRegistry, IdGenerator, KeyAssigner, KeyGenerator, NodeIdSource,
    SnowflakeGenerator, SnowflakeId, SystemClock,
};
pub use sqlmapper_query::{
    BatchUpdateBuilder, Condition, ConditionWrapper, DeleteBuilder, Dialect, EntityList,
    EntityRef, InsertBuilder, InsertManyBuilder, IntoColumn, Logic, Operator, OrderItem,
    ParamPath, Params, Resolve, SelectBuilder, Statement, UpdateBuilder, UpdateSpec,
    build_condition, build_set_clause, build_where_clause,
};
pub use sqlmapper_session::{
    BatchConfig, BatchRewriter, Dispatcher, Executor, FillHandler, FillPhase, MappedStatement,
    Parameter, SqlCommand, StatementRegistry,
};

/// Commonly used items.
pub mod prelude {
    pub use crate::{
        BatchConfig, Condition, ConditionWrapper, DeleteBuilder, Dialect, Dispatcher, Entity,
        Error, Executor, Field, FieldFill, FieldInfo, FillHandler, FillPhase, GeneratorRegistry,
        InsertBuilder, InsertManyBuilder, KeyAssigner, KeyStrategy, LogicDelete,
        MappedStatement, Parameter, Result, SelectBuilder, SnowflakeGenerator, SqlCommand,
        SqlType, StatementRegistry, UpdateBuilder, UpdateSpec, Value, build_condition,
        build_set_clause, build_where_clause,
    };
}
