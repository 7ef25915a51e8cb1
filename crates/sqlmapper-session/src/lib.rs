//! Request-time dispatch for SQLMapper Rust.
//!
//! `sqlmapper-session` sits between application code and the host runtime
//! that actually talks to the database. For every write it runs the same
//! pipeline:
//!
//! 1. **Auto-fill** null fields declared with a `FieldFill` policy
//! 2. **Key assignment** for inserts, per entity and in list order
//! 3. **Batch rewriting** of oversized list parameters
//! 4. **Execution** through the host [`Executor`]
//!
//! # Example
//!
//! ```ignore
//! let mut statements = StatementRegistry::new();
//! statements.register(MappedStatement::new("User.insertAll", SqlCommand::Insert).batch(true));
//!
//! let dispatcher = Dispatcher::new(statements, assigner)
//!     .with_batch_config(BatchConfig::from_env()?)
//!     .with_fill_handler(AuditFill);
//!
//! let rows = dispatcher.insert_all(&executor, "User.insertAll", &mut users)?;
//! ```

pub mod batch;
pub mod config;
pub mod executor;
pub mod fill;
pub mod statement;

pub use batch::BatchRewriter;
pub use config::{BatchConfig, DEFAULT_MAX_BATCH_SIZE, MAX_BATCH_SIZE_ENV, MAX_BATCH_SIZE_KEY};
pub use executor::Executor;
pub use fill::{FillHandler, FillPhase, apply_fill};
pub use statement::{MappedStatement, Parameter, SqlCommand, StatementRegistry};

use std::sync::Arc;

use sqlmapper_core::{Entity, Error, Result};
use sqlmapper_keygen::KeyAssigner;

// ============================================================================
// Dispatcher
// ============================================================================

/// Runs registered statements through fill, key assignment and batching.
#[derive(Clone)]
pub struct Dispatcher {
    statements: StatementRegistry,
    assigner: KeyAssigner,
    rewriter: BatchRewriter,
    fill: Option<Arc<dyn FillHandler>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("statements", &self.statements.len())
            .field("rewriter", &self.rewriter)
            .field("fill", &self.fill.is_some())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher with the default batch configuration and no
    /// fill handler.
    pub fn new(statements: StatementRegistry, assigner: KeyAssigner) -> Self {
        Self {
            statements,
            assigner,
            rewriter: BatchRewriter::default(),
            fill: None,
        }
    }

    /// Use `config` for batch splitting.
    pub fn with_batch_config(mut self, config: BatchConfig) -> Self {
        self.rewriter = BatchRewriter::new(config);
        self
    }

    /// Install an auto-fill handler.
    pub fn with_fill_handler(mut self, handler: impl FillHandler + 'static) -> Self {
        self.fill = Some(Arc::new(handler));
        self
    }

    pub fn statements(&self) -> &StatementRegistry {
        &self.statements
    }

    pub fn assigner(&self) -> &KeyAssigner {
        &self.assigner
    }

    pub fn rewriter(&self) -> &BatchRewriter {
        &self.rewriter
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Insert one entity: fill, assign its key, execute.
    #[tracing::instrument(level = "debug", skip(self, executor, entity))]
    pub fn insert<E, X>(&self, executor: &X, statement: &str, entity: &mut E) -> Result<u64>
    where
        E: Entity,
        X: Executor<E> + ?Sized,
    {
        let mapped = self.lookup(statement, SqlCommand::Insert)?;
        self.fill_one(FillPhase::Insert, entity)?;
        self.assigner.assign(entity)?;
        self.rewriter
            .execute(executor, mapped, Parameter::Single(entity))
    }

    /// Insert a list: fill and assign keys in list order, then execute,
    /// chunked if the statement is batch-capable.
    #[tracing::instrument(level = "debug", skip(self, executor, entities), fields(count = entities.len()))]
    pub fn insert_all<E, X>(&self, executor: &X, statement: &str, entities: &mut [E]) -> Result<u64>
    where
        E: Entity,
        X: Executor<E> + ?Sized,
    {
        let mapped = self.lookup(statement, SqlCommand::Insert)?;
        for entity in entities.iter_mut() {
            self.fill_one(FillPhase::Insert, entity)?;
        }
        self.assigner.assign_all(entities)?;
        self.rewriter
            .execute(executor, mapped, Parameter::List(entities))
    }

    /// Update one entity: fill, execute.
    #[tracing::instrument(level = "debug", skip(self, executor, entity))]
    pub fn update<E, X>(&self, executor: &X, statement: &str, entity: &mut E) -> Result<u64>
    where
        E: Entity,
        X: Executor<E> + ?Sized,
    {
        let mapped = self.lookup(statement, SqlCommand::Update)?;
        self.fill_one(FillPhase::Update, entity)?;
        self.rewriter
            .execute(executor, mapped, Parameter::Single(entity))
    }

    /// Update a list: fill each entity, then execute, chunked if needed.
    #[tracing::instrument(level = "debug", skip(self, executor, entities), fields(count = entities.len()))]
    pub fn update_all<E, X>(&self, executor: &X, statement: &str, entities: &mut [E]) -> Result<u64>
    where
        E: Entity,
        X: Executor<E> + ?Sized,
    {
        let mapped = self.lookup(statement, SqlCommand::Update)?;
        for entity in entities.iter_mut() {
            self.fill_one(FillPhase::Update, entity)?;
        }
        self.rewriter
            .execute(executor, mapped, Parameter::List(entities))
    }

    /// Delete by a list of keys, chunked if needed.
    #[tracing::instrument(level = "debug", skip(self, executor, keys), fields(count = keys.len()))]
    pub fn delete_all<K, X>(&self, executor: &X, statement: &str, keys: &[K]) -> Result<u64>
    where
        X: Executor<K> + ?Sized,
    {
        let mapped = self.lookup(statement, SqlCommand::Delete)?;
        self.rewriter.execute(executor, mapped, Parameter::List(keys))
    }

    fn lookup(&self, statement: &str, expected: SqlCommand) -> Result<&MappedStatement> {
        let mapped = self.statements.get(statement)?;
        if mapped.command() != expected {
            return Err(Error::Custom(format!(
                "Statement '{}' is registered as {:?}, not {:?}",
                statement,
                mapped.command(),
                expected
            )));
        }
        Ok(mapped)
    }

    fn fill_one<E: Entity>(&self, phase: FillPhase, entity: &mut E) -> Result<()> {
        if let Some(handler) = &self.fill {
            apply_fill(handler.as_ref(), phase, entity)?;
        }
        Ok(())
    }
}
