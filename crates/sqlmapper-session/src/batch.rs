//! Splitting oversized list parameters into sequential chunks.
//!
//! Only statements registered as batch-capable are touched, and only when
//! invoked with a list:
//!
//! - an empty list returns `0` without reaching the executor
//! - a list of at most `max_batch_size` items passes through unchanged
//! - a longer list is split into contiguous chunks, executed one after the
//!   other on the calling thread, and the row counts are summed
//!
//! A failing chunk aborts the call. Chunks that already ran are not undone
//! here; callers that need all-or-nothing must wrap the call in a
//! transaction of their own.

use sqlmapper_core::Result;

use crate::config::BatchConfig;
use crate::executor::Executor;
use crate::statement::{MappedStatement, Parameter};

/// Chunks list parameters of batch-capable statements.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchRewriter {
    config: BatchConfig,
}

impl BatchRewriter {
    /// Create a rewriter with the given configuration.
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run `statement` through `executor`, chunking the list if needed.
    pub fn execute<T, X>(
        &self,
        executor: &X,
        statement: &MappedStatement,
        param: Parameter<'_, T>,
    ) -> Result<u64>
    where
        X: Executor<T> + ?Sized,
    {
        let items = match param.as_list() {
            Some(items) if statement.is_batch() => items,
            _ => return executor.execute(statement, param),
        };

        if items.is_empty() {
            tracing::debug!(statement = statement.id(), "Empty batch, nothing to execute");
            return Ok(0);
        }

        let max = self.config.max_batch_size();
        if items.len() <= max {
            return executor.execute(statement, param);
        }

        let chunks = items.len().div_ceil(max);
        tracing::debug!(
            statement = statement.id(),
            items = items.len(),
            max_batch_size = max,
            chunks,
            "Splitting batch"
        );

        let mut total = 0;
        for (index, chunk) in items.chunks(max).enumerate() {
            tracing::debug!(
                statement = statement.id(),
                chunk = index,
                size = chunk.len(),
                "Executing batch chunk"
            );
            match executor.execute(statement, Parameter::List(chunk)) {
                Ok(rows) => total += rows,
                Err(e) => {
                    tracing::warn!(
                        statement = statement.id(),
                        chunk = index,
                        chunks,
                        rows_applied = total,
                        error = %e,
                        "Batch chunk failed; earlier chunks are not rolled back"
                    );
                    return Err(e);
                }
            }
        }
        Ok(total)
    }
}
