//! The host boundary.

use sqlmapper_core::Result;

use crate::statement::{MappedStatement, Parameter};

/// Runs a registered statement against the database.
///
/// Implemented by the host runtime. SQLMapper decides what to run and with
/// which argument; the executor binds the parameters, talks to the driver and
/// reports the affected row count. Driver failures should come back as
/// `Error::Execution`.
pub trait Executor<T> {
    fn execute(&self, statement: &MappedStatement, param: Parameter<'_, T>) -> Result<u64>;
}

impl<T, X> Executor<T> for &X
where
    X: Executor<T> + ?Sized,
{
    fn execute(&self, statement: &MappedStatement, param: Parameter<'_, T>) -> Result<u64> {
        (**self).execute(statement, param)
    }
}
