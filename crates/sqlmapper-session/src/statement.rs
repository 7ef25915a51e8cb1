//! Registered statements and their invocation parameters.

use std::collections::HashMap;

use sqlmapper_core::{Error, Result};

/// The kind of SQL a statement runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlCommand {
    Select,
    Insert,
    Update,
    Delete,
}

/// A statement known to the dispatcher.
///
/// Batch capability is fixed here, when the statement is registered, and is
/// never rediscovered per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedStatement {
    id: String,
    command: SqlCommand,
    batch: bool,
}

impl MappedStatement {
    /// Create a non-batch statement.
    pub fn new(id: impl Into<String>, command: SqlCommand) -> Self {
        Self {
            id: id.into(),
            command,
            batch: false,
        }
    }

    /// Mark the statement as accepting a list that may be split into chunks.
    pub fn batch(mut self, batch: bool) -> Self {
        self.batch = batch;
        self
    }

    /// The statement id (for example `UserMapper.insertAll`).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn command(&self) -> SqlCommand {
        self.command
    }

    /// Whether list parameters may be split into chunks.
    pub fn is_batch(&self) -> bool {
        self.batch
    }
}

/// Lookup table of statements, built once at setup.
#[derive(Debug, Default, Clone)]
pub struct StatementRegistry {
    statements: HashMap<String, MappedStatement>,
}

impl StatementRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a statement, replacing any previous one with the same id.
    pub fn register(&mut self, statement: MappedStatement) -> &mut Self {
        tracing::debug!(
            statement = statement.id(),
            batch = statement.is_batch(),
            "Registering statement"
        );
        self.statements.insert(statement.id.clone(), statement);
        self
    }

    /// Look up a statement by id.
    pub fn get(&self, id: &str) -> Result<&MappedStatement> {
        self.statements
            .get(id)
            .ok_or_else(|| Error::UnknownStatement(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// The argument a statement is invoked with.
#[derive(Debug)]
pub enum Parameter<'a, T> {
    /// One entity or value.
    Single(&'a T),
    /// A homogeneous list; the only shape the batch rewriter splits.
    List(&'a [T]),
}

impl<T> Clone for Parameter<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Parameter<'_, T> {}

impl<'a, T> Parameter<'a, T> {
    /// The list, if this is a list parameter.
    pub fn as_list(&self) -> Option<&'a [T]> {
        match self {
            Parameter::Single(_) => None,
            Parameter::List(items) => Some(items),
        }
    }

    /// Number of items carried.
    pub fn len(&self) -> usize {
        match self {
            Parameter::Single(_) => 1,
            Parameter::List(items) => items.len(),
        }
    }

    /// True for an empty list.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let mut registry = StatementRegistry::new();
        registry
            .register(MappedStatement::new("User.insertAll", SqlCommand::Insert).batch(true))
            .register(MappedStatement::new("User.findById", SqlCommand::Select));

        assert_eq!(registry.len(), 2);
        assert!(registry.get("User.insertAll").unwrap().is_batch());
        assert!(!registry.get("User.findById").unwrap().is_batch());
        assert!(matches!(
            registry.get("User.missing"),
            Err(Error::UnknownStatement(ref id)) if id == "User.missing"
        ));
    }

    #[test]
    fn test_parameter_shape() {
        let items = [1, 2, 3];
        assert_eq!(Parameter::List(&items[..]).as_list(), Some(&items[..]));
        assert_eq!(Parameter::Single(&items[0]).as_list(), None);
        assert!(Parameter::<i32>::List(&[]).is_empty());
        assert_eq!(Parameter::Single(&5).len(), 1);
    }
}
