//! Explicit column overrides for partial updates.

use std::fmt;
use std::marker::PhantomData;

use sqlmapper_core::{Result, Value};

use crate::column::IntoColumn;

/// Ordered `column -> value` overrides for an UPDATE of entity `E`.
///
/// A null value means "write SQL NULL", which differs from leaving the
/// column out. Setting a column again replaces its value but keeps the
/// position of its first assignment, so SET clauses stay stable.
///
/// # Example
///
/// ```ignore
/// let spec = UpdateSpec::<User>::new()
///     .set("name", "Alice")?
///     .clear(User::EMAIL)?
///     .set("name", "Bob")?;
/// assert_eq!(spec.updates().len(), 2);
/// ```
pub struct UpdateSpec<E> {
    updates: Vec<(String, Value)>,
    _marker: PhantomData<fn() -> E>,
}

impl<E> UpdateSpec<E> {
    /// Create an empty spec.
    pub fn new() -> Self {
        Self {
            updates: Vec::new(),
            _marker: PhantomData,
        }
    }

    fn put(&mut self, column: String, value: Value) {
        match self.updates.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.updates.push((column, value)),
        }
    }

    /// Set `column` to `value`; null writes SQL NULL.
    pub fn set(mut self, column: impl IntoColumn<E>, value: impl Into<Value>) -> Result<Self> {
        let column = column.into_column()?;
        self.put(column, value.into());
        Ok(self)
    }

    /// Set `column` to SQL NULL.
    pub fn clear(self, column: impl IntoColumn<E>) -> Result<Self> {
        self.set(column, Value::Null)
    }

    /// Set `column` only when `value` is not null.
    pub fn set_if_not_null(
        mut self,
        column: impl IntoColumn<E>,
        value: impl Into<Value>,
    ) -> Result<Self> {
        let column = column.into_column()?;
        let value = value.into();
        if !value.is_null() {
            self.put(column, value);
        }
        Ok(self)
    }

    /// Merge a bulk mapping with the same rules as [`UpdateSpec::set`].
    ///
    /// Every column is checked before any entry is applied.
    pub fn set_all<C, V>(mut self, entries: impl IntoIterator<Item = (C, V)>) -> Result<Self>
    where
        C: IntoColumn<E>,
        V: Into<Value>,
    {
        let entries = entries
            .into_iter()
            .map(|(c, v)| -> Result<(String, Value)> { Ok((c.into_column()?, v.into())) })
            .collect::<Result<Vec<_>>>()?;
        for (column, value) in entries {
            self.put(column, value);
        }
        Ok(self)
    }

    /// Overrides in first-assignment order.
    pub fn updates(&self) -> &[(String, Value)] {
        &self.updates
    }

    /// Current value for `column`, if set.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.updates
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// Number of columns set.
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Whether no column has been set.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

impl<E> Default for UpdateSpec<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for UpdateSpec<E> {
    fn clone(&self) -> Self {
        Self {
            updates: self.updates.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E> fmt::Debug for UpdateSpec<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateSpec")
            .field("updates", &self.updates)
            .finish()
    }
}
