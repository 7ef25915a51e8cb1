//! Column arguments accepted by the builders.

use sqlmapper_core::{Field, Result, validate_column};

/// Something that names a column of entity `E`.
///
/// Raw strings are checked against the identifier grammar; typed
/// [`Field`] references were fixed next to the entity and are trusted.
pub trait IntoColumn<E> {
    /// Produce the column name, failing with `InvalidColumnIdentifier`.
    fn into_column(self) -> Result<String>;
}

impl<E> IntoColumn<E> for &str {
    fn into_column(self) -> Result<String> {
        validate_column(self)?;
        Ok(self.to_string())
    }
}

impl<E> IntoColumn<E> for String {
    fn into_column(self) -> Result<String> {
        validate_column(&self)?;
        Ok(self)
    }
}

impl<E> IntoColumn<E> for &String {
    fn into_column(self) -> Result<String> {
        validate_column(self)?;
        Ok(self.clone())
    }
}

impl<E> IntoColumn<E> for Field<E> {
    fn into_column(self) -> Result<String> {
        Ok(self.column.to_string())
    }
}
