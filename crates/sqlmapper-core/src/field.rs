//! Field and column definitions.

use std::marker::PhantomData;

use crate::types::SqlType;

/// Policy governing how a primary-key value is produced before an insert.
///
/// The assigner only consults the strategy when the key is still null; a
/// caller-supplied value is always kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStrategy {
    /// The store generates the value (autoincrement column). No-op.
    Auto,
    /// 32 lowercase hex characters from a random 128-bit identifier.
    Uuid,
    /// The caller must supply the value; a null key is an error.
    Assign,
    /// No intervention at all.
    #[default]
    None,
    /// Look up the named generator in the shared registry.
    Custom(&'static str),
    /// Delegate to the Snowflake generator. BIGINT keys only.
    Snowflake,
}

impl KeyStrategy {
    /// Tag name used in logs and errors.
    pub const fn as_str(&self) -> &'static str {
        match self {
            KeyStrategy::Auto => "AUTO",
            KeyStrategy::Uuid => "UUID",
            KeyStrategy::Assign => "ASSIGN",
            KeyStrategy::None => "NONE",
            KeyStrategy::Custom(_) => "CUSTOM",
            KeyStrategy::Snowflake => "SNOWFLAKE",
        }
    }
}

/// Marker for a logical-delete column and its two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicDelete {
    /// SQL literal written when a row is deleted
    pub deleted: &'static str,
    /// SQL literal of a live row
    pub normal: &'static str,
}

impl LogicDelete {
    /// Create a logic-delete marker with explicit literals.
    pub const fn new(deleted: &'static str, normal: &'static str) -> Self {
        Self { deleted, normal }
    }
}

impl Default for LogicDelete {
    fn default() -> Self {
        Self::new("1", "0")
    }
}

/// When a field is auto-filled by a `FillHandler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldFill {
    /// Never auto-filled.
    #[default]
    Default,
    /// Filled before inserts.
    Insert,
    /// Filled before updates.
    Update,
    /// Filled before inserts and updates.
    ///
    /// Only null fields are filled unless the fill handler asks to replace
    /// existing values.
    InsertUpdate,
}

impl FieldFill {
    /// Whether the field is filled on insert.
    pub const fn on_insert(&self) -> bool {
        matches!(self, FieldFill::Insert | FieldFill::InsertUpdate)
    }

    /// Whether the field is filled on update.
    pub const fn on_update(&self) -> bool {
        matches!(self, FieldFill::Update | FieldFill::InsertUpdate)
    }
}

/// Metadata about an entity field/column.
///
/// Entities hand these out as a precomputed static table; nothing in
/// SQLMapper inspects the entity type itself.
#[derive(Debug, Clone, Copy)]
pub struct FieldInfo {
    /// Rust field name (also the parameter-path segment)
    pub name: &'static str,
    /// Database column name (may differ from field name)
    pub column_name: &'static str,
    /// SQL type for this field
    pub sql_type: SqlType,
    /// Whether this is the primary key
    pub primary_key: bool,
    /// Key generation strategy (only meaningful on the key field)
    pub key_strategy: KeyStrategy,
    /// Not persisted; excluded from every statement
    pub ignore: bool,
    /// Logical-delete marker
    pub logic_delete: Option<LogicDelete>,
    /// Auto-fill policy
    pub fill: FieldFill,
}

impl FieldInfo {
    /// Create a new field info with minimal required data.
    pub const fn new(name: &'static str, column_name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            column_name,
            sql_type,
            primary_key: false,
            key_strategy: KeyStrategy::None,
            ignore: false,
            logic_delete: None,
            fill: FieldFill::Default,
        }
    }

    /// Mark this field as the primary key with the given strategy.
    pub const fn primary_key(mut self, strategy: KeyStrategy) -> Self {
        self.primary_key = true;
        self.key_strategy = strategy;
        self
    }

    /// Exclude this field from persistence.
    pub const fn ignore(mut self, value: bool) -> Self {
        self.ignore = value;
        self
    }

    /// Mark this field as the logical-delete column.
    pub const fn logic_delete(mut self, marker: LogicDelete) -> Self {
        self.logic_delete = Some(marker);
        self
    }

    /// Set the auto-fill policy.
    pub const fn fill(mut self, fill: FieldFill) -> Self {
        self.fill = fill;
        self
    }
}

/// A field reference for type-safe column access.
///
/// Built once next to the entity definition, so its column name is trusted
/// and never re-validated against the identifier grammar.
///
/// ```ignore
/// impl User {
///     pub const AGE: Field<User> = Field::new("age");
/// }
/// let wrapper = ConditionWrapper::<User>::new().gt(User::AGE, 18)?;
/// ```
#[derive(Debug)]
pub struct Field<E> {
    /// The column name
    pub column: &'static str,
    _marker: PhantomData<fn() -> E>,
}

impl<E> Field<E> {
    /// Create a new typed field reference.
    pub const fn new(column: &'static str) -> Self {
        Self {
            column,
            _marker: PhantomData,
        }
    }
}

impl<E> Clone for Field<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Field<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        const ID: FieldInfo =
            FieldInfo::new("id", "id", SqlType::BigInt).primary_key(KeyStrategy::Snowflake);
        assert!(ID.primary_key);
        assert_eq!(ID.key_strategy.as_str(), "SNOWFLAKE");
        assert!(!ID.ignore);

        let deleted = FieldInfo::new("deleted", "is_deleted", SqlType::Integer)
            .logic_delete(LogicDelete::default());
        assert_eq!(deleted.logic_delete.map(|l| l.deleted), Some("1"));
    }

    #[test]
    fn test_fill_flags() {
        assert!(FieldFill::InsertUpdate.on_insert());
        assert!(FieldFill::InsertUpdate.on_update());
        assert!(!FieldFill::Insert.on_update());
        assert!(!FieldFill::Default.on_insert());
    }
}
