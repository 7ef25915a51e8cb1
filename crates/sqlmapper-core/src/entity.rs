//! The `Entity` trait and its validated metadata view.

use crate::error::{Error, Result};
use crate::field::{FieldInfo, LogicDelete};
use crate::value::Value;

/// A persisted type described by a precomputed metadata table.
///
/// Implementations are plain data plumbing: the field table, a row view
/// keyed by field name, and a setter used by key assignment and auto-fill.
///
/// # Example
///
/// ```ignore
/// impl Entity for User {
///     const ENTITY_NAME: &'static str = "User";
///     const TABLE_NAME: &'static str = "user_info";
///
///     fn fields() -> &'static [FieldInfo] { USER_FIELDS }
///
///     fn to_row(&self) -> Vec<(&'static str, Value)> {
///         vec![("id", self.id.into()), ("userName", (&self.user_name).into())]
///     }
///
///     fn set_value(&mut self, field: &str, value: Value) -> Result<()> { ... }
/// }
/// ```
pub trait Entity {
    /// Name used in diagnostics and passed to custom key generators.
    const ENTITY_NAME: &'static str;

    /// Table the entity is stored in.
    const TABLE_NAME: &'static str;

    /// Static field metadata, in declaration order.
    fn fields() -> &'static [FieldInfo];

    /// Current field values keyed by field name, in declaration order.
    fn to_row(&self) -> Vec<(&'static str, Value)>;

    /// Overwrite one field.
    fn set_value(&mut self, field: &str, value: Value) -> Result<()>;

    /// Current value of one field, `None` if the field is not declared.
    fn get_value(&self, field: &str) -> Option<Value> {
        self.to_row()
            .into_iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }
}

/// Validated view over an entity's field table.
///
/// Composite keys are rejected when this view is built, which is the
/// registration-time check every statement builder and the key assigner
/// go through.
#[derive(Debug, Clone, Copy)]
pub struct EntityInfo {
    name: &'static str,
    table: &'static str,
    fields: &'static [FieldInfo],
    key: Option<&'static FieldInfo>,
}

impl EntityInfo {
    /// Build and validate the metadata view for `E`.
    pub fn of<E: Entity>() -> Result<Self> {
        Self::from_parts(E::ENTITY_NAME, E::TABLE_NAME, E::fields())
    }

    /// Build and validate a metadata view from raw parts.
    pub fn from_parts(
        name: &'static str,
        table: &'static str,
        fields: &'static [FieldInfo],
    ) -> Result<Self> {
        let keys: Vec<&'static FieldInfo> = fields
            .iter()
            .filter(|f| f.primary_key && !f.ignore)
            .collect();
        if keys.len() > 1 {
            return Err(Error::UnsupportedCompositeKey {
                entity: name,
                fields: keys.iter().map(|f| f.name).collect(),
            });
        }
        Ok(Self {
            name,
            table,
            fields,
            key: keys.first().copied(),
        })
    }

    /// Entity name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Table name.
    pub const fn table(&self) -> &'static str {
        self.table
    }

    /// The key field, if the entity declares one.
    pub const fn key(&self) -> Option<&'static FieldInfo> {
        self.key
    }

    /// The key field, failing with `NoPrimaryKey` when absent.
    pub fn require_key(&self) -> Result<&'static FieldInfo> {
        self.key.ok_or(Error::NoPrimaryKey { entity: self.name })
    }

    /// Fields that take part in persistence (not ignored).
    pub fn persisted_fields(&self) -> impl Iterator<Item = &'static FieldInfo> + use<> {
        self.fields.iter().filter(|f| !f.ignore)
    }

    /// Column names of every persisted field, in declaration order.
    pub fn columns(&self) -> Vec<&'static str> {
        self.persisted_fields().map(|f| f.column_name).collect()
    }

    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&'static FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The first logic-delete column and its marker, if any.
    pub fn logic_delete(&self) -> Option<(&'static FieldInfo, LogicDelete)> {
        self.persisted_fields()
            .find_map(|f| f.logic_delete.map(|marker| (f, marker)))
    }

    /// The single logic-delete column, failing unless exactly one is declared.
    pub fn require_logic_delete(&self) -> Result<(&'static FieldInfo, LogicDelete)> {
        let mut found = self
            .persisted_fields()
            .filter_map(|f| f.logic_delete.map(|marker| (f, marker)));
        match (found.next(), found.next()) {
            (Some(only), None) => Ok(only),
            _ => Err(Error::MissingLogicDeleteField { entity: self.name }),
        }
    }

    /// `AND <col> = <normal>` suffix for reads and updates, empty without a
    /// logic-delete column.
    pub fn live_row_filter(&self) -> String {
        self.logic_delete()
            .map(|(field, marker)| format!(" AND {} = {}", field.column_name, marker.normal))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::KeyStrategy;
    use crate::types::SqlType;

    static SINGLE: &[FieldInfo] = &[
        FieldInfo::new("id", "id", SqlType::BigInt).primary_key(KeyStrategy::Snowflake),
        FieldInfo::new("userName", "user_name", SqlType::Text),
        FieldInfo::new("cache", "cache", SqlType::Text).ignore(true),
        FieldInfo::new("deleted", "is_deleted", SqlType::Integer)
            .logic_delete(LogicDelete::new("1", "0")),
    ];

    static COMPOSITE: &[FieldInfo] = &[
        FieldInfo::new("orderId", "order_id", SqlType::BigInt).primary_key(KeyStrategy::Assign),
        FieldInfo::new("lineNo", "line_no", SqlType::Integer).primary_key(KeyStrategy::Assign),
    ];

    static KEYLESS: &[FieldInfo] = &[FieldInfo::new("name", "name", SqlType::Text)];

    #[test]
    fn test_single_key() {
        let info = EntityInfo::from_parts("User", "user_info", SINGLE).unwrap();
        assert_eq!(info.key().map(|f| f.name), Some("id"));
        assert_eq!(info.columns(), vec!["id", "user_name", "is_deleted"]);
        assert_eq!(info.live_row_filter(), " AND is_deleted = 0");
    }

    #[test]
    fn test_composite_key_rejected() {
        let err = EntityInfo::from_parts("OrderLine", "order_line", COMPOSITE).unwrap_err();
        match err {
            Error::UnsupportedCompositeKey { entity, fields } => {
                assert_eq!(entity, "OrderLine");
                assert_eq!(fields, vec!["orderId", "lineNo"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_keyless_entity() {
        let info = EntityInfo::from_parts("Tag", "tag", KEYLESS).unwrap();
        assert!(info.key().is_none());
        assert!(matches!(
            info.require_key(),
            Err(Error::NoPrimaryKey { entity: "Tag" })
        ));
        assert!(info.require_logic_delete().is_err());
        assert_eq!(info.live_row_filter(), "");
    }
}
