//! Primary-key assignment before insert.
//!
//! The assigner looks at the key field's declared [`KeyStrategy`] only when
//! the key is still null. A caller-supplied value is never overwritten.

use std::sync::Arc;

use sqlmapper_core::{Entity, EntityInfo, Error, FieldInfo, KeyStrategy, Result, SqlType, Value};
use uuid::Uuid;

use crate::registry::GeneratorRegistry;
use crate::snowflake::IdGenerator;

/// Fills null primary keys according to their strategy.
///
/// # Example
///
/// ```ignore
/// let assigner = KeyAssigner::new(Arc::new(SnowflakeGenerator::new(1)?), registry);
/// let mut user = User { id: None, ..Default::default() };
/// assigner.assign(&mut user)?;
/// assert!(user.id.is_some());
/// ```
#[derive(Clone)]
pub struct KeyAssigner {
    snowflake: Arc<dyn IdGenerator>,
    registry: Arc<GeneratorRegistry>,
}

impl std::fmt::Debug for KeyAssigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyAssigner")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl KeyAssigner {
    /// Create an assigner backed by `snowflake` and the custom `registry`.
    pub fn new(snowflake: Arc<dyn IdGenerator>, registry: Arc<GeneratorRegistry>) -> Self {
        Self {
            snowflake,
            registry,
        }
    }

    /// The custom generator registry.
    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    /// Assign the key of one entity.
    ///
    /// Returns the value written, or `None` when nothing was assigned: the
    /// entity has no key, the key is already set, or the strategy leaves
    /// generation to the database.
    pub fn assign<E: Entity>(&self, entity: &mut E) -> Result<Option<Value>> {
        let info = EntityInfo::of::<E>()?;
        let Some(key) = info.key() else {
            return Ok(None);
        };
        if !entity.get_value(key.name).unwrap_or_default().is_null() {
            return Ok(None);
        }

        let value = self.generate(info.name(), key)?;
        if value.is_null() {
            return Ok(None);
        }
        tracing::debug!(
            entity = info.name(),
            field = key.name,
            strategy = key.key_strategy.as_str(),
            "Assigned primary key"
        );
        entity.set_value(key.name, value.clone())?;
        Ok(Some(value))
    }

    /// Assign keys across a list, in list order. Returns how many were set.
    pub fn assign_all<E: Entity>(&self, entities: &mut [E]) -> Result<usize> {
        let mut assigned = 0;
        for entity in entities.iter_mut() {
            if self.assign(entity)?.is_some() {
                assigned += 1;
            }
        }
        Ok(assigned)
    }

    fn generate(&self, entity: &'static str, key: &'static FieldInfo) -> Result<Value> {
        match key.key_strategy {
            KeyStrategy::Auto | KeyStrategy::None => Ok(Value::Null),
            KeyStrategy::Assign => Err(Error::MissingPrimaryKey {
                entity,
                field: key.name,
            }),
            KeyStrategy::Uuid => {
                require_type(entity, key, SqlType::Text)?;
                Ok(Value::Text(Uuid::new_v4().simple().to_string()))
            }
            KeyStrategy::Custom(name) => {
                let generator = self
                    .registry
                    .get(name)
                    .ok_or_else(|| Error::UnknownGenerator(name.to_string()))?;
                generator.generate(entity)
            }
            KeyStrategy::Snowflake => {
                require_type(entity, key, SqlType::BigInt)?;
                Ok(Value::BigInt(self.snowflake.next_id()?))
            }
        }
    }
}

fn require_type(entity: &'static str, key: &'static FieldInfo, expected: SqlType) -> Result<()> {
    if key.sql_type == expected {
        Ok(())
    } else {
        Err(Error::UnsupportedKeyType {
            entity,
            field: key.name,
            strategy: key.key_strategy.as_str(),
            declared: key.sql_type.sql_name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    use regex::Regex;

    struct Counter(AtomicI64);

    impl IdGenerator for Counter {
        fn next_id(&self) -> Result<i64> {
            Ok(self.0.fetch_add(1, Ordering::SeqCst))
        }
    }

    macro_rules! keyed_entity {
        ($name:ident, $strategy:expr, $sql_type:expr) => {
            #[derive(Debug, Default)]
            struct $name {
                id: Value,
            }

            impl Entity for $name {
                const ENTITY_NAME: &'static str = stringify!($name);
                const TABLE_NAME: &'static str = "t";

                fn fields() -> &'static [FieldInfo] {
                    static FIELDS: &[FieldInfo] = &[
                        FieldInfo::new("id", "id", $sql_type).primary_key($strategy),
                        FieldInfo::new("title", "title", SqlType::Text),
                    ];
                    FIELDS
                }

                fn to_row(&self) -> Vec<(&'static str, Value)> {
                    vec![("id", self.id.clone()), ("title", Value::Null)]
                }

                fn set_value(&mut self, field: &str, value: Value) -> Result<()> {
                    match field {
                        "id" => {
                            self.id = value;
                            Ok(())
                        }
                        other => Err(Error::UnknownField {
                            entity: Self::ENTITY_NAME,
                            field: other.to_string(),
                        }),
                    }
                }
            }
        };
    }

    keyed_entity!(SnowDoc, KeyStrategy::Snowflake, SqlType::BigInt);
    keyed_entity!(SnowText, KeyStrategy::Snowflake, SqlType::Text);
    keyed_entity!(UuidDoc, KeyStrategy::Uuid, SqlType::Text);
    keyed_entity!(UuidInt, KeyStrategy::Uuid, SqlType::BigInt);
    keyed_entity!(AssignDoc, KeyStrategy::Assign, SqlType::BigInt);
    keyed_entity!(AutoDoc, KeyStrategy::Auto, SqlType::BigInt);
    keyed_entity!(PlainDoc, KeyStrategy::None, SqlType::BigInt);
    keyed_entity!(OrderDoc, KeyStrategy::Custom("order_no"), SqlType::Text);
    keyed_entity!(BlankCustom, KeyStrategy::Custom(""), SqlType::Text);

    #[derive(Debug, Default)]
    struct Keyless;

    impl Entity for Keyless {
        const ENTITY_NAME: &'static str = "Keyless";
        const TABLE_NAME: &'static str = "keyless";

        fn fields() -> &'static [FieldInfo] {
            static FIELDS: &[FieldInfo] = &[FieldInfo::new("name", "name", SqlType::Text)];
            FIELDS
        }

        fn to_row(&self) -> Vec<(&'static str, Value)> {
            vec![("name", Value::Null)]
        }

        fn set_value(&mut self, field: &str, _value: Value) -> Result<()> {
            Err(Error::UnknownField {
                entity: Self::ENTITY_NAME,
                field: field.to_string(),
            })
        }
    }

    fn assigner() -> KeyAssigner {
        KeyAssigner::new(
            Arc::new(Counter(AtomicI64::new(100))),
            Arc::new(GeneratorRegistry::new()),
        )
    }

    #[test]
    fn test_snowflake_assigns_null_key() {
        let mut doc = SnowDoc::default();
        let assigned = assigner().assign(&mut doc).unwrap();
        assert_eq!(assigned, Some(Value::BigInt(100)));
        assert_eq!(doc.id, Value::BigInt(100));
    }

    #[test]
    fn test_existing_key_is_kept() {
        let mut doc = SnowDoc {
            id: Value::BigInt(7),
        };
        assert_eq!(assigner().assign(&mut doc).unwrap(), None);
        assert_eq!(doc.id, Value::BigInt(7));

        let mut doc = AssignDoc {
            id: Value::BigInt(9),
        };
        assert!(assigner().assign(&mut doc).is_ok());
    }

    #[test]
    fn test_uuid_format() {
        let pattern = Regex::new("^[0-9a-f]{32}$").unwrap();
        let assigner = assigner();
        for _ in 0..32 {
            let mut doc = UuidDoc::default();
            assigner.assign(&mut doc).unwrap();
            assert!(pattern.is_match(doc.id.as_str().unwrap()), "{:?}", doc.id);
        }
    }

    #[test]
    fn test_key_type_mismatch() {
        let err = assigner().assign(&mut UuidInt::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedKeyType { strategy: "UUID", declared: "BIGINT", .. }
        ));
        let err = assigner().assign(&mut SnowText::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedKeyType { strategy: "SNOWFLAKE", .. }));
    }

    #[test]
    fn test_assign_requires_value() {
        let err = assigner().assign(&mut AssignDoc::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingPrimaryKey {
                entity: "AssignDoc",
                field: "id"
            }
        ));
    }

    #[test]
    fn test_auto_and_none_are_noops() {
        let mut auto = AutoDoc::default();
        let mut plain = PlainDoc::default();
        assert_eq!(assigner().assign(&mut auto).unwrap(), None);
        assert_eq!(assigner().assign(&mut plain).unwrap(), None);
        assert!(auto.id.is_null() && plain.id.is_null());
    }

    #[test]
    fn test_keyless_entity_is_skipped() {
        assert_eq!(assigner().assign(&mut Keyless).unwrap(), None);
    }

    #[test]
    fn test_custom_generator() {
        let assigner = assigner();
        let err = assigner.assign(&mut OrderDoc::default()).unwrap_err();
        assert!(matches!(err, Error::UnknownGenerator(ref name) if name == "order_no"));

        assigner
            .registry()
            .register("order_no", |entity: &str| Value::from(format!("{entity}-42")));
        let mut doc = OrderDoc::default();
        assigner.assign(&mut doc).unwrap();
        assert_eq!(doc.id, Value::Text("OrderDoc-42".into()));
    }

    #[test]
    fn test_custom_generator_returning_null_leaves_key_unset() {
        let assigner = assigner();
        assigner.registry().register("order_no", |_: &str| Value::Null);
        let mut doc = OrderDoc::default();
        assert_eq!(assigner.assign(&mut doc).unwrap(), None);
        assert!(doc.id.is_null());
    }

    #[test]
    fn test_blank_custom_name_is_unknown() {
        let err = assigner().assign(&mut BlankCustom::default()).unwrap_err();
        assert!(matches!(err, Error::UnknownGenerator(ref name) if name.is_empty()));
    }

    #[test]
    fn test_assign_all_in_list_order() {
        let mut docs = vec![
            SnowDoc::default(),
            SnowDoc {
                id: Value::BigInt(1),
            },
            SnowDoc::default(),
        ];
        assert_eq!(assigner().assign_all(&mut docs).unwrap(), 2);
        assert_eq!(docs[0].id, Value::BigInt(100));
        assert_eq!(docs[1].id, Value::BigInt(1));
        assert_eq!(docs[2].id, Value::BigInt(101));
    }
}
