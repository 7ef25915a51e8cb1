//! Test entities shared by the builder tests.

use sqlmapper_core::{
    Entity, Error, Field, FieldInfo, KeyStrategy, LogicDelete, Result, SqlType, Value,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: Option<i64>,
    pub user_name: Option<String>,
    pub age: Option<i32>,
    pub email: Option<String>,
    pub deleted: i32,
    pub cache: Option<String>,
}

impl User {
    pub const AGE: Field<User> = Field::new("age");

    pub fn named(id: Option<i64>, name: &str, age: i32) -> Self {
        Self {
            id,
            user_name: Some(name.to_string()),
            age: Some(age),
            ..Self::default()
        }
    }
}

static USER_FIELDS: &[FieldInfo] = &[
    FieldInfo::new("id", "id", SqlType::BigInt).primary_key(KeyStrategy::Snowflake),
    FieldInfo::new("userName", "user_name", SqlType::Text),
    FieldInfo::new("age", "age", SqlType::Integer),
    FieldInfo::new("email", "email", SqlType::Text),
    FieldInfo::new("deleted", "is_deleted", SqlType::Integer)
        .logic_delete(LogicDelete::new("1", "0")),
    FieldInfo::new("cache", "cache", SqlType::Text).ignore(true),
];

impl Entity for User {
    const ENTITY_NAME: &'static str = "User";
    const TABLE_NAME: &'static str = "user_info";

    fn fields() -> &'static [FieldInfo] {
        USER_FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", self.id.into()),
            ("userName", self.user_name.clone().into()),
            ("age", self.age.into()),
            ("email", self.email.clone().into()),
            ("deleted", self.deleted.into()),
            ("cache", self.cache.clone().into()),
        ]
    }

    fn set_value(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "id" => self.id = value.as_i64(),
            "userName" => self.user_name = value.as_str().map(str::to_string),
            "email" => self.email = value.as_str().map(str::to_string),
            _ => {
                return Err(Error::UnknownField {
                    entity: Self::ENTITY_NAME,
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// No key, no logic-delete column.
#[derive(Debug, Clone, Default)]
pub struct Tag {
    pub name: Option<String>,
}

static TAG_FIELDS: &[FieldInfo] = &[FieldInfo::new("name", "name", SqlType::Text)];

impl Entity for Tag {
    const ENTITY_NAME: &'static str = "Tag";
    const TABLE_NAME: &'static str = "tag";

    fn fields() -> &'static [FieldInfo] {
        TAG_FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![("name", self.name.clone().into())]
    }

    fn set_value(&mut self, field: &str, _value: Value) -> Result<()> {
        Err(Error::UnknownField {
            entity: Self::ENTITY_NAME,
            field: field.to_string(),
        })
    }
}
