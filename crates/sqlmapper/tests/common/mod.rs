#![allow(dead_code)]

use sqlmapper::prelude::*;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Account {
    pub id: Option<i64>,
    pub user_name: Option<String>,
    pub age: Option<i32>,
    pub status: Option<i32>,
    pub deleted: i32,
}

impl Account {
    pub const AGE: Field<Account> = Field::new("age");

    pub fn new(name: &str, age: i32) -> Self {
        Self {
            user_name: Some(name.to_string()),
            age: Some(age),
            status: Some(1),
            ..Self::default()
        }
    }
}

static ACCOUNT_FIELDS: &[FieldInfo] = &[
    FieldInfo::new("id", "id", SqlType::BigInt).primary_key(KeyStrategy::Snowflake),
    FieldInfo::new("userName", "user_name", SqlType::Text),
    FieldInfo::new("age", "age", SqlType::Integer),
    FieldInfo::new("status", "status", SqlType::Integer),
    FieldInfo::new("deleted", "is_deleted", SqlType::Integer).logic_delete(LogicDelete::new("1", "0")),
];

impl Entity for Account {
    const ENTITY_NAME: &'static str = "Account";
    const TABLE_NAME: &'static str = "account";

    fn fields() -> &'static [FieldInfo] {
        ACCOUNT_FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", self.id.into()),
            ("userName", self.user_name.clone().into()),
            ("age", self.age.into()),
            ("status", self.status.into()),
            ("deleted", self.deleted.into()),
        ]
    }

    fn set_value(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "id" => self.id = value.as_i64(),
            "userName" => self.user_name = value.as_str().map(str::to_string),
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

/// Document keyed by a 32-character UUID.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub id: Option<String>,
    pub title: Option<String>,
}

static DOCUMENT_FIELDS: &[FieldInfo] = &[
    FieldInfo::new("id", "id", SqlType::Text).primary_key(KeyStrategy::Uuid),
    FieldInfo::new("title", "title", SqlType::Text),
];

impl Entity for Document {
    const ENTITY_NAME: &'static str = "Document";
    const TABLE_NAME: &'static str = "document";

    fn fields() -> &'static [FieldInfo] {
        DOCUMENT_FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![("id", self.id.clone().into()), ("title", self.title.clone().into())]
    }

    fn set_value(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "id" => self.id = value.as_str().map(str::to_string),
            "title" => self.title = value.as_str().map(str::to_string),
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

/// Ledger entry keyed by (account_id, entry_no), which the toolkit rejects.
#[derive(Debug, Clone, Default)]
pub struct LedgerEntry {
    pub account_id: Option<i64>,
    pub entry_no: Option<i64>,
}

static LEDGER_FIELDS: &[FieldInfo] = &[
    FieldInfo::new("accountId", "account_id", SqlType::BigInt).primary_key(KeyStrategy::Snowflake),
    FieldInfo::new("entryNo", "entry_no", SqlType::BigInt).primary_key(KeyStrategy::Snowflake),
];

impl Entity for LedgerEntry {
    const ENTITY_NAME: &'static str = "LedgerEntry";
    const TABLE_NAME: &'static str = "ledger_entry";

    fn fields() -> &'static [FieldInfo] {
        LEDGER_FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![("accountId", self.account_id.into()), ("entryNo", self.entry_no.into())]
    }

    fn set_value(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "accountId" => self.account_id = value.as_i64(),
            "entryNo" => self.entry_no = value.as_i64(),
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
