//! SQL column types as seen by the key assigner.

/// Declared SQL type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlType {
    Bool,
    Integer,
    BigInt,
    Double,
    #[default]
    Text,
    Blob,
    Timestamp,
}

impl SqlType {
    /// The SQL spelling used in diagnostics.
    pub const fn sql_name(&self) -> &'static str {
        match self {
            SqlType::Bool => "BOOLEAN",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Double => "DOUBLE",
            SqlType::Text => "TEXT",
            SqlType::Blob => "BLOB",
            SqlType::Timestamp => "TIMESTAMP",
        }
    }
}
