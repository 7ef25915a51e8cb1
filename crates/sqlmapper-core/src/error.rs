//! Error types for SQLMapper.
//!
//! Every failure in the toolkit is fail-fast: a builder, synthesizer or
//! generator returns an [`Error`] and never retries on its own. The only
//! internal recovery is the bounded clock-rollback wait inside the Snowflake
//! generator, which surfaces as [`Error::ClockRollback`] once it gives up.

use std::fmt;

/// Result type alias used throughout SQLMapper.
pub type Result<T> = std::result::Result<T, Error>;

/// The primary error type for all SQLMapper operations.
#[derive(Debug)]
pub enum Error {
    /// A raw column string failed the identifier grammar `^[a-zA-Z_][a-zA-Z0-9_]*$`.
    InvalidColumnIdentifier(String),
    /// A key value was required but absent.
    MissingPrimaryKey {
        entity: &'static str,
        field: &'static str,
    },
    /// The entity declares no key field but the operation needs one.
    NoPrimaryKey { entity: &'static str },
    /// More than one field is flagged as the key.
    UnsupportedCompositeKey {
        entity: &'static str,
        fields: Vec<&'static str>,
    },
    /// The key strategy cannot produce a value of the key's declared type.
    UnsupportedKeyType {
        entity: &'static str,
        field: &'static str,
        strategy: &'static str,
        declared: &'static str,
    },
    /// A `CUSTOM` key strategy names a generator that was never registered.
    UnknownGenerator(String),
    /// A SET clause resolved to zero entries.
    NoUpdatableFields(String),
    /// The wall clock moved backwards further than the generator can absorb.
    ClockRollback { drift_ms: i64 },
    /// A null value was compared with an operator that has no IS [NOT] NULL form.
    InvalidNullComparison {
        column: String,
        operator: &'static str,
    },
    /// Logical delete requested on an entity without exactly one logic-delete field.
    MissingLogicDeleteField { entity: &'static str },
    /// A field name that the entity does not declare.
    UnknownField {
        entity: &'static str,
        field: String,
    },
    /// A statement id that was never registered.
    UnknownStatement(String),
    /// A placeholder path that does not address any value in the bound parameters.
    UnresolvedParameter(String),
    /// Invalid configuration value.
    Config(ConfigError),
    /// Failure reported by the host runtime while executing a statement.
    Execution(ExecutionError),
    /// Custom error with message.
    Custom(String),
}

/// A configuration value that could not be accepted.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The configuration key (environment variable or property name)
    pub key: String,
    /// The raw value that was rejected
    pub value: String,
    /// Why it was rejected
    pub message: String,
}

impl ConfigError {
    /// Create a new configuration error.
    pub fn new(key: impl Into<String>, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

/// A failure raised by the host runtime that executes compiled statements.
#[derive(Debug)]
pub struct ExecutionError {
    /// The statement that was being executed
    pub statement: String,
    /// Error message
    pub message: String,
    /// Underlying error, if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ExecutionError {
    /// Create a new execution error without an underlying source.
    pub fn new(statement: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn config(key: impl Into<String>, value: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config(ConfigError::new(key, value, message))
    }

    /// Whether this error came from the host runtime rather than from SQLMapper itself.
    pub fn is_execution(&self) -> bool {
        matches!(self, Error::Execution(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidColumnIdentifier(column) => {
                write!(f, "Invalid SQL column name: '{}'", column)
            }
            Error::MissingPrimaryKey { entity, field } => {
                write!(f, "Primary key '{}' of {} is null", field, entity)
            }
            Error::NoPrimaryKey { entity } => write!(f, "No primary key declared on {}", entity),
            Error::UnsupportedCompositeKey { entity, fields } => write!(
                f,
                "Composite primary key is not supported: {} declares [{}]",
                entity,
                fields.join(", ")
            ),
            Error::UnsupportedKeyType {
                entity,
                field,
                strategy,
                declared,
            } => write!(
                f,
                "Key strategy {} does not match the type of {}.{} ({})",
                strategy, entity, field, declared
            ),
            Error::UnknownGenerator(name) => write!(f, "No key generator registered as '{}'", name),
            Error::NoUpdatableFields(context) => write!(f, "No updatable fields in {}", context),
            Error::ClockRollback { drift_ms } => {
                write!(f, "Clock moved backwards: {} ms", drift_ms)
            }
            Error::InvalidNullComparison { column, operator } => write!(
                f,
                "Cannot compare {} {} NULL; only = and <> accept a null value",
                column, operator
            ),
            Error::MissingLogicDeleteField { entity } => write!(
                f,
                "Entity {} must have exactly one logic-delete field",
                entity
            ),
            Error::UnknownField { entity, field } => {
                write!(f, "Entity {} has no field '{}'", entity, field)
            }
            Error::UnknownStatement(id) => write!(f, "Statement '{}' is not registered", id),
            Error::UnresolvedParameter(path) => {
                write!(f, "Parameter path '{}' does not resolve to a value", path)
            }
            Error::Config(e) => write!(f, "Invalid {} '{}': {}", e.key, e.value, e.message),
            Error::Execution(e) => write!(f, "Statement {} failed: {}", e.statement, e.message),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Execution(e) => e
                .source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<ExecutionError> for Error {
    fn from(err: ExecutionError) -> Self {
        Error::Execution(err)
    }
}
