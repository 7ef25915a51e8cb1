//! The condition tree.
//!
//! A [`Condition`] is an immutable predicate: a comparison, a null test, a
//! membership test or a group of children joined by one logic operator.
//! Construction is pure; column validation happens when a condition is
//! handed to a [`ConditionWrapper`](crate::ConditionWrapper) or synthesized
//! on its own.

use serde::Serialize;
use sqlmapper_core::{Result, Value, validate_column};

/// Comparison operators for [`Condition::Simple`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    /// Equal (=)
    Eq,
    /// Not equal (<>)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Pattern match (LIKE)
    Like,
}

impl Operator {
    /// Get the SQL representation of this operator.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Like => "LIKE",
        }
    }
}

/// Logic operator joining the children of a [`Condition::Group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Logic {
    And,
    Or,
}

impl Logic {
    /// Get the SQL keyword.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }
}

/// A predicate node.
///
/// Serializes with a `kind` tag, which is how condition trees show up in
/// debug dumps and structured logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Condition {
    /// `column <op> value`; a null value only makes sense with `=` and `<>`.
    Simple {
        operator: Operator,
        column: String,
        value: Value,
    },
    /// `column IS [NOT] NULL`
    Null { column: String, is_null: bool },
    /// `column [NOT] IN (...)`
    In {
        column: String,
        values: Vec<Value>,
        negated: bool,
    },
    /// Children joined by one logic operator, always parenthesized.
    Group { logic: Logic, children: Vec<Condition> },
}

impl Condition {
    fn simple(operator: Operator, column: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Simple {
            operator,
            column: column.into(),
            value: value.into(),
        }
    }

    /// `column = value`
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::simple(Operator::Eq, column, value)
    }

    /// `column <> value`
    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::simple(Operator::Ne, column, value)
    }

    /// `column > value`
    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::simple(Operator::Gt, column, value)
    }

    /// `column >= value`
    pub fn ge(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::simple(Operator::Ge, column, value)
    }

    /// `column < value`
    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::simple(Operator::Lt, column, value)
    }

    /// `column <= value`
    pub fn le(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::simple(Operator::Le, column, value)
    }

    /// `column LIKE %pattern%`
    pub fn like(column: impl Into<String>, pattern: &str) -> Self {
        Self::simple(Operator::Like, column, format!("%{}%", pattern))
    }

    /// `column IS NULL`
    pub fn is_null(column: impl Into<String>) -> Self {
        Condition::Null {
            column: column.into(),
            is_null: true,
        }
    }

    /// `column IS NOT NULL`
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Condition::Null {
            column: column.into(),
            is_null: false,
        }
    }

    /// `column IN (values...)`; an empty list is always false.
    pub fn in_list<V: Into<Value>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Condition::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    /// `column NOT IN (values...)`; an empty list is always true.
    pub fn not_in<V: Into<Value>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Condition::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }

    /// Join the present children with AND.
    ///
    /// Absent children are dropped; if none remain the result is `None`,
    /// which a wrapper treats as "no condition".
    pub fn and<I, C>(children: I) -> Option<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Option<Condition>>,
    {
        Self::group(Logic::And, children)
    }

    /// Join the present children with OR. See [`Condition::and`].
    pub fn or<I, C>(children: I) -> Option<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Option<Condition>>,
    {
        Self::group(Logic::Or, children)
    }

    fn group<I, C>(logic: Logic, children: I) -> Option<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Option<Condition>>,
    {
        let children: Vec<Condition> = children.into_iter().filter_map(Into::into).collect();
        if children.is_empty() {
            None
        } else {
            Some(Condition::Group { logic, children })
        }
    }

    /// Check every column in this subtree against the identifier grammar.
    pub fn validate_columns(&self) -> Result<()> {
        match self {
            Condition::Simple { column, .. }
            | Condition::Null { column, .. }
            | Condition::In { column, .. } => validate_column(column),
            Condition::Group { children, .. } => {
                children.iter().try_for_each(Condition::validate_columns)
            }
        }
    }
}
