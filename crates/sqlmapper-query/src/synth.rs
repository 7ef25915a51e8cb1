//! SQL synthesis for condition trees and update specs.
//!
//! Synthesis is a pure, exhaustive walk over [`Condition`]. Values never
//! reach the SQL text: every placeholder is recorded with the [`ParamPath`]
//! that addresses its value, relative to the prefix the caller passes in.
//!
//! | Node | Output |
//! |---|---|
//! | `Simple`, non-null | `col <op> <p>` |
//! | `Simple`, null, `=` / `<>` | `col IS NULL` / `col IS NOT NULL` |
//! | `Null` | `col IS [NOT] NULL` |
//! | `In`, empty | `1=0`, or `1=1` when negated |
//! | `In` | `col [NOT ]IN (<p0>, <p1>, ...)` |
//! | `Group`, empty | `1=1` |
//! | `Group` | `(c0 <LOGIC> c1 ...)` |

use sqlmapper_core::{Error, Result, Value};

use crate::condition::{Condition, Operator};
use crate::param::{Dialect, ParamPath, Statement};
use crate::update::UpdateSpec;
use crate::wrapper::{ConditionWrapper, OrderItem};

/// Accumulates SQL text and placeholder paths for one statement.
///
/// A single writer is shared by every clause of a statement so positional
/// placeholders (`$n`, `?n`) stay numbered in text order.
#[derive(Debug)]
pub struct SqlWriter {
    dialect: Dialect,
    sql: String,
    params: Vec<ParamPath>,
}

impl SqlWriter {
    /// Create an empty writer.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            sql: String::with_capacity(128),
            params: Vec::new(),
        }
    }

    /// Append raw SQL text.
    pub fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append a placeholder for the value at `path`.
    pub fn param(&mut self, path: ParamPath) {
        let placeholder = self.dialect.placeholder(self.params.len() + 1, &path);
        self.sql.push_str(&placeholder);
        self.params.push(path);
    }

    /// Finish the statement.
    pub fn finish(self) -> Statement {
        Statement {
            sql: self.sql,
            params: self.params,
        }
    }
}

/// Write one condition node whose values live under `path`.
pub fn write_condition(w: &mut SqlWriter, condition: &Condition, path: &ParamPath) -> Result<()> {
    match condition {
        Condition::Simple {
            operator,
            column,
            value,
        } => match (value, operator) {
            (Value::Null, Operator::Eq) => {
                w.push(column);
                w.push(" IS NULL");
            }
            (Value::Null, Operator::Ne) => {
                w.push(column);
                w.push(" IS NOT NULL");
            }
            (Value::Null, op) => {
                return Err(Error::InvalidNullComparison {
                    column: column.clone(),
                    operator: op.as_sql(),
                });
            }
            (_, op) => {
                w.push(column);
                w.push(" ");
                w.push(op.as_sql());
                w.push(" ");
                w.param(path.key("value"));
            }
        },
        Condition::Null { column, is_null } => {
            w.push(column);
            w.push(if *is_null { " IS NULL" } else { " IS NOT NULL" });
        }
        Condition::In {
            negated, values, ..
        } if values.is_empty() => {
            w.push(if *negated { "1=1" } else { "1=0" });
        }
        Condition::In {
            column,
            values,
            negated,
        } => {
            w.push(column);
            w.push(if *negated { " NOT IN (" } else { " IN (" });
            let values_path = path.key("values");
            for i in 0..values.len() {
                if i > 0 {
                    w.push(", ");
                }
                w.param(values_path.index(i));
            }
            w.push(")");
        }
        Condition::Group { children, .. } if children.is_empty() => {
            w.push("1=1");
        }
        Condition::Group { logic, children } => {
            let children_path = path.key("children");
            w.push("(");
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    w.push(" ");
                    w.push(logic.as_sql());
                    w.push(" ");
                }
                write_condition(w, child, &children_path.index(i))?;
            }
            w.push(")");
        }
    }
    Ok(())
}

/// Write the top-level conditions joined with AND; `1=1` when there are none.
///
/// Condition `i` lives at `<prefix>.conditions[i]`.
pub fn write_conditions(
    w: &mut SqlWriter,
    conditions: &[Condition],
    prefix: &ParamPath,
) -> Result<()> {
    if conditions.is_empty() {
        w.push("1=1");
        return Ok(());
    }
    let base = prefix.key("conditions");
    for (i, condition) in conditions.iter().enumerate() {
        if i > 0 {
            w.push(" AND ");
        }
        write_condition(w, condition, &base.index(i))?;
    }
    Ok(())
}

/// Write `col = <p>` pairs in insertion order; null values become `col = NULL`.
///
/// Entry `col` lives at `<prefix>.updates.col`.
pub fn write_set_clause<E>(
    w: &mut SqlWriter,
    spec: &UpdateSpec<E>,
    prefix: &ParamPath,
) -> Result<()> {
    if spec.is_empty() {
        return Err(Error::NoUpdatableFields("UpdateSpec".to_string()));
    }
    let base = prefix.key("updates");
    for (i, (column, value)) in spec.updates().iter().enumerate() {
        if i > 0 {
            w.push(", ");
        }
        w.push(column);
        if value.is_null() {
            w.push(" = NULL");
        } else {
            w.push(" = ");
            w.param(base.key(column.as_str()));
        }
    }
    Ok(())
}

/// Write ` GROUP BY a, b` when any group column is present.
pub fn write_group_by(w: &mut SqlWriter, groups: &[String]) {
    if !groups.is_empty() {
        w.push(" GROUP BY ");
        w.push(&groups.join(", "));
    }
}

/// Write ` ORDER BY a ASC, b DESC` when any order item is present.
pub fn write_order_by(w: &mut SqlWriter, orders: &[OrderItem]) {
    for (i, order) in orders.iter().enumerate() {
        w.push(if i == 0 { " ORDER BY " } else { ", " });
        w.push(&order.column);
        w.push(if order.ascending { " ASC" } else { " DESC" });
    }
}

/// Synthesize a standalone condition; paths are relative to the condition.
///
/// Raw columns anywhere in the tree are validated first.
pub fn build_condition(condition: &Condition, dialect: Dialect) -> Result<Statement> {
    condition.validate_columns()?;
    let mut w = SqlWriter::new(dialect);
    write_condition(&mut w, condition, &ParamPath::new())?;
    Ok(w.finish())
}

/// Synthesize the WHERE body of a wrapper; paths are relative to the wrapper.
#[tracing::instrument(level = "trace", skip(wrapper), fields(conditions = wrapper.len()))]
pub fn build_where_clause<E>(wrapper: &ConditionWrapper<E>, dialect: Dialect) -> Result<Statement> {
    let mut w = SqlWriter::new(dialect);
    write_conditions(&mut w, wrapper.conditions(), &ParamPath::new())?;
    Ok(w.finish())
}

/// Synthesize the SET body of an update spec; paths are relative to the spec.
pub fn build_set_clause<E>(spec: &UpdateSpec<E>, dialect: Dialect) -> Result<Statement> {
    let mut w = SqlWriter::new(dialect);
    write_set_clause(&mut w, spec, &ParamPath::new())?;
    Ok(w.finish())
}
