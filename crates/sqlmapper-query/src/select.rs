//! SELECT builder for entity reads.

use sqlmapper_core::{Entity, EntityInfo, Result, Value};

use crate::builder::KeyTarget;
use crate::param::{Dialect, Statement};
use crate::synth::{SqlWriter, write_group_by, write_order_by};
use crate::wrapper::ConditionWrapper;

/// SELECT by key, key list or condition, restricted to live rows.
///
/// # Example
///
/// ```ignore
/// // SELECT id, user_name, age FROM user_info WHERE id = #{id} AND is_deleted = 0 FOR UPDATE
/// let (sql, params) = SelectBuilder::<User>::by_id(42_i64).for_update().build()?;
///
/// // SELECT COUNT(1) FROM user_info WHERE age > #{condition.conditions[0].value} AND is_deleted = 0
/// let (sql, params) = SelectBuilder::by_condition(&wrapper).count().build()?;
/// ```
pub struct SelectBuilder<'a, E: Entity> {
    target: KeyTarget<'a, E>,
    count: bool,
    limit_one: bool,
    for_update: bool,
}

impl<'a, E: Entity> SelectBuilder<'a, E> {
    fn with_target(target: KeyTarget<'a, E>) -> Self {
        Self {
            target,
            count: false,
            limit_one: false,
            for_update: false,
        }
    }

    /// Select the row with key `id`.
    pub fn by_id(id: impl Into<Value>) -> Self {
        Self::with_target(KeyTarget::Id(id.into()))
    }

    /// Select every row whose key is in `ids`. An empty list matches nothing.
    pub fn by_ids<V: Into<Value>>(ids: impl IntoIterator<Item = V>) -> Self {
        Self::with_target(KeyTarget::Ids(ids.into_iter().map(Into::into).collect()))
    }

    /// Select every row matching `condition`, with its GROUP BY and ORDER BY.
    pub fn by_condition(condition: &'a ConditionWrapper<E>) -> Self {
        Self::with_target(KeyTarget::Condition(condition))
    }

    /// Project `COUNT(1)` instead of the entity columns.
    pub fn count(mut self) -> Self {
        self.count = true;
        self
    }

    /// Existence check: `COUNT(1)` limited to one row.
    pub fn exists(mut self) -> Self {
        self.count = true;
        self.limit_one = true;
        self
    }

    /// Append `LIMIT 1`.
    pub fn limit_one(mut self) -> Self {
        self.limit_one = true;
        self
    }

    /// Append `FOR UPDATE`.
    pub fn for_update(mut self) -> Self {
        self.for_update = true;
        self
    }

    /// Synthesize the statement.
    pub fn to_statement(&self, dialect: Dialect) -> Result<Statement> {
        let info = EntityInfo::of::<E>()?;
        let mut w = SqlWriter::new(dialect);
        w.push("SELECT ");
        if self.count {
            w.push("COUNT(1)");
        } else {
            w.push(&info.columns().join(", "));
        }
        w.push(" FROM ");
        w.push(info.table());
        w.push(" WHERE ");
        self.target.write(&mut w, &info)?;
        w.push(&info.live_row_filter());

        if let KeyTarget::Condition(condition) = &self.target {
            write_group_by(&mut w, condition.groups());
            if !self.count {
                write_order_by(&mut w, condition.orders());
            }
        }
        if self.limit_one {
            w.push(" LIMIT 1");
        }
        if self.for_update {
            w.push(" FOR UPDATE");
        }
        Ok(w.finish())
    }

    /// Build the SELECT SQL and parameters with the default dialect.
    pub fn build(&self) -> Result<(String, Vec<Value>)> {
        self.build_with_dialect(Dialect::default())
    }

    /// Build the SELECT SQL and parameters with a specific dialect.
    pub fn build_with_dialect(&self, dialect: Dialect) -> Result<(String, Vec<Value>)> {
        let stmt = self.to_statement(dialect)?;
        let values = stmt.bind(&self.target)?;
        Ok((stmt.sql, values))
    }
}
