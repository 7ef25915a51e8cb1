//! Entity statement builders for INSERT, UPDATE and DELETE.
//!
//! Every builder derives its columns from the entity's field table:
//! - ignored fields never appear
//! - the key column is inserted only when it holds a value
//! - `selective` builders skip null non-key fields
//! - reads and updates on an entity with a logic-delete column only touch
//!   live rows (`AND <col> = <normal>`)
//!
//! Builders produce a [`Statement`] (SQL plus placeholder paths) or, via
//! `build()`, the SQL with its values already bound in placeholder order.

use sqlmapper_core::{Entity, EntityInfo, Error, FieldInfo, Result, Value};

use crate::param::{Dialect, EntityList, EntityRef, ParamPath, Params, Resolve, Segment, Statement};
use crate::synth::{SqlWriter, write_conditions, write_set_clause};
use crate::update::UpdateSpec;
use crate::wrapper::ConditionWrapper;

// ============================================================================
// Shared pieces
// ============================================================================

fn field_is_null(row: &[(&'static str, Value)], field: &str) -> bool {
    row.iter()
        .find(|(name, _)| *name == field)
        .is_none_or(|(_, value)| value.is_null())
}

/// Fields written by an INSERT of `row`.
fn insert_fields(
    info: &EntityInfo,
    row: &[(&'static str, Value)],
    selective: bool,
) -> Vec<&'static FieldInfo> {
    info.persisted_fields()
        .filter(|f| {
            let null = field_is_null(row, f.name);
            if f.primary_key {
                !null
            } else {
                !selective || !null
            }
        })
        .collect()
}

/// Non-key fields written by an entity UPDATE of `row`.
fn update_fields(
    info: &EntityInfo,
    row: &[(&'static str, Value)],
    selective: bool,
) -> Result<Vec<&'static FieldInfo>> {
    let fields: Vec<_> = info
        .persisted_fields()
        .filter(|f| !f.primary_key && (!selective || !field_is_null(row, f.name)))
        .collect();
    if fields.is_empty() {
        return Err(Error::NoUpdatableFields(info.name().to_string()));
    }
    Ok(fields)
}

fn require_key_value(
    info: &EntityInfo,
    key: &'static FieldInfo,
    row: &[(&'static str, Value)],
) -> Result<()> {
    if field_is_null(row, key.name) {
        return Err(Error::MissingPrimaryKey {
            entity: info.name(),
            field: key.name,
        });
    }
    Ok(())
}

/// Which rows a statement addresses: one key, a key list, or a condition.
pub(crate) enum KeyTarget<'a, E> {
    Id(Value),
    Ids(Vec<Value>),
    Condition(&'a ConditionWrapper<E>),
}

impl<E> KeyTarget<'_, E> {
    /// Write the WHERE body. An empty key list matches nothing.
    pub(crate) fn write(&self, w: &mut SqlWriter, info: &EntityInfo) -> Result<()> {
        match self {
            KeyTarget::Id(id) => {
                let key = info.require_key()?;
                if id.is_null() {
                    return Err(Error::MissingPrimaryKey {
                        entity: info.name(),
                        field: key.name,
                    });
                }
                w.push(key.column_name);
                w.push(" = ");
                w.param(ParamPath::root("id"));
            }
            KeyTarget::Ids(ids) => {
                let key = info.require_key()?;
                if ids.is_empty() {
                    w.push("1=0");
                } else {
                    let base = ParamPath::root("ids");
                    w.push(key.column_name);
                    w.push(" IN (");
                    for i in 0..ids.len() {
                        if i > 0 {
                            w.push(", ");
                        }
                        w.param(base.index(i));
                    }
                    w.push(")");
                }
            }
            KeyTarget::Condition(wrapper) => {
                write_conditions(w, wrapper.conditions(), &ParamPath::root("condition"))?;
            }
        }
        Ok(())
    }
}

impl<E> Resolve for KeyTarget<'_, E> {
    fn resolve(&self, path: &[Segment]) -> Option<Value> {
        match (self, path) {
            (KeyTarget::Id(id), [Segment::Key(k)]) if k == "id" => Some(id.clone()),
            (KeyTarget::Ids(ids), [Segment::Key(k), rest @ ..]) if k == "ids" => ids.resolve(rest),
            (KeyTarget::Condition(wrapper), [Segment::Key(k), rest @ ..]) if k == "condition" => {
                wrapper.resolve(rest)
            }
            _ => None,
        }
    }
}

// ============================================================================
// INSERT
// ============================================================================

/// INSERT of one entity.
///
/// Placeholders address the entity's fields directly (`#{userName}`).
///
/// # Example
///
/// ```ignore
/// let (sql, params) = InsertBuilder::new(&user).selective(true).build()?;
/// // INSERT INTO user_info (id, user_name) VALUES (#{id}, #{userName})
/// ```
#[derive(Debug)]
pub struct InsertBuilder<'a, E: Entity> {
    entity: &'a E,
    selective: bool,
}

impl<'a, E: Entity> InsertBuilder<'a, E> {
    /// Create a new INSERT builder for the given entity.
    pub fn new(entity: &'a E) -> Self {
        Self {
            entity,
            selective: false,
        }
    }

    /// Skip null non-key fields.
    pub fn selective(mut self, selective: bool) -> Self {
        self.selective = selective;
        self
    }

    /// Synthesize the statement.
    pub fn to_statement(&self, dialect: Dialect) -> Result<Statement> {
        let info = EntityInfo::of::<E>()?;
        let row = self.entity.to_row();
        let fields = insert_fields(&info, &row, self.selective);
        if fields.is_empty() {
            return Err(Error::NoUpdatableFields(info.name().to_string()));
        }

        let mut w = SqlWriter::new(dialect);
        w.push("INSERT INTO ");
        w.push(info.table());
        w.push(" (");
        w.push(&fields.iter().map(|f| f.column_name).collect::<Vec<_>>().join(", "));
        w.push(") VALUES (");
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.param(ParamPath::root(field.name));
        }
        w.push(")");
        Ok(w.finish())
    }

    /// Build the INSERT SQL and parameters with the default dialect.
    pub fn build(&self) -> Result<(String, Vec<Value>)> {
        self.build_with_dialect(Dialect::default())
    }

    /// Build the INSERT SQL and parameters with a specific dialect.
    pub fn build_with_dialect(&self, dialect: Dialect) -> Result<(String, Vec<Value>)> {
        let stmt = self.to_statement(dialect)?;
        let values = stmt.bind(&EntityRef(self.entity))?;
        Ok((stmt.sql, values))
    }
}

/// Multi-row INSERT.
///
/// The column list follows the first entity; row `i` is addressed as
/// `list[i].<field>`.
#[derive(Debug)]
pub struct InsertManyBuilder<'a, E: Entity> {
    entities: &'a [E],
    selective: bool,
}

impl<'a, E: Entity> InsertManyBuilder<'a, E> {
    /// Create a new multi-row INSERT builder.
    pub fn new(entities: &'a [E]) -> Self {
        Self {
            entities,
            selective: false,
        }
    }

    /// Skip fields that are null in the first entity.
    pub fn selective(mut self, selective: bool) -> Self {
        self.selective = selective;
        self
    }

    /// Synthesize the statement.
    pub fn to_statement(&self, dialect: Dialect) -> Result<Statement> {
        let info = EntityInfo::of::<E>()?;
        let Some(first) = self.entities.first() else {
            return Err(Error::Custom(format!(
                "Cannot build a multi-row insert for {} from an empty list",
                info.name()
            )));
        };
        let fields = insert_fields(&info, &first.to_row(), self.selective);
        if fields.is_empty() {
            return Err(Error::NoUpdatableFields(info.name().to_string()));
        }

        let list = ParamPath::root("list");
        let mut w = SqlWriter::new(dialect);
        w.push("INSERT INTO ");
        w.push(info.table());
        w.push(" (");
        w.push(&fields.iter().map(|f| f.column_name).collect::<Vec<_>>().join(", "));
        w.push(") VALUES ");
        for row in 0..self.entities.len() {
            w.push(if row == 0 { "(" } else { ", (" });
            let item = list.index(row);
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                w.param(item.key(field.name));
            }
            w.push(")");
        }
        Ok(w.finish())
    }

    /// Build the INSERT SQL and parameters with the default dialect.
    pub fn build(&self) -> Result<(String, Vec<Value>)> {
        self.build_with_dialect(Dialect::default())
    }

    /// Build the INSERT SQL and parameters with a specific dialect.
    pub fn build_with_dialect(&self, dialect: Dialect) -> Result<(String, Vec<Value>)> {
        let stmt = self.to_statement(dialect)?;
        let list = EntityList(self.entities);
        let values = stmt.bind(&Params::new().with("list", &list))?;
        Ok((stmt.sql, values))
    }
}

// ============================================================================
// UPDATE
// ============================================================================

enum UpdateSource<'a, E> {
    ById(&'a E),
    ByCondition(&'a E, &'a ConditionWrapper<E>),
    WithSpec(&'a UpdateSpec<E>, &'a ConditionWrapper<E>),
}

/// UPDATE of one row by key, or of every row matching a condition.
///
/// | Constructor | SET from | WHERE | Paths |
/// |---|---|---|---|
/// | `by_id` | entity fields | key | `#{field}` |
/// | `by_condition` | entity fields | wrapper | `#{entity.field}`, `#{condition...}` |
/// | `with_spec` | update spec | wrapper | `#{spec.updates.col}`, `#{condition...}` |
pub struct UpdateBuilder<'a, E: Entity> {
    source: UpdateSource<'a, E>,
    selective: bool,
}

impl<'a, E: Entity> UpdateBuilder<'a, E> {
    /// Update the row whose key equals the entity's key.
    pub fn by_id(entity: &'a E) -> Self {
        Self {
            source: UpdateSource::ById(entity),
            selective: false,
        }
    }

    /// Update every row matching `condition` with the entity's fields.
    pub fn by_condition(entity: &'a E, condition: &'a ConditionWrapper<E>) -> Self {
        Self {
            source: UpdateSource::ByCondition(entity, condition),
            selective: false,
        }
    }

    /// Update every row matching `condition` with explicit column overrides.
    pub fn with_spec(spec: &'a UpdateSpec<E>, condition: &'a ConditionWrapper<E>) -> Self {
        Self {
            source: UpdateSource::WithSpec(spec, condition),
            selective: false,
        }
    }

    /// Skip null entity fields in the SET list. No effect with an update spec.
    pub fn selective(mut self, selective: bool) -> Self {
        self.selective = selective;
        self
    }

    /// Synthesize the statement.
    pub fn to_statement(&self, dialect: Dialect) -> Result<Statement> {
        let info = EntityInfo::of::<E>()?;
        let mut w = SqlWriter::new(dialect);
        w.push("UPDATE ");
        w.push(info.table());
        w.push(" SET ");

        match &self.source {
            UpdateSource::ById(entity) => {
                let key = info.require_key()?;
                let row = entity.to_row();
                require_key_value(&info, key, &row)?;
                write_entity_set(&mut w, &update_fields(&info, &row, self.selective)?, None);
                w.push(" WHERE ");
                w.push(key.column_name);
                w.push(" = ");
                w.param(ParamPath::root(key.name));
            }
            UpdateSource::ByCondition(entity, condition) => {
                let row = entity.to_row();
                let prefix = ParamPath::root("entity");
                write_entity_set(
                    &mut w,
                    &update_fields(&info, &row, self.selective)?,
                    Some(&prefix),
                );
                w.push(" WHERE ");
                write_conditions(&mut w, condition.conditions(), &ParamPath::root("condition"))?;
            }
            UpdateSource::WithSpec(spec, condition) => {
                write_set_clause(&mut w, spec, &ParamPath::root("spec"))?;
                w.push(" WHERE ");
                write_conditions(&mut w, condition.conditions(), &ParamPath::root("condition"))?;
            }
        }
        w.push(&info.live_row_filter());
        Ok(w.finish())
    }

    /// Build the UPDATE SQL and parameters with the default dialect.
    pub fn build(&self) -> Result<(String, Vec<Value>)> {
        self.build_with_dialect(Dialect::default())
    }

    /// Build the UPDATE SQL and parameters with a specific dialect.
    pub fn build_with_dialect(&self, dialect: Dialect) -> Result<(String, Vec<Value>)> {
        let stmt = self.to_statement(dialect)?;
        let values = match &self.source {
            UpdateSource::ById(entity) => stmt.bind(&EntityRef(*entity))?,
            UpdateSource::ByCondition(entity, condition) => {
                let entity = EntityRef(*entity);
                stmt.bind(
                    &Params::new()
                        .with("entity", &entity)
                        .with("condition", *condition),
                )?
            }
            UpdateSource::WithSpec(spec, condition) => stmt.bind(
                &Params::new()
                    .with("spec", *spec)
                    .with("condition", *condition),
            )?,
        };
        Ok((stmt.sql, values))
    }
}

fn write_entity_set(w: &mut SqlWriter, fields: &[&'static FieldInfo], prefix: Option<&ParamPath>) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            w.push(", ");
        }
        w.push(field.column_name);
        w.push(" = ");
        w.param(match prefix {
            Some(prefix) => prefix.key(field.name),
            None => ParamPath::root(field.name),
        });
    }
}

/// One UPDATE for many rows, each identified by its key.
///
/// ```sql
/// UPDATE user_info SET
///   age = CASE id WHEN #{list[0].id} THEN #{list[0].age} ... ELSE age END
/// WHERE id IN (#{list[0].id}, ...) AND is_deleted = 0
/// ```
///
/// With `selective`, columns that are null in the first entity are skipped.
#[derive(Debug)]
pub struct BatchUpdateBuilder<'a, E: Entity> {
    entities: &'a [E],
    selective: bool,
}

impl<'a, E: Entity> BatchUpdateBuilder<'a, E> {
    /// Create a new batch UPDATE builder.
    pub fn new(entities: &'a [E]) -> Self {
        Self {
            entities,
            selective: false,
        }
    }

    /// Skip columns that are null in the first entity.
    pub fn selective(mut self, selective: bool) -> Self {
        self.selective = selective;
        self
    }

    /// Synthesize the statement.
    pub fn to_statement(&self, dialect: Dialect) -> Result<Statement> {
        let info = EntityInfo::of::<E>()?;
        let key = info.require_key()?;
        let Some(first) = self.entities.first() else {
            return Err(Error::NoUpdatableFields(info.name().to_string()));
        };
        for entity in self.entities {
            require_key_value(&info, key, &entity.to_row())?;
        }
        let fields = update_fields(&info, &first.to_row(), self.selective)?;

        let list = ParamPath::root("list");
        let mut w = SqlWriter::new(dialect);
        w.push("UPDATE ");
        w.push(info.table());
        w.push(" SET ");
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push(field.column_name);
            w.push(" = CASE ");
            w.push(key.column_name);
            for row in 0..self.entities.len() {
                let item = list.index(row);
                w.push(" WHEN ");
                w.param(item.key(key.name));
                w.push(" THEN ");
                w.param(item.key(field.name));
            }
            w.push(" ELSE ");
            w.push(field.column_name);
            w.push(" END");
        }
        w.push(" WHERE ");
        w.push(key.column_name);
        w.push(" IN (");
        for row in 0..self.entities.len() {
            if row > 0 {
                w.push(", ");
            }
            w.param(list.index(row).key(key.name));
        }
        w.push(")");
        w.push(&info.live_row_filter());
        Ok(w.finish())
    }

    /// Build the UPDATE SQL and parameters with the default dialect.
    pub fn build(&self) -> Result<(String, Vec<Value>)> {
        self.build_with_dialect(Dialect::default())
    }

    /// Build the UPDATE SQL and parameters with a specific dialect.
    pub fn build_with_dialect(&self, dialect: Dialect) -> Result<(String, Vec<Value>)> {
        let stmt = self.to_statement(dialect)?;
        let list = EntityList(self.entities);
        let values = stmt.bind(&Params::new().with("list", &list))?;
        Ok((stmt.sql, values))
    }
}

// ============================================================================
// DELETE
// ============================================================================

/// Physical or logical DELETE by key, key list or condition.
///
/// A logical delete rewrites the statement as
/// `UPDATE <table> SET <col> = <deleted> WHERE ...` and requires exactly one
/// logic-delete field on the entity.
pub struct DeleteBuilder<'a, E: Entity> {
    target: KeyTarget<'a, E>,
    logical: bool,
}

impl<'a, E: Entity> DeleteBuilder<'a, E> {
    /// Delete the row with key `id`.
    pub fn by_id(id: impl Into<Value>) -> Self {
        Self {
            target: KeyTarget::Id(id.into()),
            logical: false,
        }
    }

    /// Delete every row whose key is in `ids`. An empty list deletes nothing.
    pub fn by_ids<V: Into<Value>>(ids: impl IntoIterator<Item = V>) -> Self {
        Self {
            target: KeyTarget::Ids(ids.into_iter().map(Into::into).collect()),
            logical: false,
        }
    }

    /// Delete every row matching `condition`.
    pub fn by_condition(condition: &'a ConditionWrapper<E>) -> Self {
        Self {
            target: KeyTarget::Condition(condition),
            logical: false,
        }
    }

    /// Mark rows deleted instead of removing them.
    pub fn logical(mut self) -> Self {
        self.logical = true;
        self
    }

    /// Synthesize the statement.
    pub fn to_statement(&self, dialect: Dialect) -> Result<Statement> {
        let info = EntityInfo::of::<E>()?;
        let mut w = SqlWriter::new(dialect);
        if self.logical {
            let (field, marker) = info.require_logic_delete()?;
            w.push("UPDATE ");
            w.push(info.table());
            w.push(" SET ");
            w.push(field.column_name);
            w.push(" = ");
            w.push(marker.deleted);
        } else {
            w.push("DELETE FROM ");
            w.push(info.table());
        }
        w.push(" WHERE ");
        self.target.write(&mut w, &info)?;
        Ok(w.finish())
    }

    /// Build the DELETE SQL and parameters with the default dialect.
    pub fn build(&self) -> Result<(String, Vec<Value>)> {
        self.build_with_dialect(Dialect::default())
    }

    /// Build the DELETE SQL and parameters with a specific dialect.
    pub fn build_with_dialect(&self, dialect: Dialect) -> Result<(String, Vec<Value>)> {
        let stmt = self.to_statement(dialect)?;
        let values = stmt.bind(&self.target)?;
        Ok((stmt.sql, values))
    }
}
