//! The condition wrapper: an ordered accumulator of predicates, ORDER BY
//! items and GROUP BY columns for one entity.
//!
//! Top-level conditions are joined with AND in insertion order when
//! synthesized. Every accumulating call checks raw column names first, so an
//! invalid identifier fails even when the value would have been skipped.
//!
//! # Example
//!
//! ```ignore
//! let wrapper = ConditionWrapper::<User>::new()
//!     .eq("status", 1)?
//!     .like(User::NAME, "ali")?
//!     .or([Condition::lt("age", 18), Condition::gt("age", 65)])?
//!     .order_by_desc("create_time")?;
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use sqlmapper_core::{Result, Value};

use crate::column::IntoColumn;
use crate::condition::{Condition, Operator};

/// One ORDER BY item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub column: String,
    pub ascending: bool,
}

/// Ordered predicate builder for entity `E`.
///
/// Single-writer: build it for one request and hand it to a statement
/// builder; it is not meant to be shared across requests.
pub struct ConditionWrapper<E> {
    conditions: Vec<Condition>,
    orders: Vec<OrderItem>,
    groups: Vec<String>,
    _marker: PhantomData<fn() -> E>,
}

impl<E> ConditionWrapper<E> {
    /// Create an empty wrapper.
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
            orders: Vec::new(),
            groups: Vec::new(),
            _marker: PhantomData,
        }
    }

    fn compare(
        mut self,
        operator: Operator,
        column: impl IntoColumn<E>,
        value: impl Into<Value>,
        ignore_null: bool,
    ) -> Result<Self> {
        let column = column.into_column()?;
        let value = value.into();
        if !ignore_null || !value.is_null() {
            self.conditions.push(Condition::Simple {
                operator,
                column,
                value,
            });
        }
        Ok(self)
    }

    // ========================================================================
    // Comparisons (null values skipped by default)
    // ========================================================================

    /// `column = value`, skipped when `value` is null.
    pub fn eq(self, column: impl IntoColumn<E>, value: impl Into<Value>) -> Result<Self> {
        self.compare(Operator::Eq, column, value, true)
    }

    /// `column = value`; with `ignore_null == false` a null value becomes `IS NULL`.
    pub fn eq_with(
        self,
        column: impl IntoColumn<E>,
        value: impl Into<Value>,
        ignore_null: bool,
    ) -> Result<Self> {
        self.compare(Operator::Eq, column, value, ignore_null)
    }

    /// `column <> value`, skipped when `value` is null.
    pub fn ne(self, column: impl IntoColumn<E>, value: impl Into<Value>) -> Result<Self> {
        self.compare(Operator::Ne, column, value, true)
    }

    /// `column <> value`; with `ignore_null == false` a null value becomes `IS NOT NULL`.
    pub fn ne_with(
        self,
        column: impl IntoColumn<E>,
        value: impl Into<Value>,
        ignore_null: bool,
    ) -> Result<Self> {
        self.compare(Operator::Ne, column, value, ignore_null)
    }

    /// `column > value`, skipped when `value` is null.
    pub fn gt(self, column: impl IntoColumn<E>, value: impl Into<Value>) -> Result<Self> {
        self.compare(Operator::Gt, column, value, true)
    }

    /// `column > value`. A kept null value is rejected at synthesis.
    pub fn gt_with(
        self,
        column: impl IntoColumn<E>,
        value: impl Into<Value>,
        ignore_null: bool,
    ) -> Result<Self> {
        self.compare(Operator::Gt, column, value, ignore_null)
    }

    /// `column >= value`, skipped when `value` is null.
    pub fn ge(self, column: impl IntoColumn<E>, value: impl Into<Value>) -> Result<Self> {
        self.compare(Operator::Ge, column, value, true)
    }

    /// `column >= value`. A kept null value is rejected at synthesis.
    pub fn ge_with(
        self,
        column: impl IntoColumn<E>,
        value: impl Into<Value>,
        ignore_null: bool,
    ) -> Result<Self> {
        self.compare(Operator::Ge, column, value, ignore_null)
    }

    /// `column < value`, skipped when `value` is null.
    pub fn lt(self, column: impl IntoColumn<E>, value: impl Into<Value>) -> Result<Self> {
        self.compare(Operator::Lt, column, value, true)
    }

    /// `column < value`. A kept null value is rejected at synthesis.
    pub fn lt_with(
        self,
        column: impl IntoColumn<E>,
        value: impl Into<Value>,
        ignore_null: bool,
    ) -> Result<Self> {
        self.compare(Operator::Lt, column, value, ignore_null)
    }

    /// `column <= value`, skipped when `value` is null.
    pub fn le(self, column: impl IntoColumn<E>, value: impl Into<Value>) -> Result<Self> {
        self.compare(Operator::Le, column, value, true)
    }

    /// `column <= value`. A kept null value is rejected at synthesis.
    pub fn le_with(
        self,
        column: impl IntoColumn<E>,
        value: impl Into<Value>,
        ignore_null: bool,
    ) -> Result<Self> {
        self.compare(Operator::Le, column, value, ignore_null)
    }

    // ========================================================================
    // LIKE (null or blank patterns skipped by default)
    // ========================================================================

    /// `column LIKE %pattern%`, skipped when the pattern is blank.
    pub fn like(self, column: impl IntoColumn<E>, pattern: &str) -> Result<Self> {
        self.like_with(column, Some(pattern), true)
    }

    /// `column LIKE %pattern%`.
    ///
    /// With `ignore_empty == false` a blank pattern still matches via `%%`;
    /// a missing pattern is kept as a null comparison and rejected at synthesis.
    pub fn like_with(
        mut self,
        column: impl IntoColumn<E>,
        pattern: Option<&str>,
        ignore_empty: bool,
    ) -> Result<Self> {
        let column = column.into_column()?;
        let blank = pattern.is_none_or(|p| p.trim().is_empty());
        if !ignore_empty || !blank {
            self.conditions.push(match pattern {
                Some(p) => Condition::like(column, p),
                None => Condition::Simple {
                    operator: Operator::Like,
                    column,
                    value: Value::Null,
                },
            });
        }
        Ok(self)
    }

    // ========================================================================
    // IS NULL / IS NOT NULL
    // ========================================================================

    /// `column IS NULL`
    pub fn is_null(mut self, column: impl IntoColumn<E>) -> Result<Self> {
        self.conditions.push(Condition::is_null(column.into_column()?));
        Ok(self)
    }

    /// `column IS NOT NULL`
    pub fn is_not_null(mut self, column: impl IntoColumn<E>) -> Result<Self> {
        self.conditions
            .push(Condition::is_not_null(column.into_column()?));
        Ok(self)
    }

    // ========================================================================
    // IN / NOT IN (empty lists skipped by default)
    // ========================================================================

    /// `column IN (...)`, skipped when `values` is empty.
    pub fn in_list<V: Into<Value>>(
        self,
        column: impl IntoColumn<E>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        self.membership(column, values, false, true)
    }

    /// `column IN (...)`; with `ignore_empty == false` an empty list becomes `1=0`.
    pub fn in_list_with<V: Into<Value>>(
        self,
        column: impl IntoColumn<E>,
        values: impl IntoIterator<Item = V>,
        ignore_empty: bool,
    ) -> Result<Self> {
        self.membership(column, values, false, ignore_empty)
    }

    /// `column NOT IN (...)`, skipped when `values` is empty.
    pub fn not_in<V: Into<Value>>(
        self,
        column: impl IntoColumn<E>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        self.membership(column, values, true, true)
    }

    /// `column NOT IN (...)`; with `ignore_empty == false` an empty list becomes `1=1`.
    pub fn not_in_with<V: Into<Value>>(
        self,
        column: impl IntoColumn<E>,
        values: impl IntoIterator<Item = V>,
        ignore_empty: bool,
    ) -> Result<Self> {
        self.membership(column, values, true, ignore_empty)
    }

    fn membership<V: Into<Value>>(
        mut self,
        column: impl IntoColumn<E>,
        values: impl IntoIterator<Item = V>,
        negated: bool,
        ignore_empty: bool,
    ) -> Result<Self> {
        let column = column.into_column()?;
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if !ignore_empty || !values.is_empty() {
            self.conditions.push(Condition::In {
                column,
                values,
                negated,
            });
        }
        Ok(self)
    }

    // ========================================================================
    // Groups
    // ========================================================================

    /// Add `(c0 AND c1 ...)`. Absent children are dropped; nothing is added
    /// when none remain.
    pub fn and<I, C>(self, children: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Option<Condition>>,
    {
        self.push_group(Condition::and(children))
    }

    /// Add `(c0 OR c1 ...)`. See [`ConditionWrapper::and`].
    pub fn or<I, C>(self, children: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Option<Condition>>,
    {
        self.push_group(Condition::or(children))
    }

    fn push_group(mut self, group: Option<Condition>) -> Result<Self> {
        if let Some(group) = group {
            group.validate_columns()?;
            self.conditions.push(group);
        }
        Ok(self)
    }

    // ========================================================================
    // ORDER BY / GROUP BY
    // ========================================================================

    /// Append `column ASC`.
    pub fn order_by_asc(self, column: impl IntoColumn<E>) -> Result<Self> {
        self.order_by(column, true)
    }

    /// Append `column DESC`.
    pub fn order_by_desc(self, column: impl IntoColumn<E>) -> Result<Self> {
        self.order_by(column, false)
    }

    /// Append an ORDER BY item.
    pub fn order_by(mut self, column: impl IntoColumn<E>, ascending: bool) -> Result<Self> {
        self.orders.push(OrderItem {
            column: column.into_column()?,
            ascending,
        });
        Ok(self)
    }

    /// Append a GROUP BY column.
    pub fn group_by(mut self, column: impl IntoColumn<E>) -> Result<Self> {
        self.groups.push(column.into_column()?);
        Ok(self)
    }

    /// Append several GROUP BY columns; all are checked before any is added.
    pub fn group_by_all<C: IntoColumn<E>>(
        mut self,
        columns: impl IntoIterator<Item = C>,
    ) -> Result<Self> {
        let columns = columns
            .into_iter()
            .map(IntoColumn::<E>::into_column)
            .collect::<Result<Vec<_>>>()?;
        self.groups.extend(columns);
        Ok(self)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Top-level conditions in insertion order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// ORDER BY items in insertion order.
    pub fn orders(&self) -> &[OrderItem] {
        &self.orders
    }

    /// GROUP BY columns in insertion order.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Number of top-level conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Whether no condition has been added.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl<E> Default for ConditionWrapper<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for ConditionWrapper<E> {
    fn clone(&self) -> Self {
        Self {
            conditions: self.conditions.clone(),
            orders: self.orders.clone(),
            groups: self.groups.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E> fmt::Debug for ConditionWrapper<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionWrapper")
            .field("conditions", &self.conditions)
            .field("orders", &self.orders)
            .field("groups", &self.groups)
            .finish()
    }
}
