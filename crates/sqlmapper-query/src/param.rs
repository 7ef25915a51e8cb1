//! Parameter paths, placeholder dialects and binding.
//!
//! The synthesizer never copies values into SQL. Each placeholder carries a
//! [`ParamPath`] such as `condition.conditions[2].children[0].value` or
//! `list[3].age` that addresses exactly one value in the object graph the
//! statement was built from. A host binder either renders named
//! placeholders (`#{path}`) itself or calls [`Statement::bind`] to get the
//! ordered values for positional placeholders.

use std::fmt;

use sqlmapper_core::{Entity, Error, Result, Value};

use crate::condition::Condition;
use crate::update::UpdateSpec;
use crate::wrapper::ConditionWrapper;

// ============================================================================
// Paths
// ============================================================================

/// One step of a [`ParamPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Named member (`.name`)
    Key(String),
    /// List element (`[i]`)
    Index(usize),
}

/// Address of one bound value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ParamPath {
    segments: Vec<Segment>,
}

impl ParamPath {
    /// The empty path, addressing the bound root itself.
    pub fn new() -> Self {
        Self::default()
    }

    /// A path starting at a named root.
    pub fn root(key: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Key(key.into())],
        }
    }

    /// Extend with a named member.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.segments.push(Segment::Key(key.into()));
        next
    }

    /// Extend with a list index.
    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(Segment::Index(index));
        next
    }

    /// The segments, root first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether this is the empty path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for ParamPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => f.write_str(key)?,
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// Dialects
// ============================================================================

/// Placeholder syntax used when rendering SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `#{path}`, resolved by a host binder by name.
    #[default]
    Named,
    /// `$1, $2, ...`
    Postgres,
    /// `?1, ?2, ...`
    Sqlite,
    /// `?`
    Mysql,
}

impl Dialect {
    /// Placeholder text for the `index`-th parameter (1-based) at `path`.
    pub fn placeholder(self, index: usize, path: &ParamPath) -> String {
        match self {
            Dialect::Named => format!("#{{{}}}", path),
            Dialect::Postgres => format!("${}", index),
            Dialect::Sqlite => format!("?{}", index),
            Dialect::Mysql => "?".to_string(),
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// An object graph that placeholder paths can be resolved against.
pub trait Resolve {
    /// Value at `path`, relative to `self`.
    fn resolve(&self, path: &[Segment]) -> Option<Value>;
}

impl Resolve for Value {
    fn resolve(&self, path: &[Segment]) -> Option<Value> {
        path.is_empty().then(|| self.clone())
    }
}

impl Resolve for Vec<Value> {
    fn resolve(&self, path: &[Segment]) -> Option<Value> {
        match path {
            [Segment::Index(i), rest @ ..] => self.get(*i)?.resolve(rest),
            _ => None,
        }
    }
}

impl Resolve for Condition {
    fn resolve(&self, path: &[Segment]) -> Option<Value> {
        match (self, path) {
            (Condition::Simple { value, .. }, [Segment::Key(k)]) if k == "value" => {
                Some(value.clone())
            }
            (Condition::In { values, .. }, [Segment::Key(k), Segment::Index(i)])
                if k == "values" =>
            {
                values.get(*i).cloned()
            }
            (Condition::Group { children, .. }, [Segment::Key(k), Segment::Index(i), rest @ ..])
                if k == "children" =>
            {
                children.get(*i)?.resolve(rest)
            }
            _ => None,
        }
    }
}

impl<E> Resolve for ConditionWrapper<E> {
    fn resolve(&self, path: &[Segment]) -> Option<Value> {
        match path {
            [Segment::Key(k), Segment::Index(i), rest @ ..] if k == "conditions" => {
                self.conditions().get(*i)?.resolve(rest)
            }
            _ => None,
        }
    }
}

impl<E> Resolve for UpdateSpec<E> {
    fn resolve(&self, path: &[Segment]) -> Option<Value> {
        match path {
            [Segment::Key(k), Segment::Key(column)] if k == "updates" => self.get(column).cloned(),
            _ => None,
        }
    }
}

/// A single entity as a binding root: `field` resolves to that field's value.
pub struct EntityRef<'a, E>(pub &'a E);

impl<E: Entity> Resolve for EntityRef<'_, E> {
    fn resolve(&self, path: &[Segment]) -> Option<Value> {
        match path {
            [Segment::Key(field)] => self.0.get_value(field),
            _ => None,
        }
    }
}

/// An entity list as a binding root: `[i].field`.
pub struct EntityList<'a, E>(pub &'a [E]);

impl<E: Entity> Resolve for EntityList<'_, E> {
    fn resolve(&self, path: &[Segment]) -> Option<Value> {
        match path {
            [Segment::Index(i), rest @ ..] => EntityRef(self.0.get(*i)?).resolve(rest),
            _ => None,
        }
    }
}

/// Several named roots, as in `entity.name` plus `condition.conditions[0].value`.
#[derive(Default)]
pub struct Params<'a> {
    roots: Vec<(&'a str, &'a dyn Resolve)>,
}

impl<'a> Params<'a> {
    /// Create an empty root set.
    pub fn new() -> Self {
        Self { roots: Vec::new() }
    }

    /// Register a named root.
    pub fn with(mut self, name: &'a str, root: &'a dyn Resolve) -> Self {
        self.roots.push((name, root));
        self
    }
}

impl Resolve for Params<'_> {
    fn resolve(&self, path: &[Segment]) -> Option<Value> {
        let [Segment::Key(name), rest @ ..] = path else {
            return None;
        };
        self.roots
            .iter()
            .find(|(root, _)| *root == name.as_str())
            .and_then(|(_, value)| value.resolve(rest))
    }
}

// ============================================================================
// Statements
// ============================================================================

/// Synthesized SQL text plus the path of every placeholder, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<ParamPath>,
}

impl Statement {
    /// Resolve every placeholder against `root`, in placeholder order.
    pub fn bind(&self, root: &dyn Resolve) -> Result<Vec<Value>> {
        self.params
            .iter()
            .map(|path| {
                root.resolve(path.segments())
                    .ok_or_else(|| Error::UnresolvedParameter(path.to_string()))
            })
            .collect()
    }
}
