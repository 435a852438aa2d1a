use crate::{Entity, Value};

/// One predicate of a [`Filter`].
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// SQL fragment with `?` placeholders and the values bound to them.
    Raw { sql: String, params: Vec<Value> },
    /// `column = value` (`IS NULL` for a null value, `IN (...)` for a list).
    Equals { column: String, value: Value },
}

/// Row selection shared by every read, update and delete.
///
/// Raw predicates, partial records and column maps all normalize into a list
/// of clauses joined by `AND`. Unless [`Filter::with_deleted`] is set, rows
/// carrying a soft delete mark are excluded.
///
/// ```rust
/// use rowkit_core::{Filter, params};
/// let filter = Filter::raw("name = ? AND age >= ?", params!["Tony Stark", 22])
///     .and(Filter::eq("desc", "Genius"));
/// assert_eq!(filter.clauses.len(), 2);
/// ```
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Filter {
    pub clauses: Vec<Clause>,
    pub with_deleted: bool,
}

impl Filter {
    /// Every row in scope.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn raw(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            clauses: vec![Clause::Raw {
                sql: sql.into(),
                params,
            }],
            with_deleted: false,
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            clauses: vec![Clause::Equals {
                column: column.into(),
                value: value.into(),
            }],
            with_deleted: false,
        }
    }

    /// Equality on every field of `entity` that does not hold its zero value.
    pub fn from_entity<E: Entity>(entity: &E) -> Self {
        Self {
            clauses: entity
                .row_filled()
                .into_iter()
                .map(|(column, value)| Clause::Equals {
                    column: column.name.to_string(),
                    value,
                })
                .collect(),
            with_deleted: false,
        }
    }

    /// Equality on every pair. Columns are checked against the entity when the
    /// filter is rendered.
    pub fn from_map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            clauses: pairs
                .into_iter()
                .map(|(k, v)| Clause::Equals {
                    column: k.into(),
                    value: v.into(),
                })
                .collect(),
            with_deleted: false,
        }
    }

    pub fn and(mut self, other: Filter) -> Self {
        self.clauses.extend(other.clauses);
        self.with_deleted |= other.with_deleted;
        self
    }

    /// Lift the soft delete scope: marked rows are selected too, deletes become physical.
    pub fn with_deleted(mut self) -> Self {
        self.with_deleted = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
