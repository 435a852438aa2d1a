use crate::{AsValue, Context, Error, Result, Value, truncate_long};
use std::{
    fmt::{self, Display},
    mem,
    sync::Arc,
};

/// SQL text with its positional parameters, ready to be executed by an [`Executor`](crate::Executor).
///
/// Placeholders are `?`. A list parameter expands to one placeholder per
/// element (`IN (?, ?, ?)`), an empty list to `NULL` so that `IN (NULL)`
/// matches nothing.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Query {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Query {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Build a query out of SQL text with `?` placeholders and the values to bind.
    pub fn bound(sql: impl AsRef<str>, params: impl IntoIterator<Item = Value>) -> Result<Self> {
        let mut query = Query::default();
        query.push_bound(sql.as_ref(), params)?;
        Ok(query)
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn push_str(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append a placeholder (or several, for a list) and bind the value.
    pub fn push_value(&mut self, value: Value) -> &mut Self {
        match value {
            Value::List(Some(items), ..) if !items.is_empty() => {
                for (i, item) in items.into_iter().enumerate() {
                    if i > 0 {
                        self.sql.push_str(", ");
                    }
                    self.push_value(item);
                }
            }
            Value::List(..) => self.sql.push_str("NULL"),
            value => {
                self.sql.push('?');
                self.params.push(value);
            }
        }
        self
    }

    /// Append SQL text, binding `params` to its `?` placeholders in order.
    ///
    /// Question marks inside quoted strings, quoted identifiers and comments
    /// (`-- `, `#` and `/* */`) are left alone. The number of placeholders must
    /// match the number of parameters.
    pub fn push_bound(
        &mut self,
        sql: &str,
        params: impl IntoIterator<Item = Value>,
    ) -> Result<&mut Self> {
        let mut params = params.into_iter();
        let mut state = Scan::Code;
        let mut chars = sql.chars().peekable();
        let mut placeholders = 0;
        while let Some(c) = chars.next() {
            self.sql.push(c);
            match state {
                Scan::Quoted(q) => {
                    if c == '\\' && q != '`' {
                        if let Some(escaped) = chars.next() {
                            self.sql.push(escaped);
                        }
                    } else if c == q {
                        if chars.peek() == Some(&q) {
                            chars.next();
                            self.sql.push(q);
                        } else {
                            state = Scan::Code;
                        }
                    }
                }
                Scan::LineComment => {
                    if c == '\n' {
                        state = Scan::Code;
                    }
                }
                Scan::BlockComment => {
                    if c == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        self.sql.push('/');
                        state = Scan::Code;
                    }
                }
                Scan::Code => match c {
                    '?' => {
                        self.sql.pop();
                        placeholders += 1;
                        let Some(value) = params.next() else {
                            return Err(Error::msg(format!(
                                "Query has more placeholders than the {} parameters provided: {}",
                                placeholders - 1,
                                truncate_long!(sql)
                            )));
                        };
                        self.push_value(value);
                    }
                    '\'' | '"' | '`' => state = Scan::Quoted(c),
                    '#' => state = Scan::LineComment,
                    // MySQL wants a space or control character after `--`
                    '-' if chars.peek() == Some(&'-') => {
                        chars.next();
                        self.sql.push('-');
                        if chars.peek().is_none_or(|v| v.is_whitespace() || v.is_control()) {
                            state = Scan::LineComment;
                        }
                    }
                    '/' if chars.peek() == Some(&'*') => {
                        chars.next();
                        self.sql.push('*');
                        state = Scan::BlockComment;
                    }
                    _ => {}
                },
            }
        }
        if state == Scan::LineComment {
            // Text appended later must not end up commented out
            self.sql.push('\n');
        }
        let remaining = params.count();
        if remaining > 0 {
            return Err(Error::msg(format!(
                "Query has {} placeholders but {} parameters were provided: {}",
                placeholders,
                placeholders + remaining,
                truncate_long!(sql)
            )));
        }
        Ok(self)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    Quoted(char),
    LineComment,
    BlockComment,
}

impl From<&str> for Query {
    fn from(value: &str) -> Self {
        Query::new(value)
    }
}

impl From<String> for Query {
    fn from(value: String) -> Self {
        Query::new(value)
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))?;
        if !self.params.is_empty() {
            f.write_str(" -- [")?;
            for (i, param) in self.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{param}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// Metadata about modify operations (INSERT/UPDATE/DELETE).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    /// Total number of rows impacted.
    pub rows_affected: u64,
    /// Identifier generated by the last insert, when any.
    pub last_affected_id: Option<u64>,
}

impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for elem in iter {
            self.rows_affected += elem.rows_affected;
            if elem.last_affected_id.is_some() {
                self.last_affected_id = elem.last_affected_id;
            }
        }
    }
}

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(names: RowNames, values: Row) -> Self {
        Self {
            labels: names,
            values,
        }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values[i])
    }
    /// Move the value of the named column out of the row and convert it.
    pub fn take<T: AsValue>(&mut self, name: &str) -> Result<T> {
        let Some(i) = self.labels.iter().position(|v| v == name) else {
            return Err(Error::msg(format!(
                "Column `{}` is missing from the row (available: {})",
                name,
                self.labels.join(", ")
            )));
        };
        T::try_from_value(mem::take(&mut self.values[i]))
            .with_context(|| format!("While decoding column `{name}`"))
    }
}

impl From<RowLabeled> for Row {
    fn from(value: RowLabeled) -> Self {
        value.values
    }
}
