use crate::{
    Clause, ColumnDef, ColumnRole, Entity, Error, Filter, Query, Result, TableRef, Value,
    separated_by,
};
use std::fmt::Write;

/// Sort direction on the primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// Renders statements for an entity. Drivers override the dialect specific
/// pieces (identifier quoting, column types, auto increment, current schema).
///
/// Values never end up in the SQL text: they are bound to `?` placeholders in
/// the [`Query`] being written.
pub trait SqlWriter {
    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', r#""""#);
        out.push('"');
    }

    fn write_table_ref(&self, out: &mut String, value: &TableRef) {
        if !value.schema.is_empty() {
            self.write_identifier_quoted(out, value.schema);
            out.push('.');
        }
        self.write_identifier_quoted(out, value.name);
    }

    fn write_column_type(&self, out: &mut String, value: &Value, size: Option<u32>) {
        match value {
            Value::Boolean(..) => out.push_str("BOOLEAN"),
            Value::Int8(..) => out.push_str("TINYINT"),
            Value::Int16(..) => out.push_str("SMALLINT"),
            Value::Int32(..) => out.push_str("INTEGER"),
            Value::Int64(..) => out.push_str("BIGINT"),
            Value::UInt8(..) => out.push_str("UTINYINT"),
            Value::UInt16(..) => out.push_str("USMALLINT"),
            Value::UInt32(..) => out.push_str("UINTEGER"),
            Value::UInt64(..) => out.push_str("UBIGINT"),
            Value::Float32(..) => out.push_str("FLOAT"),
            Value::Float64(..) => out.push_str("DOUBLE"),
            Value::Varchar(..) => {
                out.push_str("VARCHAR");
                if let Some(size) = size {
                    let _ = write!(out, "({})", size);
                }
            }
            Value::Blob(..) => out.push_str("BLOB"),
            Value::Date(..) => out.push_str("DATE"),
            Value::Time(..) => out.push_str("TIME"),
            Value::Timestamp(..) => out.push_str("TIMESTAMP"),
            Value::List(.., inner) => {
                self.write_column_type(out, inner, None);
                out.push_str("[]");
            }
            Value::Null => {
                log::error!("Column type cannot be NULL");
                out.push_str("NULL");
            }
        }
    }

    fn write_column_auto_increment(&self, out: &mut String) {
        out.push_str(" GENERATED BY DEFAULT AS IDENTITY");
    }

    /// Expression evaluating to the schema the session is connected to.
    fn write_current_schema(&self, out: &mut String) {
        out.push_str("CURRENT_SCHEMA()");
    }

    fn write_create_table<E: Entity>(&self, out: &mut String, if_not_exists: bool) {
        out.push_str("CREATE TABLE ");
        if if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        self.write_table_ref(out, E::table());
        out.push_str(" (\n");
        separated_by(
            out,
            E::columns(),
            |out, v| self.write_create_table_column_fragment(out, v),
            ",\n",
        );
        self.write_create_table_indexes::<E>(out);
        out.push_str("\n)");
    }

    fn write_create_table_column_fragment(&self, out: &mut String, column: &ColumnDef) {
        self.write_identifier_quoted(out, column.name);
        out.push(' ');
        self.write_column_type(out, &column.value, column.size);
        if !column.nullable && !column.primary_key {
            out.push_str(" NOT NULL");
        }
        if let Some(default) = column.default {
            out.push_str(" DEFAULT ");
            out.push_str(default);
        }
        if column.auto_increment {
            self.write_column_auto_increment(out);
        }
        if column.primary_key {
            out.push_str(" PRIMARY KEY");
        }
    }

    /// Inline index declarations, appended after the columns.
    fn write_create_table_indexes<E: Entity>(&self, _out: &mut String) {}

    fn write_drop_table<E: Entity>(&self, out: &mut String, if_exists: bool) {
        out.push_str("DROP TABLE ");
        if if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_table_ref(out, E::table());
    }

    /// Query returning one row when the table exists, none otherwise.
    fn write_table_exists<E: Entity>(&self, query: &mut Query) {
        let table = E::table();
        query.push_str("SELECT 1\nFROM information_schema.tables\nWHERE table_name = ");
        query.push_value(Value::Varchar(Some(table.name.into())));
        query.push_str(" AND table_schema = ");
        if table.schema.is_empty() {
            self.write_current_schema(&mut query.sql);
        } else {
            query.push_value(Value::Varchar(Some(table.schema.into())));
        }
    }

    /// `WHERE` clause for `filter`, soft delete scope included. Writes nothing
    /// when there is no predicate at all.
    fn write_filter<E: Entity>(&self, query: &mut Query, filter: &Filter) -> Result<()> {
        let scope = if filter.with_deleted {
            None
        } else {
            E::soft_delete_def()
        };
        let count = filter.clauses.len() + scope.is_some() as usize;
        if count == 0 {
            return Ok(());
        }
        query.push_str("\nWHERE ");
        let mut first = true;
        for clause in &filter.clauses {
            if !first {
                query.push_str(" AND ");
            }
            first = false;
            match clause {
                Clause::Raw { sql, params } => {
                    if count > 1 {
                        query.push_str("(");
                    }
                    query.push_bound(sql, params.iter().cloned())?;
                    if count > 1 {
                        query.push_str(")");
                    }
                }
                Clause::Equals { column, value } => {
                    let Some(def) = E::column_def(column) else {
                        return Err(Error::msg(format!(
                            "Column `{}` does not exist in table `{}`",
                            column,
                            E::table().full_name()
                        )));
                    };
                    self.write_identifier_quoted(&mut query.sql, def.name);
                    if value.is_null() {
                        query.push_str(" IS NULL");
                    } else if matches!(value, Value::List(..)) {
                        query.push_str(" IN (");
                        query.push_value(value.clone());
                        query.push_str(")");
                    } else {
                        query.push_str(" = ");
                        query.push_value(value.clone());
                    }
                }
            }
        }
        if let Some(deleted) = scope {
            if !first {
                query.push_str(" AND ");
            }
            self.write_identifier_quoted(&mut query.sql, deleted.name);
            query.push_str(" IS NULL");
        }
        Ok(())
    }

    fn write_select<E: Entity>(
        &self,
        query: &mut Query,
        filter: &Filter,
        order: Option<Order>,
        limit: Option<u32>,
    ) -> Result<()> {
        query.push_str("SELECT ");
        separated_by(
            &mut query.sql,
            E::columns(),
            |out, v| self.write_identifier_quoted(out, v.name),
            ", ",
        );
        query.push_str("\nFROM ");
        self.write_table_ref(&mut query.sql, E::table());
        self.write_filter::<E>(query, filter)?;
        if let (Some(order), Some(pk)) = (order, E::primary_key_def()) {
            query.push_str("\nORDER BY ");
            self.write_identifier_quoted(&mut query.sql, pk.name);
            query.push_str(match order {
                Order::Asc => " ASC",
                Order::Desc => " DESC",
            });
        }
        if let Some(limit) = limit {
            let _ = write!(query.sql, "\nLIMIT {}", limit);
        }
        Ok(())
    }

    /// Single row insert. A zero auto increment key is left to the database.
    fn write_insert<E: Entity>(&self, query: &mut Query, entity: &E) {
        let row = entity
            .row_full()
            .into_iter()
            .filter(|(c, v)| !(c.auto_increment && v.is_zero()))
            .collect::<Vec<_>>();
        query.push_str("INSERT INTO ");
        self.write_table_ref(&mut query.sql, E::table());
        query.push_str(" (");
        separated_by(
            &mut query.sql,
            row.iter(),
            |out, (c, _)| self.write_identifier_quoted(out, c.name),
            ", ",
        );
        query.push_str(") VALUES\n(");
        for (i, (_, value)) in row.into_iter().enumerate() {
            if i > 0 {
                query.push_str(", ");
            }
            query.push_value(value);
        }
        query.push_str(")");
    }

    /// Write every non key column of `entity`, matched by primary key.
    fn write_update<E: Entity>(&self, query: &mut Query, entity: &E) -> Result<()> {
        let Some(pk) = E::primary_key_def() else {
            return Err(Error::msg(format!(
                "Table `{}` has no primary key, rows cannot be updated individually",
                E::table().full_name()
            )));
        };
        query.push_str("UPDATE ");
        self.write_table_ref(&mut query.sql, E::table());
        query.push_str(" SET ");
        let row = entity
            .row_full()
            .into_iter()
            .filter(|(c, _)| !c.primary_key);
        for (i, (column, value)) in row.enumerate() {
            if i > 0 {
                query.push_str(", ");
            }
            self.write_identifier_quoted(&mut query.sql, column.name);
            query.push_str(" = ");
            query.push_value(value);
        }
        self.write_filter::<E>(query, &Filter::eq(pk.name, entity.primary_key()))
    }

    /// Set one column on every row in scope, refreshing the update timestamp if the entity has one.
    fn write_update_column<E: Entity>(
        &self,
        query: &mut Query,
        filter: &Filter,
        column: &ColumnDef,
        value: Value,
        now: Value,
    ) -> Result<()> {
        query.push_str("UPDATE ");
        self.write_table_ref(&mut query.sql, E::table());
        query.push_str(" SET ");
        self.write_identifier_quoted(&mut query.sql, column.name);
        query.push_str(" = ");
        query.push_value(value);
        if let Some(updated) = E::role_def(ColumnRole::UpdatedAt) {
            if updated.name != column.name {
                query.push_str(", ");
                self.write_identifier_quoted(&mut query.sql, updated.name);
                query.push_str(" = ");
                query.push_value(now);
            }
        }
        self.write_filter::<E>(query, filter)
    }

    /// Soft delete (`UPDATE ... SET deleted_at`) when the entity supports it and
    /// the filter is scoped, `DELETE` otherwise.
    fn write_delete<E: Entity>(&self, query: &mut Query, filter: &Filter, now: Value) -> Result<()> {
        match E::soft_delete_def() {
            Some(deleted) if !filter.with_deleted => {
                query.push_str("UPDATE ");
                self.write_table_ref(&mut query.sql, E::table());
                query.push_str(" SET ");
                self.write_identifier_quoted(&mut query.sql, deleted.name);
                query.push_str(" = ");
                query.push_value(now);
            }
            _ => {
                query.push_str("DELETE FROM ");
                self.write_table_ref(&mut query.sql, E::table());
            }
        }
        self.write_filter::<E>(query, filter)
    }
}

/// ANSI flavored writer, used when no dialect applies.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub fn new() -> Self {
        Self
    }
}

impl SqlWriter for GenericSqlWriter {}
