use rowkit_core::{Entity, SqlWriter, Value};
use std::fmt::Write;

#[derive(Default, Debug, Clone, Copy)]
pub struct MySQLSqlWriter {}

impl SqlWriter for MySQLSqlWriter {
    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('`');
        self.write_escaped(out, value, '`', "``");
        out.push('`');
    }

    fn write_column_type(&self, out: &mut String, value: &Value, size: Option<u32>) {
        match value {
            Value::Boolean(..) => out.push_str("BOOLEAN"),
            Value::Int8(..) => out.push_str("TINYINT"),
            Value::Int16(..) => out.push_str("SMALLINT"),
            Value::Int32(..) => out.push_str("INTEGER"),
            Value::Int64(..) => out.push_str("BIGINT"),
            Value::UInt8(..) => out.push_str("TINYINT UNSIGNED"),
            Value::UInt16(..) => out.push_str("SMALLINT UNSIGNED"),
            Value::UInt32(..) => out.push_str("INTEGER UNSIGNED"),
            Value::UInt64(..) => out.push_str("BIGINT UNSIGNED"),
            Value::Float32(..) => out.push_str("FLOAT"),
            Value::Float64(..) => out.push_str("DOUBLE"),
            Value::Varchar(..) => {
                let _ = write!(out, "VARCHAR({})", size.unwrap_or(255));
            }
            Value::Blob(..) => out.push_str("BLOB"),
            Value::Date(..) => out.push_str("DATE"),
            Value::Time(..) => out.push_str("TIME(6)"),
            Value::Timestamp(..) => out.push_str("DATETIME(6)"),
            Value::List(..) => out.push_str("JSON"),
            Value::Null => log::error!("Column type cannot be NULL"),
        }
    }

    fn write_column_auto_increment(&self, out: &mut String) {
        out.push_str(" AUTO_INCREMENT");
    }

    fn write_current_schema(&self, out: &mut String) {
        out.push_str("DATABASE()");
    }

    /// Soft delete scoped queries filter on `deleted_at`, keep it indexed.
    fn write_create_table_indexes<E: Entity>(&self, out: &mut String) {
        if let Some(deleted) = E::soft_delete_def() {
            out.push_str(",\nINDEX ");
            self.write_identifier_quoted(out, &format!("idx_{}_{}", E::table().name, deleted.name));
            out.push_str(" (");
            self.write_identifier_quoted(out, deleted.name);
            out.push(')');
        }
    }
}
