use crate::Value;

/// Table identity.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRef {
    /// Table name.
    pub name: &'static str,
    /// Schema name (may be empty).
    pub schema: &'static str,
}

impl TableRef {
    pub fn full_name(&self) -> String {
        let mut result = String::new();
        if !self.schema.is_empty() {
            result.push_str(self.schema);
            result.push('.');
        }
        result.push_str(self.name);
        result
    }
}

/// Bookkeeping a column is responsible for, beyond holding user data.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    #[default]
    Data,
    /// Filled on insert when empty.
    CreatedAt,
    /// Refreshed by every write.
    UpdatedAt,
    /// Soft delete marker: rows where it is not NULL are out of scope.
    DeletedAt,
}

impl ColumnRole {
    pub fn is_audit(&self) -> bool {
        *self != ColumnRole::Data
    }
}

/// Declarative specification of a table column.
#[derive(Default, Debug, Clone)]
pub struct ColumnDef {
    /// Column name.
    pub name: &'static str,
    /// Typed NULL describing the column type.
    pub value: Value,
    pub nullable: bool,
    /// SQL literal rendered in `DEFAULT`.
    pub default: Option<&'static str>,
    pub primary_key: bool,
    pub auto_increment: bool,
    /// Maximum length for text columns.
    pub size: Option<u32>,
    pub role: ColumnRole,
}
