use crate::decode_column::{ColumnMetadata, decode_column};
use convert_case::{Case, Casing};
use quote::ToTokens;
use syn::{Error, Fields, ItemStruct, LitStr, Result, parse::ParseBuffer, spanned::Spanned};

pub(crate) struct TableMetadata {
    pub(crate) columns: Vec<ColumnMetadata>,
    pub(crate) name: String,
    pub(crate) schema: String,
}

impl TableMetadata {
    pub(crate) fn mapped(&self) -> impl Iterator<Item = &ColumnMetadata> + Clone {
        self.columns.iter().filter(|c| !c.ignore)
    }
}

pub(crate) fn decode_table(item: &ItemStruct) -> Result<TableMetadata> {
    let Fields::Named(fields) = &item.fields else {
        return Err(Error::new(
            item.span(),
            "Entity can only be derived for structs with named fields",
        ));
    };
    let columns = fields
        .named
        .iter()
        .map(decode_column)
        .collect::<Result<Vec<_>>>()?;
    let mut name = item.ident.to_string().to_case(Case::Snake);
    let mut schema = String::new();
    if name.starts_with('_') {
        name.remove(0);
    }
    for attr in &item.attrs {
        if !attr.path().is_ident("rowkit") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                name = arg.value().and_then(ParseBuffer::parse::<LitStr>)?.value();
            } else if arg.path.is_ident("schema") {
                schema = arg.value().and_then(ParseBuffer::parse::<LitStr>)?.value();
            } else {
                return Err(arg.error(format!(
                    "Unknown attribute `{}` inside rowkit macro, expected `name` or `schema`",
                    arg.path.to_token_stream()
                )));
            }
            Ok(())
        })?;
    }
    let mut seen = Vec::<&str>::new();
    for column in columns.iter().filter(|c| !c.ignore) {
        if seen.contains(&column.name.as_str()) {
            return Err(Error::new(
                column.ident.span(),
                format!("Column `{}` is mapped more than once", column.name),
            ));
        }
        seen.push(&column.name);
    }
    if columns.iter().filter(|c| c.primary_key).count() > 1 {
        return Err(Error::new(
            item.ident.span(),
            "Only one field can be declared `primary_key`",
        ));
    }
    for role in ["created_at", "updated_at", "deleted_at"] {
        if columns.iter().filter(|c| c.role == Some(role)).count() > 1 {
            return Err(Error::new(
                item.ident.span(),
                format!("Only one field can be declared `{}`", role),
            ));
        }
    }
    Ok(TableMetadata {
        columns,
        name,
        schema,
    })
}
