mod decode_column;
mod decode_table;
mod encode_entity;

use decode_table::decode_table;
use encode_entity::encode_entity;
use proc_macro::TokenStream;
use syn::{ItemStruct, parse_macro_input};

/// Map a struct with named fields onto a table.
///
/// Struct attributes: `#[rowkit(name = "table", schema = "schema")]`. The
/// table name defaults to the struct name in snake case.
///
/// Field attributes, inside `#[rowkit(...)]`:
/// - `name = "column"`
/// - `primary_key`, `auto_increment`
/// - `size = 500` maximum length of a text column
/// - `default = "0"` SQL literal used as column default
/// - `created_at`, `updated_at`, `deleted_at` audit columns (`deleted_at`
///   must be an `Option` and turns deletes into soft deletes)
/// - `ignore` not mapped, `Default::default()` when decoding
///
/// Every mapped field type must implement `rowkit::AsValue`.
#[proc_macro_derive(Entity, attributes(rowkit))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemStruct);
    match decode_table(&item) {
        Ok(table) => encode_entity(&item, &table).into(),
        Err(e) => e.to_compile_error().into(),
    }
}
