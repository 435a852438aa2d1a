use crate::{decode_column::ColumnMetadata, decode_table::TableMetadata};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemStruct;

fn quote_option<T: quote::ToTokens>(value: &Option<T>) -> TokenStream {
    match value {
        None => quote! { None },
        Some(v) => quote! { Some(#v) },
    }
}

fn encode_column_def(column: &ColumnMetadata) -> TokenStream {
    let name = &column.name;
    let ty = &column.ty;
    let default = quote_option(&column.default);
    let primary_key = column.primary_key;
    let auto_increment = column.auto_increment;
    let size = quote_option(&column.size);
    let role = format_ident!(
        "{}",
        match column.role {
            Some("created_at") => "CreatedAt",
            Some("updated_at") => "UpdatedAt",
            Some("deleted_at") => "DeletedAt",
            _ => "Data",
        }
    );
    quote! {
        ::rowkit::ColumnDef {
            name: #name,
            value: <#ty as ::rowkit::AsValue>::as_empty_value(),
            nullable: <#ty as ::rowkit::AsValue>::NULLABLE,
            default: #default,
            primary_key: #primary_key,
            auto_increment: #auto_increment,
            size: #size,
            role: ::rowkit::ColumnRole::#role,
        }
    }
}

pub(crate) fn encode_entity(item: &ItemStruct, table: &TableMetadata) -> TokenStream {
    let ident = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let table_name = &table.name;
    let schema_name = &table.schema;
    let column_defs = table.mapped().map(encode_column_def);
    let from_row_fields = table.columns.iter().map(|c| {
        let field = &c.ident;
        let ty = &c.ty;
        let name = &c.name;
        if c.ignore {
            quote! { #field: ::std::default::Default::default() }
        } else {
            quote! { #field: row.take::<#ty>(#name)? }
        }
    });
    let row_full = table.mapped().enumerate().map(|(i, c)| {
        let field = &c.ident;
        quote! {
            (&columns[#i], ::rowkit::AsValue::as_value(::std::clone::Clone::clone(&self.#field)))
        }
    });
    let primary_key = match table.mapped().find(|c| c.primary_key) {
        Some(c) => {
            let field = &c.ident;
            quote! { ::rowkit::AsValue::as_value(::std::clone::Clone::clone(&self.#field)) }
        }
        None => quote! { ::rowkit::Value::Null },
    };
    let set_column = table.mapped().map(|c| {
        let field = &c.ident;
        let ty = &c.ty;
        let name = &c.name;
        quote! {
            #name => self.#field = <#ty as ::rowkit::AsValue>::try_from_value(value)?,
        }
    });
    quote! {
        impl #impl_generics ::rowkit::Entity for #ident #ty_generics #where_clause {
            fn table() -> &'static ::rowkit::TableRef {
                static TABLE_REF: ::rowkit::TableRef = ::rowkit::TableRef {
                    name: #table_name,
                    schema: #schema_name,
                };
                &TABLE_REF
            }

            fn columns() -> &'static [::rowkit::ColumnDef] {
                static RESULT: ::std::sync::LazyLock<::std::boxed::Box<[::rowkit::ColumnDef]>> =
                    ::std::sync::LazyLock::new(|| {
                        ::std::vec![#(#column_defs),*].into_boxed_slice()
                    });
                &RESULT
            }

            fn from_row(mut row: ::rowkit::RowLabeled) -> ::rowkit::Result<Self> {
                Ok(Self {
                    #(#from_row_fields),*
                })
            }

            fn row_full(&self) -> ::std::vec::Vec<(&'static ::rowkit::ColumnDef, ::rowkit::Value)> {
                let columns = <Self as ::rowkit::Entity>::columns();
                ::std::vec![#(#row_full),*]
            }

            fn primary_key(&self) -> ::rowkit::Value {
                #primary_key
            }

            fn set_column(&mut self, name: &str, value: ::rowkit::Value) -> ::rowkit::Result<()> {
                match name {
                    #(#set_column)*
                    _ => {
                        return Err(::rowkit::Error::msg(format!(
                            "Column `{}` does not exist in table `{}`",
                            name, #table_name
                        )));
                    }
                }
                Ok(())
            }
        }
    }
}
