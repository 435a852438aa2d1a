use quote::ToTokens;
use syn::{Error, Field, Ident, Lit, LitInt, Result, Type, parse::ParseBuffer};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) name: String,
    pub(crate) default: Option<String>,
    pub(crate) primary_key: bool,
    pub(crate) auto_increment: bool,
    pub(crate) size: Option<u32>,
    /// One of `created_at`, `updated_at`, `deleted_at`.
    pub(crate) role: Option<&'static str>,
    pub(crate) ignore: bool,
}

fn is_option(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    path.path
        .segments
        .last()
        .is_some_and(|v| v.ident == "Option")
}

pub(crate) fn decode_column(field: &Field) -> Result<ColumnMetadata> {
    let Some(ident) = field.ident.clone() else {
        return Err(Error::new_spanned(field, "Field is expected to have a name"));
    };
    let mut name = ident.to_string();
    if let Some(stripped) = name.strip_prefix("r#") {
        name = stripped.to_string();
    }
    if name.starts_with('_') {
        name.remove(0);
    }
    let mut metadata = ColumnMetadata {
        ident,
        ty: field.ty.clone(),
        name,
        default: None,
        primary_key: false,
        auto_increment: false,
        size: None,
        role: None,
        ignore: false,
    };
    for attr in &field.attrs {
        if !attr.path().is_ident("rowkit") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            let path = &arg.path;
            if path.is_ident("name") {
                metadata.name = arg.value().and_then(ParseBuffer::parse::<syn::LitStr>)?.value();
            } else if path.is_ident("default") {
                metadata.default = Some(match arg.value().and_then(ParseBuffer::parse::<Lit>)? {
                    Lit::Str(v) => v.value(),
                    v => v.to_token_stream().to_string(),
                });
            } else if path.is_ident("size") {
                metadata.size = Some(
                    arg.value()
                        .and_then(ParseBuffer::parse::<LitInt>)?
                        .base10_parse()?,
                );
            } else if path.is_ident("primary_key") {
                metadata.primary_key = true;
            } else if path.is_ident("auto_increment") {
                metadata.auto_increment = true;
            } else if path.is_ident("ignore") {
                metadata.ignore = true;
            } else if path.is_ident("created_at") {
                metadata.role = Some("created_at");
            } else if path.is_ident("updated_at") {
                metadata.role = Some("updated_at");
            } else if path.is_ident("deleted_at") {
                if !is_option(&field.ty) {
                    return Err(arg.error("A `deleted_at` field must be an `Option`"));
                }
                metadata.role = Some("deleted_at");
            } else {
                return Err(arg.error(format!(
                    "Unknown attribute `{}` inside rowkit macro",
                    path.to_token_stream()
                )));
            }
            Ok(())
        })?;
    }
    if metadata.ignore && (metadata.primary_key || metadata.role.is_some()) {
        return Err(Error::new_spanned(
            field,
            "An ignored field cannot be a key or an audit column",
        ));
    }
    Ok(metadata)
}
