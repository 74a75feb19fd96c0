//! Procedural macros for defining operations
//!
//! `#[operation]` implements `trellis_operations::Operation` for a struct,
//! turning its named fields into `ParamMeta` entries. `#[param]` is a marker
//! read by `#[operation]`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::Parser, parse_macro_input, punctuated::Punctuated, Attribute, Data, DeriveInput, Expr,
    ExprLit, Field, Fields, GenericArgument, Lit, Meta, MetaNameValue, PathArguments, Token, Type,
};

/// Derive `Operation` metadata for a command struct.
///
/// ```ignore
/// #[operation(verb = "add", noun = "card", description = "Append a card to a column")]
/// #[derive(Debug, Deserialize, Serialize)]
/// pub struct AddCard {
///     /// Column to append to
///     #[param(short = 'c')]
///     pub column: ColumnId,
///     /// Card title
///     pub title: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn operation(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(item as DeriveInput);
    let args = match OperationArgs::parse(attr) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };

    let fields: Vec<&Field> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return syn::Error::new_spanned(&input, "#[operation] needs named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(&input, "#[operation] only applies to structs")
                .to_compile_error()
                .into()
        }
    };

    let metas: Vec<_> = fields.iter().map(|f| param_meta(f)).collect();
    let count = metas.len();
    strip_param_attrs(&mut input);
    let name = &input.ident;
    let OperationArgs {
        verb,
        noun,
        description,
    } = args;

    let expanded = quote! {
        #input

        impl trellis_operations::Operation for #name {
            fn verb(&self) -> &'static str {
                #verb
            }

            fn noun(&self) -> &'static str {
                #noun
            }

            fn description(&self) -> &'static str {
                #description
            }

            fn parameters(&self) -> &'static [trellis_operations::ParamMeta] {
                static PARAMS: [trellis_operations::ParamMeta; #count] = [#(#metas),*];
                &PARAMS
            }
        }
    };

    expanded.into()
}

/// Field marker, e.g. `#[param(short = 'b')]`. `#[operation]` reads and
/// removes it, since attribute macros cannot sit on fields.
#[proc_macro_attribute]
pub fn param(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

struct OperationArgs {
    verb: String,
    noun: String,
    description: String,
}

impl OperationArgs {
    fn parse(attr: TokenStream) -> syn::Result<Self> {
        let pairs = Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse(attr)?;

        let mut verb = None;
        let mut noun = None;
        let mut description = None;

        for pair in pairs {
            let value = string_literal(&pair.value)?;
            let key = pair
                .path
                .get_ident()
                .map(|i| i.to_string())
                .unwrap_or_default();
            match key.as_str() {
                "verb" => verb = Some(value),
                "noun" => noun = Some(value),
                "description" => description = Some(value),
                _ => {
                    return Err(syn::Error::new_spanned(
                        &pair.path,
                        format!("unknown operation attribute `{}`", key),
                    ))
                }
            }
        }

        let missing = |what: &str| {
            syn::Error::new(
                proc_macro2::Span::call_site(),
                format!("#[operation] is missing `{}`", what),
            )
        };

        Ok(Self {
            verb: verb.ok_or_else(|| missing("verb"))?,
            noun: noun.ok_or_else(|| missing("noun"))?,
            description: description.ok_or_else(|| missing("description"))?,
        })
    }
}

fn string_literal(expr: &Expr) -> syn::Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

fn param_meta(field: &Field) -> proc_macro2::TokenStream {
    let name = field
        .ident
        .as_ref()
        .map(|i| i.to_string())
        .unwrap_or_default();
    let description = doc_comment(&field.attrs);
    let param_type = param_type(&field.ty);
    let required = if option_inner(&field.ty).is_none() {
        quote! { .required() }
    } else {
        quote! {}
    };
    let short = match short_flag(&field.attrs) {
        Some(c) => quote! { Some(#c) },
        None => quote! { None },
    };

    quote! {
        trellis_operations::ParamMeta::new(#name)
            .description(#description)
            .param_type(#param_type)
            .short(#short)
            #required
    }
}

fn doc_comment(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => string_literal(&nv.value).ok(),
            _ => None,
        })
        .map(|line| line.trim().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else { return None };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => match args.args.first() {
            Some(GenericArgument::Type(inner)) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

fn param_type(ty: &Type) -> proc_macro2::TokenStream {
    if let Some(inner) = option_inner(ty) {
        return param_type(inner);
    }

    let ident = match ty {
        Type::Path(path) => path.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    };

    match ident.as_deref() {
        Some("Vec") => quote! { trellis_operations::ParamType::Array },
        Some("bool") => quote! { trellis_operations::ParamType::Boolean },
        Some("i32" | "i64" | "u32" | "u64" | "usize" | "isize") => {
            quote! { trellis_operations::ParamType::Integer }
        }
        Some("f32" | "f64") => quote! { trellis_operations::ParamType::Number },
        // ids and other newtypes travel as strings
        _ => quote! { trellis_operations::ParamType::String },
    }
}

fn short_flag(attrs: &[Attribute]) -> Option<char> {
    let mut short = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("param")) {
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("short") {
                if let Lit::Char(c) = meta.value()?.parse::<Lit>()? {
                    short = Some(c.value());
                }
            }
            Ok(())
        });
    }
    short
}

fn strip_param_attrs(input: &mut DeriveInput) {
    if let Data::Struct(data) = &mut input.data {
        for field in data.fields.iter_mut() {
            field.attrs.retain(|attr| !attr.path().is_ident("param"));
        }
    }
}
