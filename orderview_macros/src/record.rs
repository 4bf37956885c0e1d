use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Ident, LitStr};

/// Field roles collected from `#[record(...)]` attributes.
#[derive(Default)]
struct Roles {
    id: Option<Ident>,
    search: Vec<Ident>,
    category: Option<Ident>,
    timestamp: Option<Ident>,
}

pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let collection = extract_collection(input)?;
    let fields = named_fields(input)?;
    let roles = collect_roles(fields)?;

    let id_field = match roles.id {
        Some(id) => id,
        None => fields
            .iter()
            .filter_map(|f| f.ident.clone())
            .find(|ident| ident == "id")
            .ok_or_else(|| {
                syn::Error::new_spanned(
                    name,
                    "Record derive: no field marked with #[record(id)] and no field named `id`",
                )
            })?,
    };

    let search = &roles.search;
    let category = optional_text(roles.category.as_ref());
    let timestamp = optional_text(roles.timestamp.as_ref());

    Ok(quote! {
        impl ::orderview::Record for #name {
            const COLLECTION: &'static str = #collection;

            fn id(&self) -> &str {
                &self.#id_field
            }

            fn search_fields(&self) -> ::std::vec::Vec<&str> {
                let fields: ::std::vec::Vec<::std::option::Option<&str>> = ::std::vec![
                    #( ::orderview::record::SearchText::search_text(&self.#search), )*
                ];
                fields.into_iter().flatten().collect()
            }

            fn category(&self) -> ::std::option::Option<&str> {
                #category
            }

            fn timestamp(&self) -> ::std::option::Option<&str> {
                #timestamp
            }
        }
    })
}

fn optional_text(field: Option<&Ident>) -> TokenStream2 {
    match field {
        Some(ident) => quote! { ::orderview::record::SearchText::search_text(&self.#ident) },
        None => quote! { ::std::option::Option::None },
    }
}

fn named_fields(input: &DeriveInput) -> syn::Result<&syn::punctuated::Punctuated<Field, syn::Token![,]>> {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            return Ok(&fields.named);
        }
    }
    Err(syn::Error::new_spanned(
        &input.ident,
        "Record derive: only structs with named fields are supported",
    ))
}

fn extract_collection(input: &DeriveInput) -> syn::Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        let mut collection = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                collection = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported record attribute, expected `collection = \"...\"`"))
            }
        })?;

        if let Some(c) = collection {
            return Ok(c);
        }
    }

    // Default: snake_case struct name + "s"
    let name = input.ident.to_string();
    Ok(format!("{}s", to_snake_case(&name)))
}

fn collect_roles(
    fields: &syn::punctuated::Punctuated<Field, syn::Token![,]>,
) -> syn::Result<Roles> {
    let mut roles = Roles::default();

    for field in fields {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        for attr in &field.attrs {
            if !attr.path().is_ident("record") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    set_once(&mut roles.id, &ident, "id")
                } else if meta.path.is_ident("search") {
                    roles.search.push(ident.clone());
                    Ok(())
                } else if meta.path.is_ident("category") {
                    set_once(&mut roles.category, &ident, "category")
                } else if meta.path.is_ident("timestamp") {
                    set_once(&mut roles.timestamp, &ident, "timestamp")
                } else {
                    Err(meta.error(
                        "unsupported record field attribute, expected one of `id`, `search`, `category`, `timestamp`",
                    ))
                }
            })?;
        }
    }

    Ok(roles)
}

fn set_once(slot: &mut Option<Ident>, ident: &Ident, role: &str) -> syn::Result<()> {
    if let Some(existing) = slot {
        return Err(syn::Error::new_spanned(
            ident,
            format!("Record derive: `{}` already marked as #[record({})]", existing, role),
        ));
    }
    *slot = Some(ident.clone());
    Ok(())
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
