//! Derive macro implementation for envbind

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod attrs;
mod types;

use attrs::{FieldAttrs, StructAttrs};

/// `Bind` derive macro
///
/// Implements `envbind::Bind` and an inherent `from_env()` method on structs
/// with named fields.
///
/// # Supported Attributes
///
/// **Struct-level**:
/// - `#[envbind(prefix = "APP")]`: Root prefix used by `from_env()`
///
/// **Field-level**:
/// - `#[envbind(name = "CUSTOM_NAME")]`: Key segment used verbatim
/// - `#[envbind(required)]`: Fail if no value is found
/// - `#[envbind(default = "literal")]`: Value used if the variable is not set
/// - `#[envbind(ignored)]`: Never looked up, always `Default::default()`
/// - `#[envbind(nested)]`: Field is a `Bind` struct with keys under this segment
/// - `#[envbind(deserializer = "func")]`: Use custom deserializer function
///
/// # Example
///
/// See the `envbind` crate documentation for usage examples.
#[proc_macro_derive(Bind, attributes(envbind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    // Struct name
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Bind does not support generic structs",
        ));
    }

    let struct_attrs = StructAttrs::from_input(input)?;

    // Extract fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Bind only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Bind only supports structs",
            ));
        }
    };

    let mut bind_stmts = Vec::new();
    let mut key_stmts = Vec::new();
    let mut idents = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let field_type = &field.ty;
        let field_name = ident.unraw().to_string();

        // Parse attributes
        let attrs = FieldAttrs::from_field(field)?;

        let tag = match &attrs.name {
            Some(name) => quote!(::core::option::Option::Some(#name)),
            None => quote!(::core::option::Option::None),
        };

        if attrs.ignored {
            bind_stmts.push(quote! {
                let #ident: #field_type = ::core::default::Default::default();
            });
        } else if attrs.nested {
            bind_stmts.push(quote! {
                let #ident: #field_type = <#field_type as ::envbind::Bind>::bind(
                    &__prefix.descend(#tag, #field_name)?,
                    __env,
                )?;
            });
            key_stmts.push(quote! {
                <#field_type as ::envbind::Bind>::declared_keys(
                    &__prefix.descend(#tag, #field_name)?,
                    __keys,
                )?;
            });
        } else {
            let default = match &attrs.default {
                Some(value) => quote!(::core::option::Option::Some(#value)),
                None => quote!(::core::option::Option::None),
            };

            let missing = if attrs.required {
                quote!(return ::core::result::Result::Err(::envbind::Error::required(__key)))
            } else {
                quote!(::core::default::Default::default())
            };

            let converter = types::field_converter(field_type, attrs.deserializer.as_ref());

            bind_stmts.push(quote! {
                let #ident: #field_type = {
                    let __key = __prefix.resolve(#tag, #field_name)?;
                    match ::envbind::de::lookup(__env, &__key, #default) {
                        ::core::option::Option::Some(__raw) => {
                            ::envbind::de::convert(&__key, #field_name, &__raw, #converter)?
                        }
                        ::core::option::Option::None => #missing,
                    }
                };
            });
            key_stmts.push(quote! {
                ::envbind::de::declare(__keys, __prefix.resolve(#tag, #field_name)?);
            });
        }

        idents.push(ident);
    }

    let prefix = struct_attrs.prefix;

    Ok(quote! {
        impl ::envbind::Bind for #struct_name {
            #[allow(unused_variables)]
            fn bind<__E: ::envbind::Environment + ?::core::marker::Sized>(
                __prefix: &::envbind::Prefix,
                __env: &__E,
            ) -> ::core::result::Result<Self, ::envbind::Error> {
                #(#bind_stmts)*
                ::core::result::Result::Ok(Self {
                    #(#idents),*
                })
            }

            #[allow(unused_variables)]
            fn declared_keys(
                __prefix: &::envbind::Prefix,
                __keys: &mut ::std::collections::BTreeSet<::std::string::String>,
            ) -> ::core::result::Result<(), ::envbind::Error> {
                #(#key_stmts)*
                ::core::result::Result::Ok(())
            }
        }

        impl #struct_name {
            /// Load configuration from environment variables
            ///
            /// # Errors
            ///
            /// - The prefix or a key segment is malformed
            /// - Required environment variables are not set
            /// - Environment variable values cannot be converted into field types
            pub fn from_env() -> ::core::result::Result<Self, ::envbind::Error> {
                ::envbind::process(#prefix)
            }
        }
    })
}
