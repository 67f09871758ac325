//! Converter generation from a field's type.
//!
//! `Option`, `Box`, `Vec` and two-parameter `HashMap`/`BTreeMap` are unpacked
//! syntactically so that their element types go through capability dispatch
//! too. Every other type is dispatched as a whole.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, Path, PathArguments, Type};

/// Type arguments of `ty` if its last path segment is named `name`.
fn type_args<'a>(ty: &'a Type, name: &str) -> Option<Vec<&'a Type>> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }

    let seg = type_path.path.segments.last()?;
    if seg.ident != name {
        return None;
    }

    let PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };

    Some(
        args.args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(inner) => Some(inner),
                _ => None,
            })
            .collect(),
    )
}

/// The single type argument of `ty` if it is `name<T>`.
fn single_arg<'a>(ty: &'a Type, name: &str) -> Option<&'a Type> {
    match type_args(ty, name)?.as_slice() {
        [inner] => Some(*inner),
        _ => None,
    }
}

/// Extract inner type from `Option<T>`
pub fn option_inner(ty: &Type) -> Option<&Type> {
    single_arg(ty, "Option")
}

fn is_u8(ty: &Type) -> bool {
    matches!(ty, Type::Path(type_path) if type_path.qself.is_none() && type_path.path.is_ident("u8"))
}

/// Closure converting a raw `&str` into `ty` through capability dispatch.
fn dispatch(ty: &Type) -> TokenStream {
    quote! {
        |__raw: &str| -> ::core::result::Result<#ty, ::envbind::BoxError> {
            #[allow(unused_imports)]
            use ::envbind::de::{
                ViaBinaryUnmarshaler as _, ViaDecoder as _, ViaFromEnvStr as _, ViaSetter as _,
                ViaTextUnmarshaler as _,
            };
            (&&&&::envbind::de::Probe::<#ty>::new()).convert_env(__raw)
        }
    }
}

/// Closure converting a raw `&str` into `ty`.
pub fn converter(ty: &Type) -> TokenStream {
    if let Some(inner) = single_arg(ty, "Option") {
        let inner = converter(inner);
        return quote! {
            |__raw: &str| -> ::core::result::Result<#ty, ::envbind::BoxError> {
                (#inner)(__raw).map(::core::option::Option::Some)
            }
        };
    }

    if let Some(inner) = single_arg(ty, "Box") {
        let inner = converter(inner);
        return quote! {
            |__raw: &str| -> ::core::result::Result<#ty, ::envbind::BoxError> {
                (#inner)(__raw).map(::std::boxed::Box::new)
            }
        };
    }

    if let Some(inner) = single_arg(ty, "Vec") {
        // Vec<u8> takes the raw bytes through the built-in tier
        if is_u8(inner) {
            return dispatch(ty);
        }
        let inner = converter(inner);
        return quote! {
            |__raw: &str| -> ::core::result::Result<#ty, ::envbind::BoxError> {
                ::envbind::convert::sequence(__raw, #inner)
            }
        };
    }

    for map in ["HashMap", "BTreeMap"] {
        if let Some([key, value]) = type_args(ty, map).as_deref() {
            let key = converter(key);
            let value = converter(value);
            return quote! {
                |__raw: &str| -> ::core::result::Result<#ty, ::envbind::BoxError> {
                    ::envbind::convert::mapping(__raw, #key, #value)
                }
            };
        }
    }

    dispatch(ty)
}

/// Closure for a field, honoring a custom deserializer.
///
/// For `Option<T>` fields the deserializer produces `T`.
pub fn field_converter(ty: &Type, deserializer: Option<&Path>) -> TokenStream {
    let Some(func) = deserializer else {
        return converter(ty);
    };

    let wrap = option_inner(ty).map(|_| quote!(.map(::core::option::Option::Some)));

    quote! {
        |__raw: &str| -> ::core::result::Result<#ty, ::envbind::BoxError> {
            #func(__raw)
                #wrap
                .map_err(::core::convert::Into::<::envbind::BoxError>::into)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn render(ty: Type) -> String {
        converter(&ty).to_string()
    }

    #[test]
    fn test_option_inner() {
        let ty: Type = parse_quote!(Option<u16>);
        let inner = option_inner(&ty).unwrap();
        assert_eq!(quote!(#inner).to_string(), "u16");

        let ty: Type = parse_quote!(Vec<u16>);
        assert!(option_inner(&ty).is_none());
    }

    #[test]
    fn test_plain_type_is_dispatched() {
        let code = render(parse_quote!(u16));
        assert!(code.contains("Probe :: < u16 >"));
        assert!(!code.contains("sequence"));
    }

    #[test]
    fn test_vec_is_unpacked() {
        let code = render(parse_quote!(Vec<MyType>));
        assert!(code.contains("sequence"));
        assert!(code.contains("Probe :: < MyType >"));
    }

    #[test]
    fn test_byte_vec_is_dispatched_whole() {
        let code = render(parse_quote!(Vec<u8>));
        assert!(!code.contains("sequence"));
        assert!(code.contains("Probe :: < Vec < u8 > >"));
    }

    #[test]
    fn test_map_is_unpacked() {
        let code = render(parse_quote!(std::collections::HashMap<String, Level>));
        assert!(code.contains("mapping"));
        assert!(code.contains("Probe :: < String >"));
        assert!(code.contains("Probe :: < Level >"));
    }

    #[test]
    fn test_map_with_hasher_is_dispatched_whole() {
        let code = render(parse_quote!(HashMap<String, String, MyHasher>));
        assert!(!code.contains("mapping"));
    }

    #[test]
    fn test_option_of_vec() {
        let code = render(parse_quote!(Option<Vec<u32>>));
        assert!(code.contains("Some"));
        assert!(code.contains("sequence"));
        assert!(code.contains("Probe :: < u32 >"));
    }

    #[test]
    fn test_deserializer_wraps_option() {
        let ty: Type = parse_quote!(Option<Vec<String>>);
        let func: Path = parse_quote!(serde_json::from_str);
        let code = field_converter(&ty, Some(&func)).to_string();
        assert!(code.contains("serde_json :: from_str (__raw)"));
        assert!(code.contains("Some"));
        assert!(!code.contains("Probe"));
    }
}
