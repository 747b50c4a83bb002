use proc_macro2::TokenStream;
use quote::{format_ident, quote, quote_spanned, ToTokens};
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Field, Fields, Ident, Type};

/// How a config value gets stored into the field once it has been read
enum Assignment<'a> {
    Direct,
    Cast(&'a Type),
    Checked(&'a Type),
    Wrapped,
}

pub fn expand_derive_from_service_config(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let setters = config_setters(input)?;
    let expanded = quote! {
        impl crate::config::FromServiceConfig for #name {
            fn from_config(
                config: &crate::config::ServiceConfig,
            ) -> ::std::result::Result<Self, crate::Error> {
                let mut base = Self::default();
                for key in config.parameters() {
                    match key.as_str() {
                        #(#setters)*
                        _ => ::log::warn!(
                            "unknown configuration parameter for {}: {}={:?}",
                            stringify!(#name),
                            key,
                            config.get_parameter(key)
                        ),
                    }
                }
                Ok(base)
            }
        }
    };

    Ok(expanded)
}

/// Generate a match arm for each field that isn't annotated with #[service_config(skip)]
fn config_setters(input: &DeriveInput) -> syn::Result<Vec<TokenStream>> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new(
                    input.span(),
                    "FromServiceConfig requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.span(),
                "FromServiceConfig can only be derived for structs",
            ))
        }
    };

    let mut setters = Vec::with_capacity(fields.len());
    for field in fields {
        if !skip_field(field)? {
            setters.push(generate_setter(field)?);
        }
    }
    Ok(setters)
}

fn skip_field(field: &Field) -> syn::Result<bool> {
    let mut skip = false;
    for attr in field
        .attrs
        .iter()
        .filter(|a| a.path().is_ident("service_config"))
    {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported service_config option, expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}

fn generate_setter(field: &Field) -> syn::Result<TokenStream> {
    let name = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;
    let key = name.to_string();
    let (getter, assignment) = parameter_getter(&field.ty)?;

    let assignment = match assignment {
        Assignment::Direct => quote_spanned! { field.span() => base.#name = val? },
        Assignment::Cast(ty) => quote_spanned! { field.span() => base.#name = val? as #ty },
        Assignment::Checked(ty) => quote_spanned! { field.span() =>
            base.#name = <#ty as ::std::convert::TryFrom<i64>>::try_from(val?).map_err(|_| {
                crate::Error::InvalidConfigurationValue(format!(
                    "value for {}.{} is out of range for {}",
                    config.handler(),
                    #key,
                    stringify!(#ty)
                ))
            })?
        },
        Assignment::Wrapped => quote_spanned! { field.span() => base.#name = Some(val?) },
    };

    Ok(quote_spanned! { field.span() =>
        #key => {
            if let Some(val) = config.#getter(#key) {
                #assignment
            }
        }
    })
}

fn parameter_getter(ty: &Type) -> syn::Result<(Ident, Assignment<'_>)> {
    let type_str = ty.to_token_stream().to_string().replace(' ', "");
    let getter = |name: &str| format_ident!("get_parameter_as_{}", name);
    match type_str.as_ref() {
        "String" => Ok((getter("string"), Assignment::Direct)),
        "Option<String>" => Ok((getter("string"), Assignment::Wrapped)),
        "bool" => Ok((getter("bool"), Assignment::Direct)),
        "f32" | "f64" => Ok((getter("f64"), Assignment::Cast(ty))),
        "u8" | "u16" | "u32" | "u64" | "usize" | "i8" | "i16" | "i32" | "i64" | "isize" => {
            Ok((getter("i64"), Assignment::Checked(ty)))
        }
        _ => Err(syn::Error::new(
            ty.span(),
            format!("FromServiceConfig doesn't support fields of type {}", type_str),
        )),
    }
}
