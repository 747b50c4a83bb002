//! Define procedural macro to build service handlers from their config entries
extern crate proc_macro;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod config;

/// Implements `FromServiceConfig` by overriding `Default` values with matching config parameters.
///
/// Fields annotated with `#[service_config(skip)]` can not be set from the config file.
#[proc_macro_derive(FromServiceConfig, attributes(service_config))]
pub fn derive_from_service_config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    config::expand_derive_from_service_config(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
