//! Utility functions for procedural macros

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;

/// Path of the runtime crate the generated code refers to
pub fn runtime_crate() -> TokenStream {
    quote! { ::record_table }
}

/// Column name of a field: the explicit `name` attribute, or the identifier
/// without any raw-identifier prefix
pub fn column_name(ident: &syn::Ident, explicit: Option<&String>) -> String {
    explicit
        .cloned()
        .unwrap_or_else(|| ident.unraw().to_string())
}
