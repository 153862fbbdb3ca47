//! Procedural macros for the record-table crate
//!
//! This crate provides the `Record` derive, which generates the field
//! descriptor table and field readers that the conversion routines of
//! `record-table` work from.

use proc_macro::TokenStream;

// Import modules
mod record_impl;
mod utils;

/// Record derive macro
///
/// This macro generates a `Record` implementation for a struct with named
/// fields, listing one field descriptor per field in declaration order, and a
/// `CellType` implementation so the struct can itself be nested inside other
/// records.
///
/// Generic structs are supported as long as every type parameter is bounded
/// by `CellType + 'static`, for example `struct Pair<T: CellType + 'static>`.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Record)]
/// #[record(name = "Customer")]
/// struct CustomerRow {
///     #[field(name = "Id")]
///     id: i32,
///
///     #[field(name = "Address")]
///     address: Option<Address>,
///
///     #[field(skip)]
///     cache_key: u64,
/// }
/// ```
#[proc_macro_derive(Record, attributes(record, field))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record_impl::process_derive_record(input)
}
