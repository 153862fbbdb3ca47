//! Record derive macro implementation
//!
//! This module contains the implementation of the `Record` derive macro,
//! which turns a struct definition into a static field descriptor table and
//! the matching field readers.

use std::collections::HashSet;

use darling::{ast, FromDeriveInput, FromField};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use crate::utils::{column_name, runtime_crate};

/// Receiver for the struct that derives Record
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(record), supports(struct_named))]
pub struct RecordReceiver {
    /// The struct identifier
    ident: syn::Ident,
    /// Generics of the struct
    generics: syn::Generics,
    /// The struct data with parsed fields
    data: ast::Data<(), RecordFieldReceiver>,
    /// Display name of the record type
    #[darling(default)]
    name: Option<String>,
}

/// Receiver for the fields in the struct
#[derive(Debug, FromField)]
#[darling(attributes(field))]
pub struct RecordFieldReceiver {
    /// The field identifier
    ident: Option<syn::Ident>,
    /// The field type
    ty: syn::Type,
    /// Column name attribute
    #[darling(default, rename = "name")]
    column_name: Option<String>,
    /// Exclude the field from the descriptor table
    #[darling(default)]
    skip: bool,
}

/// A field that takes part in the descriptor table
struct ExposedField<'a> {
    ident: &'a syn::Ident,
    ty: &'a syn::Type,
    column: String,
}

/// Process the Record derive macro
pub fn process_derive_record(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree
    let input = parse_macro_input!(input as DeriveInput);

    // Parse with darling
    let receiver = match RecordReceiver::from_derive_input(&input) {
        Ok(receiver) => receiver,
        Err(err) => return err.write_errors().into(),
    };

    let ast::Data::Struct(fields) = &receiver.data else {
        unreachable!("Darling ensures this is a struct")
    };

    let exposed = match collect_exposed_fields(fields) {
        Ok(exposed) => exposed,
        Err(err) => return err.write_errors().into(),
    };

    TokenStream::from(generate_record_impl(&receiver, &exposed))
}

/// Collect the non-skipped fields, rejecting duplicate column names
fn collect_exposed_fields(
    fields: &ast::Fields<RecordFieldReceiver>,
) -> darling::Result<Vec<ExposedField<'_>>> {
    let mut errors = darling::Error::accumulator();
    let mut seen = HashSet::new();
    let mut exposed = Vec::new();

    for field in fields.iter().filter(|field| !field.skip) {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let column = column_name(ident, field.column_name.as_ref());
        if !seen.insert(column.clone()) {
            let message = format!("duplicate column name `{column}`");
            errors.push(darling::Error::custom(message).with_span(ident));
            continue;
        }
        exposed.push(ExposedField {
            ident,
            ty: &field.ty,
            column,
        });
    }

    errors.finish_with(exposed)
}

/// Generate the `Record` and `CellType` implementations
fn generate_record_impl(
    receiver: &RecordReceiver,
    fields: &[ExposedField<'_>],
) -> proc_macro2::TokenStream {
    let krate = runtime_crate();
    let struct_name = &receiver.ident;
    let type_name = receiver
        .name
        .clone()
        .unwrap_or_else(|| struct_name.to_string());
    let (impl_generics, ty_generics, where_clause) = receiver.generics.split_for_impl();

    let descriptors = fields.iter().map(|field| {
        let column = &field.column;
        let ty = field.ty;
        quote! {
            #krate::FieldDescriptor::new(
                #column,
                <#ty as #krate::CellType>::value_type(),
                declaring_type,
                <#ty as #krate::CellType>::NULLABLE,
            )
        }
    });

    let readers = fields.iter().map(|field| {
        let column = &field.column;
        let ident = field.ident;
        quote! {
            #column => ::std::result::Result::Ok(#krate::CellType::to_cell(&self.#ident)),
        }
    });

    let entries = fields.iter().map(|field| {
        let column = &field.column;
        let ident = field.ident;
        quote! {
            (::std::string::String::from(#column), #krate::CellType::to_cell(&self.#ident))
        }
    });

    quote! {
        impl #impl_generics #krate::Record for #struct_name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;

            fn field_descriptors() -> ::std::vec::Vec<#krate::FieldDescriptor> {
                #[allow(unused_variables)]
                let declaring_type = <Self as #krate::Record>::record_type();
                ::std::vec![#(#descriptors),*]
            }

            fn read_field(
                &self,
                field: &#krate::FieldDescriptor,
            ) -> #krate::Result<#krate::CellValue> {
                if field.declaring_type() != <Self as #krate::Record>::record_type() {
                    return ::std::result::Result::Err(#krate::TableError::field_access(
                        field,
                        ::std::format!("field is not declared by `{}`", #type_name),
                    ));
                }
                match field.name() {
                    #(#readers)*
                    _ => ::std::result::Result::Err(#krate::TableError::field_access(
                        field,
                        "no such field",
                    )),
                }
            }
        }

        impl #impl_generics #krate::CellType for #struct_name #ty_generics #where_clause {
            fn value_type() -> #krate::ValueType {
                #krate::ValueType::Record(<Self as #krate::Record>::record_type())
            }

            fn to_cell(&self) -> #krate::CellValue {
                #krate::CellValue::Record(#krate::RecordCell::new(
                    <Self as #krate::Record>::record_type(),
                    ::std::vec![#(#entries),*],
                ))
            }
        }
    }
}
