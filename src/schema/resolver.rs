//! Field resolution for flattened conversions
//!
//! Flattening replaces a record-typed field of the top-level type with the
//! fields of its nested record type, inserted contiguously where the original
//! field stood. Only one level is expanded: a nested field that is itself
//! record-typed stays a single column.

use itertools::Itertools;
use log::debug;
use rustc_hash::FxHashSet;

use crate::error::{Result, TableError};
use crate::schema::FieldDescriptor;

/// Compute the field list of a flattened conversion
///
/// Walks `natural_fields` in order and replaces every field present in
/// `flatten_fields` by the field list of its value type. Requested fields
/// that are not among `natural_fields` are ignored, as are repeated requests
/// for the same field.
///
/// # Errors
/// Returns `TableError::InvalidArgument` if a requested field of the record
/// type does not hold a nested record.
pub fn resolve_flattened(
    natural_fields: &[FieldDescriptor],
    flatten_fields: &[FieldDescriptor],
) -> Result<Vec<FieldDescriptor>> {
    let requested: FxHashSet<&FieldDescriptor> = flatten_fields.iter().collect();

    for ignored in flatten_fields
        .iter()
        .filter(|field| !natural_fields.contains(field))
    {
        debug!(
            "Ignoring flatten request for `{}`: not a field of the record type",
            ignored.qualified_name()
        );
    }

    let mut resolved = Vec::with_capacity(natural_fields.len());
    for field in natural_fields {
        if !requested.contains(field) {
            resolved.push(field.clone());
            continue;
        }

        let Some(nested_type) = field.value_type().record_type() else {
            return Err(TableError::invalid_argument(format!(
                "cannot flatten `{}`: value type {} is not a record type",
                field.qualified_name(),
                field.value_type()
            )));
        };

        let expansion = nested_type.fields();
        debug!(
            "Flattening `{}` into {} columns: [{}]",
            field.qualified_name(),
            expansion.len(),
            expansion.iter().map(FieldDescriptor::name).join(", ")
        );
        resolved.extend(expansion);
    }

    Ok(resolved)
}
