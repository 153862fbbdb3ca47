//! Schema builder: one column per field descriptor.

use crate::schema::FieldDescriptor;
use crate::table::{Column, Table};

/// Build an empty table with one column per field, in the same order
///
/// Column names and types are copied verbatim from the descriptors. Duplicate
/// names are not rejected and produce duplicate column names.
#[must_use]
pub fn build_schema(fields: &[FieldDescriptor]) -> Table {
    let columns = fields
        .iter()
        .map(|field| Column::new(field.name(), field.value_type(), field.is_nullable()))
        .collect();
    Table::with_columns(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Record, ValueType};

    #[derive(crate::Record)]
    struct Sample {
        id: i32,
        name: Option<String>,
        amount: rust_decimal::Decimal,
    }

    #[test]
    fn test_build_schema_copies_fields() {
        let table = build_schema(&Sample::field_descriptors());

        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 0);

        let columns = table.columns();
        assert_eq!(columns[0].name(), "id");
        assert_eq!(columns[0].value_type(), ValueType::Integer);
        assert!(!columns[0].is_nullable());
        assert_eq!(columns[1].name(), "name");
        assert_eq!(columns[1].value_type(), ValueType::String);
        assert!(columns[1].is_nullable());
        assert_eq!(columns[2].value_type(), ValueType::Decimal);
    }

    #[test]
    fn test_build_schema_keeps_duplicates() {
        let id = Sample::require_field("id").unwrap();
        let table = build_schema(&[id.clone(), id]);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.columns()[0].name(), table.columns()[1].name());
    }

    #[test]
    fn test_build_schema_empty() {
        let table = build_schema(&[]);
        assert_eq!(table.column_count(), 0);
    }
}
