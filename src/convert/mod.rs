//! Record-to-table conversion.
//!
//! Three entry operations share the schema builder and the row populator:
//!
//! * [`to_table`] uses the record type's own fields, one column each.
//! * [`to_table_flattened`] replaces selected record-typed fields by the
//!   fields of their nested record type.
//! * [`to_table_explicit`] uses a caller-supplied field list that may mix
//!   fields of the record type with fields of records nested one level down.
//!
//! All three iterate the input once and never return a partial table.

mod plan;

use log::debug;

use crate::config::ConversionConfig;
use crate::error::{Result, TableError};
use crate::schema::{FieldDescriptor, Record, build_schema, resolve_flattened};
use crate::table::Table;

use plan::{RowPlan, populate_rows};

/// Converts record sequences into tables according to a `ConversionConfig`
#[derive(Debug, Clone, Default)]
pub struct TableConverter {
    config: ConversionConfig,
}

impl TableConverter {
    /// Create a converter with the given configuration
    #[must_use]
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// The converter's configuration
    #[must_use]
    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert records using every field of the record type
    ///
    /// # Errors
    /// Returns `TableError::FieldAccess` if a field cannot be read and
    /// `TableError::Cancelled` if the conversion was cancelled.
    pub fn convert<'a, T: Record>(
        &self,
        records: impl IntoIterator<Item = &'a T>,
    ) -> Result<Table> {
        let fields = T::field_descriptors();
        self.run(&fields, records)
    }

    /// Convert records, expanding each of `flatten_fields` into the fields of
    /// its nested record type
    ///
    /// Flatten requests naming a field that `T` does not declare are ignored.
    /// A flattened record that is absent yields absent cells for all of its
    /// columns.
    ///
    /// # Errors
    /// Returns `TableError::InvalidArgument` if a requested field of `T` does
    /// not hold a nested record, `TableError::SchemaMismatch` if a flattened
    /// record type is held by more than one field of `T`, plus the errors of
    /// [`TableConverter::convert`].
    pub fn convert_flattened<'a, T: Record>(
        &self,
        records: impl IntoIterator<Item = &'a T>,
        flatten_fields: &[FieldDescriptor],
    ) -> Result<Table> {
        let fields = resolve_flattened(&T::field_descriptors(), flatten_fields)?;
        self.run(&fields, records)
    }

    /// Convert records into exactly the columns named by `fields`, in order
    ///
    /// Each field must be either a field of `T` or a field of the record
    /// type held by exactly one field of `T`.
    ///
    /// # Errors
    /// Returns `TableError::InvalidArgument` if `fields` is empty,
    /// `TableError::SchemaMismatch` if a field cannot be resolved (unless the
    /// configuration fills such columns with absent values), plus the errors
    /// of [`TableConverter::convert`].
    pub fn convert_explicit<'a, T: Record>(
        &self,
        records: impl IntoIterator<Item = &'a T>,
        fields: &[FieldDescriptor],
    ) -> Result<Table> {
        if fields.is_empty() {
            return Err(TableError::invalid_argument(format!(
                "explicit conversion of `{}` needs at least one field",
                T::TYPE_NAME
            )));
        }
        self.run(fields, records)
    }

    fn run<'a, T: Record>(
        &self,
        fields: &[FieldDescriptor],
        records: impl IntoIterator<Item = &'a T>,
    ) -> Result<Table> {
        let plan = RowPlan::resolve::<T>(fields, self.config.unresolved_fields)?;

        let mut table = build_schema(fields);
        plan.apply_nullability(&mut table);
        if let Some(hint) = self.config.capacity_hint {
            table.reserve_rows(hint);
        }

        populate_rows(&mut table, &plan, records, &self.config)?;

        debug!(
            "Converted {} `{}` records into {} columns",
            table.row_count(),
            T::TYPE_NAME,
            table.column_count()
        );
        Ok(table)
    }
}

/// Convert records using every field of the record type
///
/// # Errors
/// See [`TableConverter::convert`].
pub fn to_table<'a, T: Record>(records: impl IntoIterator<Item = &'a T>) -> Result<Table> {
    TableConverter::default().convert(records)
}

/// Convert records, flattening the given record-typed fields
///
/// # Errors
/// See [`TableConverter::convert_flattened`].
pub fn to_table_flattened<'a, T: Record>(
    records: impl IntoIterator<Item = &'a T>,
    flatten_fields: &[FieldDescriptor],
) -> Result<Table> {
    TableConverter::default().convert_flattened(records, flatten_fields)
}

/// Convert records into an explicit list of columns
///
/// # Errors
/// See [`TableConverter::convert_explicit`].
pub fn to_table_explicit<'a, T: Record>(
    records: impl IntoIterator<Item = &'a T>,
    fields: &[FieldDescriptor],
) -> Result<Table> {
    TableConverter::default().convert_explicit(records, fields)
}

/// Conversion methods on slices of records
pub trait ToTable {
    /// See [`to_table`]
    ///
    /// # Errors
    /// See [`TableConverter::convert`].
    fn to_table(&self) -> Result<Table>;

    /// See [`to_table_flattened`]
    ///
    /// # Errors
    /// See [`TableConverter::convert_flattened`].
    fn to_table_flattened(&self, flatten_fields: &[FieldDescriptor]) -> Result<Table>;

    /// See [`to_table_explicit`]
    ///
    /// # Errors
    /// See [`TableConverter::convert_explicit`].
    fn to_table_explicit(&self, fields: &[FieldDescriptor]) -> Result<Table>;
}

impl<T: Record> ToTable for [T] {
    fn to_table(&self) -> Result<Table> {
        TableConverter::default().convert(self)
    }

    fn to_table_flattened(&self, flatten_fields: &[FieldDescriptor]) -> Result<Table> {
        TableConverter::default().convert_flattened(self, flatten_fields)
    }

    fn to_table_explicit(&self, fields: &[FieldDescriptor]) -> Result<Table> {
        TableConverter::default().convert_explicit(self, fields)
    }
}
