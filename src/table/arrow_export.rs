//! Arrow export of tables
//!
//! Converts a [`Table`] into an Arrow `RecordBatch` for bulk data transfer.
//! Absent cells become nulls, nested records become struct arrays.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanBuilder, Date32Builder, Decimal128Builder, Float64Builder, Int32Builder,
    Int64Builder, StringBuilder, StructArray, TimestampMicrosecondBuilder,
};
use arrow::buffer::NullBuffer;
use arrow::datatypes::{Field, Fields, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use chrono::Datelike;
use rust_decimal::Decimal;

use crate::error::{Result, TableError};
use crate::schema::{DECIMAL_PRECISION, DECIMAL_SCALE, ValueType};
use crate::table::{CellValue, Table};

/// Days from 0001-01-01 (CE) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

static ABSENT: CellValue = CellValue::Absent;

impl Table {
    /// Arrow schema matching the table's columns
    #[must_use]
    pub fn to_arrow_schema(&self) -> Schema {
        let fields: Vec<Field> = self
            .columns()
            .iter()
            .map(|column| {
                Field::new(
                    column.name(),
                    column.value_type().to_arrow_type(),
                    column.is_nullable(),
                )
            })
            .collect();
        Schema::new(fields)
    }

    /// Convert the table into an Arrow record batch
    ///
    /// # Errors
    /// Returns `TableError::SchemaMismatch` if a cell does not match its
    /// column type or a decimal does not fit the export scale, and
    /// `TableError::Arrow` if Arrow rejects the batch (for example nulls in a
    /// non-nullable column).
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let schema = Arc::new(self.to_arrow_schema());

        let arrays = self
            .columns()
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let cells: Vec<&CellValue> = self.column_values(index).collect();
                build_array(column.value_type(), column.name(), &cells)
            })
            .collect::<Result<Vec<_>>>()?;

        let options = RecordBatchOptions::new().with_row_count(Some(self.row_count()));
        Ok(RecordBatch::try_new_with_options(schema, arrays, &options)?)
    }
}

fn mismatch(column: &str, value_type: ValueType, cell: &CellValue) -> TableError {
    TableError::SchemaMismatch(format!(
        "column `{column}` of type {value_type} holds a {} value",
        cell.kind()
    ))
}

fn decimal_to_i128(column: &str, value: &Decimal) -> Result<i128> {
    let scale = DECIMAL_SCALE.unsigned_abs().into();
    let mut scaled = value.round_dp(scale);
    scaled.rescale(scale);
    if scaled.scale() != scale {
        return Err(TableError::SchemaMismatch(format!(
            "decimal {value} in column `{column}` does not fit scale {DECIMAL_SCALE}"
        )));
    }
    Ok(scaled.mantissa())
}

/// Append every cell of a column to a builder, mapping absent cells to nulls
macro_rules! build_primitive {
    (
        $builder:expr, $cells:expr, $column:expr, $value_type:expr,
        $variant:ident, |$v:ident| $convert:expr
    ) => {{
        let mut builder = $builder;
        for cell in $cells {
            match cell {
                CellValue::$variant($v) => builder.append_value($convert),
                CellValue::Absent => builder.append_null(),
                other => return Err(mismatch($column, $value_type, other)),
            }
        }
        Ok(Arc::new(builder.finish()) as ArrayRef)
    }};
}

fn build_array<'a>(
    value_type: ValueType,
    column: &str,
    cells: &[&'a CellValue],
) -> Result<ArrayRef> {
    let len = cells.len();
    match value_type {
        ValueType::Boolean => build_primitive!(
            BooleanBuilder::with_capacity(len), cells, column, value_type, Boolean, |v| *v
        ),
        ValueType::Integer => build_primitive!(
            Int32Builder::with_capacity(len), cells, column, value_type, Integer, |v| *v
        ),
        ValueType::Long => build_primitive!(
            Int64Builder::with_capacity(len), cells, column, value_type, Long, |v| *v
        ),
        ValueType::Double => build_primitive!(
            Float64Builder::with_capacity(len), cells, column, value_type, Double, |v| *v
        ),
        ValueType::Decimal => build_primitive!(
            Decimal128Builder::with_capacity(len)
                .with_precision_and_scale(DECIMAL_PRECISION, DECIMAL_SCALE)?,
            cells, column, value_type, Decimal, |v| decimal_to_i128(column, v)?
        ),
        ValueType::String => build_primitive!(
            StringBuilder::with_capacity(len, len * 8), cells, column, value_type, String, |v| v
        ),
        ValueType::Date => build_primitive!(
            Date32Builder::with_capacity(len), cells, column, value_type, Date,
            |v| v.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
        ),
        ValueType::Timestamp => build_primitive!(
            TimestampMicrosecondBuilder::with_capacity(len), cells, column, value_type, Timestamp,
            |v| v.and_utc().timestamp_micros()
        ),
        ValueType::Record(record_type) => {
            let descriptors = record_type.fields();

            let mut children = Vec::with_capacity(descriptors.len());
            for descriptor in &descriptors {
                let child_cells = cells
                    .iter()
                    .copied()
                    .map(|cell: &'a CellValue| match cell {
                        CellValue::Record(record) if record.record_type() == record_type => {
                            Ok(record.get(descriptor.name()).unwrap_or(&ABSENT))
                        }
                        CellValue::Absent => Ok(&ABSENT),
                        other => Err(mismatch(column, value_type, other)),
                    })
                    .collect::<Result<Vec<&CellValue>>>()?;
                let child_column = format!("{column}.{}", descriptor.name());
                children.push(build_array(descriptor.value_type(), &child_column, &child_cells)?);
            }

            let fields: Fields = descriptors
                .iter()
                .map(|descriptor| {
                    Field::new(descriptor.name(), descriptor.value_type().to_arrow_type(), true)
                })
                .collect();

            let nulls = cells.iter().any(|cell| cell.is_absent()).then(|| {
                let validity: Vec<bool> = cells.iter().map(|cell| !cell.is_absent()).collect();
                NullBuffer::from(validity)
            });

            let array = if fields.is_empty() {
                StructArray::new_empty_fields(len, nulls)
            } else {
                StructArray::try_new(fields, children, nulls)?
            };
            Ok(Arc::new(array) as ArrayRef)
        }
    }
}

#[cfg(test)]
mod tests {
    use arrow::array::{Array, Decimal128Array, Int32Array, StringArray};
    use arrow::datatypes::DataType;
    use rust_decimal::Decimal;

    use super::*;
    use crate::table::Column;

    #[test]
    fn test_to_record_batch_primitives() {
        let mut table = Table::with_columns(vec![
            Column::new("id", ValueType::Integer, false),
            Column::new("name", ValueType::String, true),
            Column::new("amount", ValueType::Decimal, false),
        ]);
        table
            .push_row(vec![
                CellValue::Integer(1),
                CellValue::String("a".to_string()),
                CellValue::Decimal(Decimal::new(1250, 2)),
            ])
            .unwrap();
        table
            .push_row(vec![
                CellValue::Integer(2),
                CellValue::Absent,
                CellValue::Decimal(Decimal::new(-3, 0)),
            ])
            .unwrap();

        let batch = table.to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 3);
        assert_eq!(
            batch.schema().field(2).data_type(),
            &DataType::Decimal128(DECIMAL_PRECISION, DECIMAL_SCALE)
        );

        let ids = batch.column(0).as_any().downcast_ref::<Int32Array>().unwrap();
        assert_eq!(ids.value(1), 2);

        let names = batch.column(1).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(names.value(0), "a");
        assert!(names.is_null(1));

        let amounts = batch
            .column(2)
            .as_any()
            .downcast_ref::<Decimal128Array>()
            .unwrap();
        assert_eq!(amounts.value(0), 125_000_000_000);
        assert_eq!(amounts.value(1), -30_000_000_000);
    }

    #[test]
    fn test_null_in_non_nullable_column_fails() {
        let mut table = Table::with_columns(vec![Column::new("id", ValueType::Integer, false)]);
        table.push_row(vec![CellValue::Absent]).unwrap();
        assert!(matches!(table.to_record_batch(), Err(TableError::Arrow(_))));
    }

    #[test]
    fn test_mistyped_cell_fails() {
        let mut table = Table::with_columns(vec![Column::new("id", ValueType::Integer, true)]);
        table.push_row(vec![CellValue::Boolean(true)]).unwrap();
        assert!(matches!(
            table.to_record_batch(),
            Err(TableError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_empty_table_keeps_row_count() {
        let mut table = Table::with_columns(Vec::new());
        table.push_row(Vec::<CellValue>::new()).unwrap();
        let batch = table.to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.num_columns(), 0);
    }
}
