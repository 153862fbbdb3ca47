//! Tabular output of a record conversion.
//!
//! A [`Table`] is an ordered list of [`Column`]s and an ordered list of
//! [`Row`]s whose cells line up positionally with the columns.

mod arrow_export;
mod cell;
mod json_export;

use std::ops::Index;

use serde::{Serialize, Serializer};

use crate::error::{Result, TableError};
use crate::schema::ValueType;

pub use cell::{CellValue, RecordCell};

/// Output schema unit: a named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    name: String,
    #[serde(rename = "type", serialize_with = "serialize_value_type")]
    value_type: ValueType,
    nullable: bool,
}

impl Column {
    /// Create a new column
    pub fn new(name: impl Into<String>, value_type: ValueType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            value_type,
            nullable,
        }
    }

    /// Column name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value type of the column
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Whether cells of this column may be absent
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub(crate) fn set_nullable(&mut self, nullable: bool) {
        self.nullable = nullable;
    }
}

fn serialize_value_type<S: Serializer>(
    value_type: &ValueType,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value_type)
}

/// One row of a table, positionally aligned with the table's columns
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Row(Vec<CellValue>);

impl Row {
    /// Create a row from its cells
    #[must_use]
    pub fn new(values: Vec<CellValue>) -> Self {
        Self(values)
    }

    /// Cells of the row
    #[must_use]
    pub fn values(&self) -> &[CellValue] {
        &self.0
    }

    /// Cell at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.0.get(index)
    }

    /// Number of cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the row has no cells
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the row, returning its cells
    #[must_use]
    pub fn into_values(self) -> Vec<CellValue> {
        self.0
    }
}

impl Index<usize> for Row {
    type Output = CellValue;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<CellValue>> for Row {
    fn from(values: Vec<CellValue>) -> Self {
        Self(values)
    }
}

/// A table with named, typed columns and rows of values
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given columns
    #[must_use]
    pub fn with_columns(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// The table's columns, in order
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The table's rows, in insertion order
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of columns
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of the first column called `name`
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    /// Cell at `row`, `column`
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// All cells of one column, top to bottom
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(column))
    }

    /// Append a row
    ///
    /// # Errors
    /// Returns `TableError::SchemaMismatch` if the row length differs from
    /// the column count.
    pub fn push_row(&mut self, row: impl Into<Row>) -> Result<()> {
        let row = row.into();
        if row.len() != self.columns.len() {
            return Err(TableError::SchemaMismatch(format!(
                "row has {} values but the table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub(crate) fn reserve_rows(&mut self, additional: usize) {
        self.rows.reserve(additional);
    }

    pub(crate) fn column_mut(&mut self, index: usize) -> Option<&mut Column> {
        self.columns.get_mut(index)
    }

    /// Consume the table, returning its columns and rows
    #[must_use]
    pub fn into_parts(self) -> (Vec<Column>, Vec<Row>) {
        (self.columns, self.rows)
    }
}
