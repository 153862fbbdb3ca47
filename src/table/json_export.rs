//! JSON export of tables, one object per row.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::table::Table;

impl Table {
    /// Convert the rows to JSON objects keyed by column name
    ///
    /// Keys follow column order. When several columns share a name, the
    /// right-most one wins. Decimals are written as JSON strings so no
    /// precision is lost.
    ///
    /// # Errors
    /// Returns `TableError::Json` if a cell cannot be represented as JSON.
    pub fn to_json_records(&self) -> Result<Value> {
        let mut records = Vec::with_capacity(self.row_count());
        for row in self.rows() {
            let mut object = Map::with_capacity(self.column_count());
            for (column, value) in self.columns().iter().zip(row.values()) {
                object.insert(column.name().to_string(), serde_json::to_value(value)?);
            }
            records.push(Value::Object(object));
        }
        Ok(Value::Array(records))
    }

    /// Serialize the whole table, columns and rows, as a JSON string
    ///
    /// # Errors
    /// Returns `TableError::Json` if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::schema::ValueType;
    use crate::table::{CellValue, Column, Table};

    #[test]
    fn test_to_json_records() {
        let mut table = Table::with_columns(vec![
            Column::new("id", ValueType::Integer, false),
            Column::new("hot", ValueType::Boolean, true),
        ]);
        table
            .push_row(vec![CellValue::Integer(1), CellValue::Boolean(true)])
            .unwrap();
        table
            .push_row(vec![CellValue::Integer(2), CellValue::Absent])
            .unwrap();

        assert_eq!(
            table.to_json_records().unwrap(),
            json!([{ "id": 1, "hot": true }, { "id": 2, "hot": null }])
        );
    }

    #[test]
    fn test_to_json_string_empty_table() {
        let table = Table::default();
        assert_eq!(table.to_json_string().unwrap(), r#"{"columns":[],"rows":[]}"#);
    }
}
