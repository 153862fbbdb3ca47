//! Table cell values
//!
//! A cell is a tagged union over the supported value types plus an explicit
//! absent marker. Nested records are captured as a [`RecordCell`] snapshot.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::schema::{FieldDescriptor, RecordType, ValueType};

/// One value of a table row
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No value
    #[default]
    Absent,
    /// Boolean value
    Boolean(bool),
    /// 32-bit integer value
    Integer(i32),
    /// 64-bit integer value
    Long(i64),
    /// Double precision floating point value
    Double(f64),
    /// Exact decimal value
    Decimal(Decimal),
    /// Text value
    String(String),
    /// Date value
    Date(NaiveDate),
    /// Date and time without time zone
    Timestamp(NaiveDateTime),
    /// Nested record value
    Record(RecordCell),
}

impl CellValue {
    /// Whether this is the absent marker
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Absent)
    }

    /// Whether this value may be stored in a column of `value_type`
    ///
    /// The absent marker conforms to every type.
    #[must_use]
    pub fn conforms_to(&self, value_type: ValueType) -> bool {
        match (self, value_type) {
            (CellValue::Absent, _) => true,
            (CellValue::Boolean(_), ValueType::Boolean)
            | (CellValue::Integer(_), ValueType::Integer)
            | (CellValue::Long(_), ValueType::Long)
            | (CellValue::Double(_), ValueType::Double)
            | (CellValue::Decimal(_), ValueType::Decimal)
            | (CellValue::String(_), ValueType::String)
            | (CellValue::Date(_), ValueType::Date)
            | (CellValue::Timestamp(_), ValueType::Timestamp) => true,
            (CellValue::Record(record), ValueType::Record(record_type)) => {
                record.record_type() == record_type
            }
            _ => false,
        }
    }

    /// Short name of the variant, for diagnostics
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            CellValue::Absent => "Absent",
            CellValue::Boolean(_) => "Boolean",
            CellValue::Integer(_) => "Integer",
            CellValue::Long(_) => "Long",
            CellValue::Double(_) => "Double",
            CellValue::Decimal(_) => "Decimal",
            CellValue::String(_) => "String",
            CellValue::Date(_) => "Date",
            CellValue::Timestamp(_) => "Timestamp",
            CellValue::Record(_) => "Record",
        }
    }

    /// The nested record, if this cell holds one
    #[must_use]
    pub fn as_record(&self) -> Option<&RecordCell> {
        match self {
            CellValue::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Absent => Ok(()),
            CellValue::Boolean(v) => write!(f, "{v}"),
            CellValue::Integer(v) => write!(f, "{v}"),
            CellValue::Long(v) => write!(f, "{v}"),
            CellValue::Double(v) => write!(f, "{v}"),
            CellValue::Decimal(v) => write!(f, "{v}"),
            CellValue::String(v) => f.write_str(v),
            CellValue::Date(v) => write!(f, "{v}"),
            CellValue::Timestamp(v) => write!(f, "{v}"),
            CellValue::Record(record) => write!(f, "{record}"),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Absent => serializer.serialize_none(),
            CellValue::Boolean(v) => serializer.serialize_bool(*v),
            CellValue::Integer(v) => serializer.serialize_i32(*v),
            CellValue::Long(v) => serializer.serialize_i64(*v),
            CellValue::Double(v) => serializer.serialize_f64(*v),
            CellValue::Decimal(v) => Serialize::serialize(v, serializer),
            CellValue::String(v) => serializer.serialize_str(v),
            CellValue::Date(v) => v.serialize(serializer),
            CellValue::Timestamp(v) => v.serialize(serializer),
            CellValue::Record(record) => record.serialize(serializer),
        }
    }
}

/// Snapshot of a nested record value
///
/// Holds the record type and one `(field name, value)` entry per field of
/// that type, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordCell {
    record_type: RecordType,
    entries: Vec<(String, CellValue)>,
}

impl RecordCell {
    /// Create a new record snapshot
    #[must_use]
    pub fn new(record_type: RecordType, entries: Vec<(String, CellValue)>) -> Self {
        Self {
            record_type,
            entries,
        }
    }

    /// The type of the nested record
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// Value of the field called `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| value)
    }

    /// Value of `field`, provided it is declared by this record's type
    #[must_use]
    pub fn read(&self, field: &FieldDescriptor) -> Option<&CellValue> {
        if field.declaring_type() != self.record_type {
            return None;
        }
        self.get(field.name())
    }

    /// All entries in declaration order
    #[must_use]
    pub fn entries(&self) -> &[(String, CellValue)] {
        &self.entries
    }
}

impl fmt::Display for RecordCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ ", self.record_type)?;
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str(" }")
    }
}

impl Serialize for RecordCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CellType, Record};

    #[derive(crate::Record)]
    struct Tag {
        label: String,
        weight: Option<f64>,
    }

    #[derive(crate::Record)]
    struct Other {
        label: String,
    }

    #[test]
    fn test_conforms_to() {
        assert!(CellValue::Absent.conforms_to(ValueType::Date));
        assert!(CellValue::Integer(1).conforms_to(ValueType::Integer));
        assert!(!CellValue::Integer(1).conforms_to(ValueType::Long));

        let tag = Tag {
            label: "a".to_string(),
            weight: None,
        }
        .to_cell();
        assert!(tag.conforms_to(ValueType::Record(Tag::record_type())));
        assert!(!tag.conforms_to(ValueType::Record(Other::record_type())));
    }

    #[test]
    fn test_record_cell_read_checks_declaring_type() {
        let cell = Tag {
            label: "a".to_string(),
            weight: Some(2.5),
        }
        .to_cell();
        let record = cell.as_record().unwrap();

        let weight = Tag::require_field("weight").unwrap();
        let foreign = Other::require_field("label").unwrap();

        assert_eq!(record.read(&weight), Some(&CellValue::Double(2.5)));
        assert_eq!(record.read(&foreign), None);
        assert_eq!(record.get("label"), Some(&CellValue::String("a".to_string())));
    }

    #[test]
    fn test_display() {
        let cell = Tag {
            label: "a".to_string(),
            weight: None,
        }
        .to_cell();
        assert_eq!(cell.to_string(), "Tag { label: a, weight:  }");
        assert_eq!(CellValue::Absent.to_string(), "");
    }

    #[test]
    fn test_serialize_json() {
        let cell = Tag {
            label: "a".to_string(),
            weight: None,
        }
        .to_cell();
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json, serde_json::json!({ "label": "a", "weight": null }));
        assert_eq!(
            serde_json::to_value(CellValue::Integer(3)).unwrap(),
            serde_json::json!(3)
        );
    }
}
