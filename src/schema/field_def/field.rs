//! Field descriptors and value types
//!
//! This module defines the metadata that describes one accessible field of a
//! record type: its name, its semantic value type and the record type that
//! declares it.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use arrow::datatypes::{DataType, Field, Fields, TimeUnit};

use crate::schema::Record;

/// Precision used for decimal columns when exporting to Arrow
pub const DECIMAL_PRECISION: u8 = 38;
/// Scale used for decimal columns when exporting to Arrow
pub const DECIMAL_SCALE: i8 = 10;

/// Identity of a record type
///
/// Carries the display name of the type and the function that lists its
/// field descriptors. Two handles are equal when they refer to the same Rust
/// type, regardless of the display name.
#[derive(Clone, Copy)]
pub struct RecordType {
    name: &'static str,
    id: TypeId,
    fields: fn() -> Vec<FieldDescriptor>,
}

impl RecordType {
    /// Handle for the record type `T`
    #[must_use]
    pub fn of<T: Record>() -> Self {
        Self {
            name: T::TYPE_NAME,
            id: TypeId::of::<T>(),
            fields: T::field_descriptors,
        }
    }

    /// Display name of the record type
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Field descriptors of the record type, in declaration order
    #[must_use]
    pub fn fields(&self) -> Vec<FieldDescriptor> {
        (self.fields)()
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RecordType {}

impl Hash for RecordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordType({})", self.name)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Represents the semantic type of a field
///
/// Every column of a converted table carries one of these. Nested record
/// values keep the identity of their record type so they can later be
/// flattened or matched against a field's declaring type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Boolean value
    Boolean,
    /// 32-bit integer value
    Integer,
    /// 64-bit integer value
    Long,
    /// Double precision floating point value
    Double,
    /// Exact decimal value
    Decimal,
    /// Text value
    String,
    /// Date value
    Date,
    /// Date and time without time zone
    Timestamp,
    /// Nested record value
    Record(RecordType),
}

impl ValueType {
    /// The record type of a nested record value, if this is one
    #[must_use]
    pub fn record_type(&self) -> Option<RecordType> {
        match self {
            ValueType::Record(record_type) => Some(*record_type),
            _ => None,
        }
    }

    /// Whether values of this type are nested records
    #[must_use]
    pub fn is_record(&self) -> bool {
        matches!(self, ValueType::Record(_))
    }

    /// Convert to Arrow `DataType`
    ///
    /// Nested records become structs whose children are all nullable, since a
    /// child value is absent whenever the nested record itself is.
    #[must_use]
    pub fn to_arrow_type(&self) -> DataType {
        match self {
            ValueType::Boolean => DataType::Boolean,
            ValueType::Integer => DataType::Int32,
            ValueType::Long => DataType::Int64,
            ValueType::Double => DataType::Float64,
            ValueType::Decimal => DataType::Decimal128(DECIMAL_PRECISION, DECIMAL_SCALE),
            ValueType::String => DataType::Utf8,
            ValueType::Date => DataType::Date32,
            ValueType::Timestamp => DataType::Timestamp(TimeUnit::Microsecond, None),
            ValueType::Record(record_type) => {
                let children: Fields = record_type
                    .fields()
                    .iter()
                    .map(|field| Field::new(field.name(), field.value_type().to_arrow_type(), true))
                    .collect();
                DataType::Struct(children)
            }
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Boolean => write!(f, "Boolean"),
            ValueType::Integer => write!(f, "Integer"),
            ValueType::Long => write!(f, "Long"),
            ValueType::Double => write!(f, "Double"),
            ValueType::Decimal => write!(f, "Decimal"),
            ValueType::String => write!(f, "String"),
            ValueType::Date => write!(f, "Date"),
            ValueType::Timestamp => write!(f, "Timestamp"),
            ValueType::Record(record_type) => write!(f, "{record_type}"),
        }
    }
}

/// Describes one named, typed field of a record type
///
/// Descriptors are compared by name and declaring type only: two descriptors
/// naming the same field of the same type are the same field even if they
/// were built separately.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    value_type: ValueType,
    declaring_type: RecordType,
    nullable: bool,
}

impl FieldDescriptor {
    /// Create a new field descriptor
    pub fn new(
        name: impl Into<String>,
        value_type: ValueType,
        declaring_type: RecordType,
        nullable: bool,
    ) -> Self {
        Self {
            name: name.into(),
            value_type,
            declaring_type,
            nullable,
        }
    }

    /// Name of the field, unique within its declaring type
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared value type of the field
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// The record type that declares this field
    #[must_use]
    pub fn declaring_type(&self) -> RecordType {
        self.declaring_type
    }

    /// Whether the field's value can be absent
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Qualified name in `Type.field` form, used in diagnostics
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.declaring_type, self.name)
    }
}

impl PartialEq for FieldDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.declaring_type == other.declaring_type
    }
}

impl Eq for FieldDescriptor {}

impl Hash for FieldDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.declaring_type.hash(state);
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.qualified_name(), self.value_type)
    }
}
