//! Field descriptor providers
//!
//! A record type exposes its fields through the [`Record`] trait, and every
//! Rust type that can sit in a record field maps to a table cell through
//! [`CellType`]. Both are normally generated with `#[derive(Record)]`, but a
//! hand-written static descriptor table works just as well.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::error::{Result, TableError};
use crate::schema::{FieldDescriptor, RecordType, ValueType};
use crate::table::CellValue;

/// A record type whose fields can be listed and read by descriptor
pub trait Record: 'static {
    /// Display name of the record type
    const TYPE_NAME: &'static str;

    /// The type's field descriptors, in declaration order
    fn field_descriptors() -> Vec<FieldDescriptor>;

    /// Read the value of `field` from this record
    ///
    /// # Errors
    /// Returns `TableError::FieldAccess` if `field` is not a field of this
    /// record type.
    fn read_field(&self, field: &FieldDescriptor) -> Result<CellValue>;

    /// Identity handle of this record type
    fn record_type() -> RecordType
    where
        Self: Sized,
    {
        RecordType::of::<Self>()
    }

    /// Look up a field descriptor by name
    fn field(name: &str) -> Option<FieldDescriptor>
    where
        Self: Sized,
    {
        Self::field_descriptors()
            .into_iter()
            .find(|field| field.name() == name)
    }

    /// Look up a field descriptor by name, failing if the type has no such field
    ///
    /// # Errors
    /// Returns `TableError::InvalidArgument` for an unknown field name.
    fn require_field(name: &str) -> Result<FieldDescriptor>
    where
        Self: Sized,
    {
        Self::field(name).ok_or_else(|| {
            TableError::invalid_argument(format!(
                "`{}` has no field named `{name}`",
                Self::TYPE_NAME
            ))
        })
    }
}

/// A Rust type that can be stored in a table cell
pub trait CellType {
    /// Whether values of this type can be absent
    const NULLABLE: bool = false;

    /// The semantic value type of this Rust type
    fn value_type() -> ValueType;

    /// Convert the value into a table cell
    fn to_cell(&self) -> CellValue;
}

impl<T: CellType> CellType for Option<T> {
    const NULLABLE: bool = true;

    fn value_type() -> ValueType {
        T::value_type()
    }

    fn to_cell(&self) -> CellValue {
        match self {
            Some(value) => value.to_cell(),
            None => CellValue::Absent,
        }
    }
}

/// Implement `CellType` for a primitive by widening it into a cell variant
macro_rules! impl_cell_type {
    ($($ty:ty => $value_type:ident, $variant:ident);* $(;)?) => {
        $(
            impl CellType for $ty {
                fn value_type() -> ValueType {
                    ValueType::$value_type
                }

                fn to_cell(&self) -> CellValue {
                    CellValue::$variant((*self).into())
                }
            }
        )*
    };
}

impl_cell_type! {
    bool => Boolean, Boolean;
    i8 => Integer, Integer;
    i16 => Integer, Integer;
    i32 => Integer, Integer;
    u8 => Integer, Integer;
    u16 => Integer, Integer;
    i64 => Long, Long;
    u32 => Long, Long;
    f32 => Double, Double;
    f64 => Double, Double;
    Decimal => Decimal, Decimal;
    NaiveDate => Date, Date;
    NaiveDateTime => Timestamp, Timestamp;
}

impl CellType for String {
    fn value_type() -> ValueType {
        ValueType::String
    }

    fn to_cell(&self) -> CellValue {
        CellValue::String(self.clone())
    }
}

impl CellType for &'static str {
    fn value_type() -> ValueType {
        ValueType::String
    }

    fn to_cell(&self) -> CellValue {
        CellValue::String((*self).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RecordCell;

    /// Hand-written descriptor table, no derive involved
    struct Point {
        x: i32,
        label: Option<String>,
    }

    impl Record for Point {
        const TYPE_NAME: &'static str = "Point";

        fn field_descriptors() -> Vec<FieldDescriptor> {
            let declaring = Self::record_type();
            vec![
                FieldDescriptor::new("x", ValueType::Integer, declaring, false),
                FieldDescriptor::new("label", ValueType::String, declaring, true),
            ]
        }

        fn read_field(&self, field: &FieldDescriptor) -> Result<CellValue> {
            match field.name() {
                "x" if field.declaring_type() == Self::record_type() => Ok(self.x.to_cell()),
                "label" if field.declaring_type() == Self::record_type() => {
                    Ok(self.label.to_cell())
                }
                _ => Err(TableError::field_access(field, "no such field")),
            }
        }
    }

    #[derive(crate::Record)]
    struct Wrapper {
        point: Option<i64>,
        #[field(name = "Title")]
        title: String,
        #[field(skip)]
        #[allow(dead_code)]
        scratch: Vec<u8>,
    }

    #[derive(crate::Record)]
    struct Pair<T: CellType + 'static> {
        left: T,
        right: Option<T>,
    }

    #[test]
    fn test_generic_derive() {
        let fields = Pair::<i32>::field_descriptors();
        assert_eq!(fields[0].value_type(), ValueType::Integer);
        assert!(fields[1].is_nullable());
        assert_ne!(Pair::<i32>::record_type(), Pair::<String>::record_type());

        let pair = Pair {
            left: "a".to_string(),
            right: None,
        };
        let left = Pair::<String>::require_field("left").unwrap();
        assert_eq!(
            pair.read_field(&left).unwrap(),
            CellValue::String("a".to_string())
        );
    }

    #[test]
    fn test_option_is_nullable_and_absent() {
        assert!(<Option<i32> as CellType>::NULLABLE);
        assert!(!<i32 as CellType>::NULLABLE);
        assert_eq!(<Option<i32> as CellType>::value_type(), ValueType::Integer);
        assert_eq!(None::<i32>.to_cell(), CellValue::Absent);
        assert_eq!(Some(7_i32).to_cell(), CellValue::Integer(7));
    }

    #[test]
    fn test_primitives_widen() {
        assert_eq!(3_u16.to_cell(), CellValue::Integer(3));
        assert_eq!(3_u32.to_cell(), CellValue::Long(3));
        assert_eq!(<f32 as CellType>::value_type(), ValueType::Double);
        assert_eq!(1.5_f32.to_cell(), CellValue::Double(1.5));
    }

    #[test]
    fn test_hand_written_record() {
        let point = Point {
            x: 4,
            label: None,
        };
        let x = Point::require_field("x").unwrap();
        let label = Point::require_field("label").unwrap();
        assert_eq!(point.read_field(&x).unwrap(), CellValue::Integer(4));
        assert_eq!(point.read_field(&label).unwrap(), CellValue::Absent);
        assert!(label.is_nullable());
        assert!(matches!(
            Point::require_field("y"),
            Err(TableError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_derived_record_descriptors() {
        let fields = Wrapper::field_descriptors();
        let names: Vec<&str> = fields.iter().map(FieldDescriptor::name).collect();
        assert_eq!(names, vec!["point", "Title"]);
        assert_eq!(fields[0].value_type(), ValueType::Long);
        assert!(fields[0].is_nullable());
        assert_eq!(fields[1].declaring_type(), Wrapper::record_type());
        assert_eq!(Wrapper::TYPE_NAME, "Wrapper");
    }

    #[test]
    fn test_derived_record_rejects_foreign_field() {
        let wrapper = Wrapper {
            point: Some(1),
            title: "t".to_string(),
            scratch: Vec::new(),
        };
        let foreign = Point::require_field("x").unwrap();
        assert!(matches!(
            wrapper.read_field(&foreign),
            Err(TableError::FieldAccess { .. })
        ));
    }

    #[test]
    fn test_derived_record_as_cell() {
        let wrapper = Wrapper {
            point: None,
            title: "t".to_string(),
            scratch: Vec::new(),
        };
        let expected = RecordCell::new(
            Wrapper::record_type(),
            vec![
                ("point".to_string(), CellValue::Absent),
                ("Title".to_string(), CellValue::String("t".to_string())),
            ],
        );
        assert_eq!(wrapper.to_cell(), CellValue::Record(expected));
        assert_eq!(
            <Wrapper as CellType>::value_type(),
            ValueType::Record(Wrapper::record_type())
        );
    }
}
