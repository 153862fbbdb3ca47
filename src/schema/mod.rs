//! Schema derivation for record types.
//!
//! Field descriptors come from the [`Record`] provider; the builder turns an
//! ordered descriptor list into an empty table and the resolver computes the
//! descriptor list for flattened conversions.

pub mod builder;
pub mod field_def;
pub mod record;
pub mod resolver;

pub use builder::build_schema;
pub use field_def::{DECIMAL_PRECISION, DECIMAL_SCALE, FieldDescriptor, RecordType, ValueType};
pub use record::{CellType, Record};
pub use resolver::resolve_flattened;
