//! Module for record field definitions
//!
//! This module provides the descriptor types that identify the fields of a
//! record type and their semantic value types.

pub mod field;

pub use field::{DECIMAL_PRECISION, DECIMAL_SCALE, FieldDescriptor, RecordType, ValueType};
