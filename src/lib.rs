//! A Rust library for converting sequences of typed records into tables,
//! with schema derivation, one-level field flattening and explicit column
//! selection across nested record types.

// Lets the derive macro's `::record_table` paths resolve inside this crate.
extern crate self as record_table;

pub mod config;
pub mod convert;
pub mod error;
pub mod schema;
pub mod table;

// Re-export the most common types for easier use
// Core types
pub use config::{CancellationToken, ConversionConfig, UnresolvedFieldPolicy};
pub use error::{Result, TableError};
pub use schema::{CellType, FieldDescriptor, Record, RecordType, ValueType};
pub use table::{CellValue, Column, RecordCell, Row, Table};

// Conversion entry points
pub use convert::{TableConverter, ToTable, to_table, to_table_explicit, to_table_flattened};

// Derive macro
pub use record_table_macros::Record;

// Arrow types
pub use arrow::record_batch::RecordBatch;
