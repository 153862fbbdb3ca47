//! Error handling for record-to-table conversion.

use arrow::error::ArrowError;

use crate::schema::FieldDescriptor;

/// Errors that can occur while converting records into a table
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// A required input is missing or unusable
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Reading a declared field from a record failed
    #[error("Failed to read field `{field}` of `{record_type}`: {reason}")]
    FieldAccess {
        /// Name of the field
        field: String,
        /// Declaring record type of the field
        record_type: String,
        /// What went wrong
        reason: String,
    },

    /// A requested column cannot be resolved against the record type, or a
    /// row does not line up with the table's columns
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The conversion was cancelled through its cancellation token
    #[error("Conversion cancelled after {rows} rows")]
    Cancelled {
        /// Rows converted before cancellation was observed
        rows: usize,
    },

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TableError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a field access error for `field`
    pub fn field_access(field: &FieldDescriptor, reason: impl Into<String>) -> Self {
        Self::FieldAccess {
            field: field.name().to_string(),
            record_type: field.declaring_type().name().to_string(),
            reason: reason.into(),
        }
    }

    /// Create a schema mismatch error
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch(message.into())
    }
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, TableError>;
