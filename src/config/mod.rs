//! Configuration for `TableConverter`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// What to do with a requested column that cannot be traced to the record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedFieldPolicy {
    /// Abort the conversion with `TableError::SchemaMismatch`
    #[default]
    Fail,
    /// Keep the column and fill every cell with the absent marker
    FillAbsent,
}

/// Shared flag used to cancel a running conversion
///
/// The converter checks the flag once per record.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a token that is not cancelled
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Configuration for the `TableConverter`
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Handling of columns that resolve to no field of the record type
    pub unresolved_fields: UnresolvedFieldPolicy,
    /// Check every cell against its column's value type
    pub validate_cells: bool,
    /// Token checked once per record
    pub cancellation: Option<CancellationToken>,
    /// Expected number of records, used to pre-size the row buffer
    pub capacity_hint: Option<usize>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            unresolved_fields: UnresolvedFieldPolicy::Fail,
            validate_cells: true,
            cancellation: None,
            capacity_hint: None,
        }
    }
}

impl ConversionConfig {
    /// Set the policy for unresolvable columns
    #[must_use]
    pub fn with_unresolved_fields(mut self, policy: UnresolvedFieldPolicy) -> Self {
        self.unresolved_fields = policy;
        self
    }

    /// Enable or disable per-cell type validation
    #[must_use]
    pub fn with_cell_validation(mut self, validate: bool) -> Self {
        self.validate_cells = validate;
        self
    }

    /// Attach a cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Pre-size the row buffer for `records` records
    #[must_use]
    pub fn with_capacity_hint(mut self, records: usize) -> Self {
        self.capacity_hint = Some(records);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}
