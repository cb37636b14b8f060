//! Error types for the bulk statement layer.

use thiserror::Error;

/// Errors surfaced by [`crate::BulkConnection`].
///
/// Statement failures are reported at chunk granularity: the engine does
/// not identify which row inside a multi-row statement caused a failure,
/// nor does it retry. Misuse of the API (value arrays not aligned to the
/// column count, empty column lists) is a programming error and panics
/// instead of appearing here.
#[derive(Error, Debug)]
pub enum BulkError {
    /// MySQL connection or statement error.
    #[error("MySQL error: {0}")]
    MySQL(#[from] mysql_async::Error),
}
