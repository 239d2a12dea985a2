//! Output sink trait and error types

use crate::output::ListingRecord;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output directory not found: {}", .0.display())]
    DirectoryMissing(PathBuf),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for listing sinks
///
/// Rows are only ever appended. A batch is durable once `write_batch` returns.
pub trait RecordSink {
    /// Appends one page worth of records and flushes them
    fn write_batch(&mut self, records: &[ListingRecord]) -> OutputResult<()>;
}

impl RecordSink for Vec<ListingRecord> {
    fn write_batch(&mut self, records: &[ListingRecord]) -> OutputResult<()> {
        self.extend_from_slice(records);
        Ok(())
    }
}
