//! Storage traits and error types

use crate::state::Checkpoint;
use thiserror::Error;

/// Errors that can occur during checkpoint persistence
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse checkpoint: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize checkpoint: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Corrupt checkpoint: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for checkpoint backends
///
/// The orchestrator is the only writer. Every `save` replaces the previous
/// cursor entirely.
pub trait CheckpointStore {
    /// Human-readable description of where the checkpoint lives
    fn location(&self) -> String;

    /// Returns true if a checkpoint has been persisted before
    fn exists(&self) -> bool;

    /// Reads the persisted cursor
    fn load(&self) -> StorageResult<Checkpoint>;

    /// Replaces the persisted cursor
    fn save(&mut self, checkpoint: &Checkpoint) -> StorageResult<()>;

    /// Resets the cursor to its defaults (`A`, 1, 1)
    fn reset(&mut self) -> StorageResult<Checkpoint> {
        let checkpoint = Checkpoint::default();
        self.save(&checkpoint)?;
        Ok(checkpoint)
    }
}
