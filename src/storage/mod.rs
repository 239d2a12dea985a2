//! Storage module for persisting the traversal checkpoint
//!
//! This module handles:
//! - The `CheckpointStore` contract used by the orchestrator
//! - A TOML file backend rewritten whole on every save
//! - An in-memory backend that keeps every saved cursor (tests only)

#[cfg(test)]
mod memory;
mod toml_store;
mod traits;

#[cfg(test)]
pub use memory::MemoryCheckpointStore;
pub use toml_store::TomlCheckpointStore;
pub use traits::{CheckpointStore, StorageError, StorageResult};
