//! In-memory checkpoint backend

use crate::state::Checkpoint;
use crate::storage::traits::{CheckpointStore, StorageError, StorageResult};

/// Checkpoint store that keeps every saved cursor in order
///
/// Useful for inspecting the save cadence of a crawl. `fail_after` makes the
/// store refuse saves once that many have succeeded.
#[derive(Debug, Clone, Default)]
pub struct MemoryCheckpointStore {
    current: Option<Checkpoint>,
    history: Vec<Checkpoint>,
    fail_after: Option<usize>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `checkpoint`
    pub fn with_checkpoint(checkpoint: Checkpoint) -> Self {
        Self {
            current: Some(checkpoint),
            ..Self::default()
        }
    }

    /// Makes every save after the first `saves` fail
    pub fn fail_after(mut self, saves: usize) -> Self {
        self.fail_after = Some(saves);
        self
    }

    /// Every cursor saved so far, oldest first
    pub fn history(&self) -> &[Checkpoint] {
        &self.history
    }

    pub fn current(&self) -> Option<Checkpoint> {
        self.current
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn exists(&self) -> bool {
        self.current.is_some()
    }

    fn load(&self) -> StorageResult<Checkpoint> {
        self.current
            .ok_or_else(|| StorageError::Corrupt("no checkpoint saved".to_string()))
    }

    fn save(&mut self, checkpoint: &Checkpoint) -> StorageResult<()> {
        if let Some(limit) = self.fail_after {
            if self.history.len() >= limit {
                return Err(StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "checkpoint storage unavailable",
                )));
            }
        }
        self.current = Some(*checkpoint);
        self.history.push(*checkpoint);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_recorded() {
        let mut store = MemoryCheckpointStore::new();
        assert!(!store.exists());

        store.save(&Checkpoint::new('A', 1, 2)).unwrap();
        store.save(&Checkpoint::new('A', 1, 3)).unwrap();

        assert_eq!(store.load().unwrap(), Checkpoint::new('A', 1, 3));
        assert_eq!(store.history().len(), 2);
    }

    #[test]
    fn test_fail_after() {
        let mut store = MemoryCheckpointStore::new().fail_after(1);
        assert!(store.save(&Checkpoint::default()).is_ok());
        assert!(store.save(&Checkpoint::new('A', 2, 1)).is_err());
        assert_eq!(store.current(), Some(Checkpoint::default()));
    }
}
