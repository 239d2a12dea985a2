//! TOML file checkpoint backend

use crate::state::Checkpoint;
use crate::storage::traits::{CheckpointStore, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Checkpoint stored as a small human-editable TOML file
///
/// Saves go to a sibling `.tmp` file that is then renamed over the target, so
/// a crash mid-write leaves the previous cursor intact.
#[derive(Debug, Clone)]
pub struct TomlCheckpointStore {
    path: PathBuf,
}

impl TomlCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "checkpoint".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CheckpointStore for TomlCheckpointStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> StorageResult<Checkpoint> {
        let content = fs::read_to_string(&self.path)?;
        let checkpoint: Checkpoint = toml::from_str(&content)?;
        checkpoint.validate().map_err(StorageError::Corrupt)?;
        Ok(checkpoint)
    }

    fn save(&mut self, checkpoint: &Checkpoint) -> StorageResult<()> {
        let content = toml::to_string(checkpoint)?;
        let temp = self.temp_path();
        fs::write(&temp, content)?;
        fs::rename(&temp, &self.path)?;
        tracing::debug!("Saved checkpoint ({})", checkpoint);
        Ok(())
    }
}
