use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use voltorb_core::{GameError, ScoreStore};

/// Keeps the score record in a single file.
#[derive(Clone, Debug, PartialEq)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileStore {
    fn read(&self) -> voltorb_core::Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => {
                log::error!("Could not read {}: {err}", self.path.display());
                Err(GameError::PersistenceUnavailable)
            }
        }
    }

    fn write(&mut self, bytes: &[u8]) -> voltorb_core::Result<()> {
        fs::write(&self.path, bytes).map_err(|err| {
            log::error!("Could not write {}: {err}", self.path.display());
            GameError::PersistenceUnavailable
        })
    }
}
