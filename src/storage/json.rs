use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::StorageError;
use crate::book::{EventBook, Snapshot};

/// Whole-book persistence as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty book.
    pub fn read_snapshot(&self) -> Result<Snapshot, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no data file yet");
                return Ok(Snapshot::default());
            }
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })
    }

    pub fn load(&self) -> Result<EventBook, StorageError> {
        let book = EventBook::from_snapshot(self.read_snapshot()?).map_err(|source| {
            StorageError::Book {
                path: self.path.clone(),
                source,
            }
        })?;
        info!(
            path = %self.path.display(),
            persons = book.persons().len(),
            "loaded event book"
        );
        Ok(book)
    }

    pub fn save(&self, book: &EventBook) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let text =
            serde_json::to_string_pretty(&book.snapshot()).map_err(|source| StorageError::Json {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, text).map_err(io_err)?;
        debug!(path = %self.path.display(), "saved event book");
        Ok(())
    }
}
