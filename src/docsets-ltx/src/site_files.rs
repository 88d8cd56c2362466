//! Access to the rendered output directory.
//!
//! The pipeline only ever reads whole files and writes whole files, so that is all the
//! interface offers. A file that does not exist is `Ok(None)`, not an error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::Result;

/// Interface to the files of the built site.
#[async_trait]
pub trait SiteFiles: Send + Sync {
    /// Reads a UTF-8 file. Returns `Ok(None)` when it does not exist.
    async fn read_file(&self, path: &Path) -> Result<Option<String>>;

    /// Writes a file, creating its parent directories as needed.
    async fn write_file(&self, path: &Path, contents: &str) -> Result<()>;
}

/// The real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFiles;

#[async_trait]
impl SiteFiles for DiskFiles {
    async fn read_file(&self, path: &Path) -> Result<Option<String>> {
        if !tokio::fs::try_exists(path).await? {
            return Ok(None);
        }
        Ok(Some(tokio::fs::read_to_string(path).await?))
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
        Ok(())
    }
}

/// In-memory site files, keyed by path.
///
/// Lets hosts and tests run the whole pipeline without a rendered site on disk.
#[derive(Debug, Default)]
pub struct MemoryFiles {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryFiles {
    /// Create a new empty file store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a file store holding the given files
    pub fn with_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<PathBuf>,
        C: Into<String>,
    {
        let store = Self::new();
        for (path, contents) in files {
            store.insert(path, contents);
        }
        store
    }

    /// Adds or replaces a file
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.lock().insert(path.into(), contents.into());
    }

    /// Current contents of a file
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.lock().get(path.as_ref()).cloned()
    }

    /// All stored paths, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<PathBuf, String>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SiteFiles for MemoryFiles {
    async fn read_file(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.get(path))
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        self.insert(path, contents);
        Ok(())
    }
}
