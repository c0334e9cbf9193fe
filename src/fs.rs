//! File system port
//!
//! The emitter writes through this trait so unit tests can run against an
//! in-memory implementation. `LocalFs` writes atomically (temp file in the
//! target directory, then rename) so a reader never observes a partially
//! written artifact under normal conditions.

use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{StageError, StageResult};

/// Abstract file system interface
pub trait FileSystem {
    /// Read file content
    fn read_to_string(&self, path: &Path) -> StageResult<String>;

    /// Write file content atomically, creating parent directories
    fn write_atomic(&self, path: &Path, content: &str) -> StageResult<()>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and parents
    fn create_dir_all(&self, path: &Path) -> StageResult<()>;

    /// Compute SHA-256 hash of file content
    fn hash_file(&self, path: &Path) -> StageResult<String>;
}

/// Compute SHA-256 hash of in-memory content
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("sha256:{:x}", hasher.finalize())
}

/// Local disk implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFs {
    fn read_to_string(&self, path: &Path) -> StageResult<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write_atomic(&self, path: &Path, content: &str) -> StageResult<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;
        // Temp file must live in the target directory: rename is only
        // atomic within one filesystem.
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(path).map_err(|e| StageError::Io(e.error))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> StageResult<()> {
        Ok(std::fs::create_dir_all(path)?)
    }

    fn hash_file(&self, path: &Path) -> StageResult<String> {
        let content = std::fs::read(path)?;
        Ok(hash_content(&content))
    }
}

/// Mock file system for testing
///
/// Uses `Arc<Mutex<>>` internally so it can be cloned and shared.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockFileSystem {
    pub files: std::sync::Arc<std::sync::Mutex<std::collections::HashMap<PathBuf, String>>>,
}

#[cfg(test)]
impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> StageResult<String> {
        let files = self.files.lock().unwrap();
        files.get(path).cloned().ok_or_else(|| {
            StageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "file not found",
            ))
        })
    }

    fn write_atomic(&self, path: &Path, content: &str) -> StageResult<()> {
        let mut files = self.files.lock().unwrap();
        files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path)
    }

    fn create_dir_all(&self, _path: &Path) -> StageResult<()> {
        Ok(())
    }

    fn hash_file(&self, path: &Path) -> StageResult<String> {
        let content = self.read_to_string(path)?;
        Ok(hash_content(content.as_bytes()))
    }
}
