//! Access to image files.
//!
//! - [`AssetSource`]: existence checks and byte reads by location
//! - [`FsAssetSource`]: backed by `std::fs`
//! - [`MockAssetSource`]: in-memory, for tests

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Reads image files for preview features.
pub trait AssetSource: Send + Sync {
    /// Check if a file exists at the location.
    ///
    /// Returns `false` on errors.
    fn exists(&self, path: &Path) -> bool;

    /// Read the file's bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// [`AssetSource`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsAssetSource;

impl AssetSource for FsAssetSource {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// In-memory [`AssetSource`].
#[derive(Debug, Default)]
pub struct MockAssetSource {
    files: RwLock<HashMap<PathBuf, Vec<u8>>>,
    unreadable: RwLock<Vec<PathBuf>>,
}

impl MockAssetSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), bytes.into());
        self
    }

    /// Add a file that exists but fails to read.
    #[must_use]
    pub fn with_unreadable(mut self, path: impl Into<PathBuf>) -> Self {
        self.unreadable
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.into());
        self
    }
}

impl MockAssetSource {
    fn is_unreadable(&self, path: &Path) -> bool {
        self.unreadable
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|p| p == path)
    }
}

impl AssetSource for MockAssetSource {
    fn exists(&self, path: &Path) -> bool {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
            || self.is_unreadable(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        if self.is_unreadable(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "unreadable"));
        }
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_source() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.png");
        std::fs::write(&file, b"bytes").unwrap();

        assert!(FsAssetSource.exists(&file));
        assert!(!FsAssetSource.exists(dir.path()));
        assert!(!FsAssetSource.exists(&dir.path().join("missing.png")));
        assert_eq!(FsAssetSource.read(&file).unwrap(), b"bytes");
        assert!(FsAssetSource.read(&dir.path().join("missing.png")).is_err());
    }

    #[test]
    fn test_mock_source() {
        let source = MockAssetSource::new()
            .with_file("/a.png", b"x".to_vec())
            .with_unreadable("/locked.png");

        assert!(source.exists(Path::new("/a.png")));
        assert!(source.exists(Path::new("/locked.png")));
        assert!(!source.exists(Path::new("/b.png")));
        assert_eq!(source.read(Path::new("/a.png")).unwrap(), b"x");
        assert_eq!(
            source.read(Path::new("/locked.png")).unwrap_err().kind(),
            io::ErrorKind::PermissionDenied
        );
    }
}
