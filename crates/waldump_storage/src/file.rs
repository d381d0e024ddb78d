//! File-based storage backend.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::{Mutex, RwLock};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A single file exposed as a byte store.
///
/// Dumping opens segment files with [`FileBackend::open_read_only`], which
/// captures the file length at open time. Bytes appended by a live writer
/// after that point stay invisible to this handle; a later reopen picks them
/// up. This is what lets follow mode re-scan a growing tail segment safely.
///
/// # Example
///
/// ```no_run
/// use waldump_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let backend = FileBackend::open_read_only(Path::new("00000000000000000001-0000000000000001.wal")).unwrap();
/// let header = backend.read_at(0, 37).unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    file: Mutex<File>,
    size: RwLock<u64>,
    writable: bool,
}

impl FileBackend {
    /// Opens an existing file for reading only.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be opened.
    pub fn open_read_only(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new().read(true).open(path)?;
        Self::from_file(path, file, false)
    }

    /// Opens or creates a file for reading and appending.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or created.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        Self::from_file(path, file, true)
    }

    /// Opens or creates a writable file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot be opened.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    fn from_file(path: &Path, file: File, writable: bool) -> StorageResult<Self> {
        let size = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            size: RwLock::new(size),
            writable,
        })
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether this handle accepts appends.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.writable
    }
}

impl StorageBackend for FileBackend {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        let size = *self.size.read();
        let end = offset.saturating_add(len as u64);

        if offset > size || end > size {
            return Err(StorageError::ReadPastEnd { offset, len, size });
        }

        if len == 0 {
            return Ok(Vec::new());
        }

        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;

        let mut buffer = vec![0u8; len];
        file.read_exact(&mut buffer)?;

        Ok(buffer)
    }

    fn append(&mut self, data: &[u8]) -> StorageResult<u64> {
        if !self.writable {
            return Err(StorageError::ReadOnly {
                path: self.path.display().to_string(),
            });
        }

        let mut size = self.size.write();
        let offset = *size;
        if data.is_empty() {
            return Ok(offset);
        }

        let mut file = self.file.lock();
        file.seek(SeekFrom::End(0))?;
        file.write_all(data)?;
        *size += data.len() as u64;

        Ok(offset)
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(*self.size.read())
    }

    fn sync(&mut self) -> StorageResult<()> {
        if self.writable {
            self.file.lock().sync_all()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seg.wal");

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(backend.is_writable());
        assert!(path.exists());
    }

    #[test]
    fn read_only_open_of_missing_file_fails() {
        let dir = tempdir().unwrap();
        let result = FileBackend::open_read_only(&dir.path().join("missing.wal"));
        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[test]
    fn append_then_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seg.wal");

        let mut backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.append(b"head").unwrap(), 0);
        assert_eq!(backend.append(b"tail").unwrap(), 4);
        assert_eq!(backend.read_at(2, 4).unwrap(), b"adta");
    }

    #[test]
    fn read_only_rejects_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seg.wal");
        FileBackend::open(&path).unwrap().append(b"data").unwrap();

        let mut backend = FileBackend::open_read_only(&path).unwrap();
        let result = backend.append(b"more");
        assert!(matches!(result, Err(StorageError::ReadOnly { .. })));
        assert!(backend.sync().is_ok());
    }

    #[test]
    fn read_only_size_is_captured_at_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seg.wal");
        let mut writer = FileBackend::open(&path).unwrap();
        writer.append(b"first").unwrap();
        writer.sync().unwrap();

        let reader = FileBackend::open_read_only(&path).unwrap();
        writer.append(b"second").unwrap();
        writer.sync().unwrap();

        assert_eq!(reader.size().unwrap(), 5);
        assert!(matches!(
            reader.read_at(5, 6),
            Err(StorageError::ReadPastEnd { .. })
        ));

        let reopened = FileBackend::open_read_only(&path).unwrap();
        assert_eq!(reopened.read_at(5, 6).unwrap(), b"second");
    }

    #[test]
    fn create_with_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("seg.wal");

        let backend = FileBackend::open_with_create_dirs(&path).unwrap();
        assert_eq!(backend.path(), path);
        assert!(path.exists());
    }
}
