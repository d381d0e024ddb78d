//! Segment writer.
//!
//! The dump tool never writes to a live log. This exists to lay down
//! segments for tests and fixtures in exactly the format the reader expects.

use crate::error::{CoreError, CoreResult};
use crate::segment::header::SegmentInfo;
use crate::segment::FRAME_LEN_SIZE;
use std::path::Path;
use waldump_storage::{FileBackend, StorageBackend};

/// Appends frames to one segment.
pub struct SegmentWriter<B: StorageBackend> {
    backend: B,
    info: SegmentInfo,
    next_index: u64,
}

impl<B: StorageBackend> SegmentWriter<B> {
    /// Writes the segment header to an empty backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is not empty or the write fails.
    pub fn new(mut backend: B, info: SegmentInfo) -> CoreResult<Self> {
        if backend.size()? != 0 {
            return Err(CoreError::segment_corruption(format!(
                "refusing to write header into non-empty segment {}",
                info.file_name()
            )));
        }
        backend.append(&info.encode_header()?)?;
        Ok(Self {
            backend,
            next_index: info.base_index,
            info,
        })
    }

    /// Appends one entry and returns the index it was stored at.
    ///
    /// # Errors
    ///
    /// Returns an error for empty or oversized payloads, or on I/O failure.
    pub fn append(&mut self, payload: &[u8]) -> CoreResult<u64> {
        if payload.is_empty() {
            return Err(CoreError::malformed("segment frames cannot be empty"));
        }
        let len = u32::try_from(payload.len())
            .map_err(|_| CoreError::malformed("frame payload exceeds 4 GiB"))?;
        let following = self.next_index.checked_add(1).ok_or_else(|| {
            CoreError::invariant_violation(format!(
                "{}: entry index overflows",
                self.info.file_name()
            ))
        })?;

        let mut frame = Vec::with_capacity(FRAME_LEN_SIZE + payload.len() + 4);
        frame.extend_from_slice(&len.to_le_bytes());
        frame.extend_from_slice(payload);
        let crc = crc32fast::hash(&frame);
        frame.extend_from_slice(&crc.to_le_bytes());

        self.backend.append(&frame)?;
        let index = self.next_index;
        self.next_index = following;
        Ok(index)
    }

    /// Returns the segment metadata.
    #[must_use]
    pub fn info(&self) -> &SegmentInfo {
        &self.info
    }

    /// Returns the index the next append will receive.
    #[must_use]
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Makes appended frames durable.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync fails.
    pub fn sync(&mut self) -> CoreResult<()> {
        self.backend.sync()?;
        Ok(())
    }

    /// Consumes the writer and returns its backend.
    pub fn into_backend(self) -> B {
        self.backend
    }
}

impl SegmentWriter<FileBackend> {
    /// Creates a new segment file in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file already has content or cannot be created.
    pub fn create(dir: &Path, info: SegmentInfo) -> CoreResult<Self> {
        let backend = FileBackend::open_with_create_dirs(&dir.join(info.file_name()))?;
        Self::new(backend, info)
    }
}
