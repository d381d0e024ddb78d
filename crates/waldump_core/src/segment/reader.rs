//! Streaming segment reader.
//!
//! Reads frames one at a time through a bounded buffer so memory stays flat
//! no matter how large a segment grows.

use crate::error::{CoreError, CoreResult};
use crate::segment::header::{SegmentInfo, HEADER_SIZE};
use crate::segment::{StoredRecord, FRAME_CRC_SIZE, FRAME_LEN_SIZE};
use bytes::Bytes;
use waldump_storage::StorageBackend;

/// Read buffer size. Frames larger than this get a one-off read of their own size.
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// An iterator over the entries of one segment.
///
/// Yields [`StoredRecord`]s in index order. Iteration ends at the last
/// complete frame; checksum failures are returned once and end iteration.
///
/// A segment that was followed by a newer one is sealed: its frames must run
/// exactly to the end of the file, so a zero length or truncated frame there
/// is corruption rather than the end of the log.
///
/// # Example
///
/// ```ignore
/// let reader = SegmentReader::open(FileBackend::open_read_only(&path)?, name)?;
/// for record in reader {
///     let record = record?;
///     // ...
/// }
/// ```
pub struct SegmentReader<B: StorageBackend> {
    backend: B,
    info: SegmentInfo,
    /// Name used in error messages.
    name: String,
    /// Size of the backend when the reader was opened.
    total_size: u64,
    /// File offset of the next frame.
    offset: u64,
    /// Index the next frame holds.
    next_index: u64,
    buffer: Vec<u8>,
    /// File offset of `buffer[0]`.
    buffer_start: u64,
    /// Whether a later segment exists, so a torn tail is not acceptable.
    sealed: bool,
    finished: bool,
}

impl<B: StorageBackend> SegmentReader<B> {
    /// Opens a reader and validates the segment header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is missing or corrupt.
    pub fn open(backend: B, name: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        let total_size = backend.size()?;
        if total_size < HEADER_SIZE as u64 {
            return Err(CoreError::segment_corruption(format!(
                "{name}: file too short for a segment header"
            )));
        }
        let header = backend.read_at(0, HEADER_SIZE)?;
        let info = SegmentInfo::decode_header(&header).map_err(|e| match e {
            CoreError::SegmentCorruption { message } => {
                CoreError::segment_corruption(format!("{name}: {message}"))
            }
            other => other,
        })?;

        Ok(Self {
            backend,
            next_index: info.base_index,
            info,
            name,
            total_size,
            offset: HEADER_SIZE as u64,
            buffer: Vec::new(),
            buffer_start: HEADER_SIZE as u64,
            sealed: false,
            finished: false,
        })
    }

    /// Marks the segment as sealed.
    #[must_use]
    pub fn sealed(mut self, sealed: bool) -> Self {
        self.sealed = sealed;
        self
    }

    /// Returns the segment metadata.
    #[must_use]
    pub fn info(&self) -> &SegmentInfo {
        &self.info
    }

    /// Returns the index the next yielded record will carry.
    #[must_use]
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Returns `len` bytes at `offset`, refilling the buffer when needed.
    ///
    /// `Ok(None)` means the range runs past the end of the segment.
    fn fill(&mut self, offset: u64, len: usize) -> CoreResult<Option<&[u8]>> {
        let end = offset.saturating_add(len as u64);
        if end > self.total_size {
            return Ok(None);
        }

        let buffered_end = self.buffer_start + self.buffer.len() as u64;
        if offset < self.buffer_start || end > buffered_end {
            let remaining = usize::try_from(self.total_size - offset).unwrap_or(usize::MAX);
            let want = len.max(READ_BUFFER_SIZE).min(remaining);
            self.buffer = self.backend.read_at(offset, want)?;
            self.buffer_start = offset;
        }

        let start = (offset - self.buffer_start) as usize;
        Ok(Some(&self.buffer[start..start + len]))
    }

    fn read_next(&mut self) -> CoreResult<Option<StoredRecord>> {
        let frame_start = self.offset;

        let Some(len_bytes) = self.fill(frame_start, FRAME_LEN_SIZE)? else {
            return Ok(None);
        };
        let mut raw_len = [0u8; FRAME_LEN_SIZE];
        raw_len.copy_from_slice(len_bytes);
        let payload_len = u32::from_le_bytes(raw_len) as usize;

        if payload_len == 0 {
            if self.sealed {
                return Err(CoreError::segment_corruption(format!(
                    "{}: zero-length frame at offset {frame_start} in sealed segment",
                    self.name
                )));
            }
            // Preallocated, never written.
            return Ok(None);
        }

        let frame_len = FRAME_LEN_SIZE + payload_len + FRAME_CRC_SIZE;
        let name = self.name.clone();
        let sealed = self.sealed;
        let Some(frame) = self.fill(frame_start, frame_len)? else {
            if sealed {
                return Err(CoreError::segment_corruption(format!(
                    "{name}: frame at offset {frame_start} runs past the end of sealed segment"
                )));
            }
            tracing::warn!(
                segment = %name,
                offset = frame_start,
                "truncated frame at end of segment, treating as end"
            );
            return Ok(None);
        };

        let body = &frame[..FRAME_LEN_SIZE + payload_len];
        let mut raw_crc = [0u8; FRAME_CRC_SIZE];
        raw_crc.copy_from_slice(&frame[FRAME_LEN_SIZE + payload_len..]);
        let expected = u32::from_le_bytes(raw_crc);
        let actual = crc32fast::hash(body);
        if expected != actual {
            return Err(CoreError::ChecksumMismatch {
                segment: name,
                offset: frame_start,
                expected,
                actual,
            });
        }

        let data = Bytes::copy_from_slice(&body[FRAME_LEN_SIZE..]);
        let following = self.next_index.checked_add(1).ok_or_else(|| {
            CoreError::segment_corruption(format!(
                "{name}: entry index overflows at offset {frame_start}"
            ))
        })?;
        let record = StoredRecord {
            index: self.next_index,
            data,
        };

        self.offset += frame_len as u64;
        self.next_index = following;
        Ok(Some(record))
    }
}

impl<B: StorageBackend> Iterator for SegmentReader<B> {
    type Item = CoreResult<StoredRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_next() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{SegmentId, SegmentWriter};
    use chrono::Utc;
    use waldump_storage::InMemoryBackend;

    fn segment_bytes(base_index: u64, payloads: &[&[u8]]) -> Vec<u8> {
        let info = SegmentInfo::new(SegmentId::new(1), base_index, Utc::now());
        let mut writer = SegmentWriter::new(InMemoryBackend::new(), info).unwrap();
        for payload in payloads {
            writer.append(payload).unwrap();
        }
        writer.into_backend().data()
    }

    fn read_all(bytes: Vec<u8>) -> CoreResult<Vec<StoredRecord>> {
        SegmentReader::open(InMemoryBackend::with_data(bytes), "test.wal")?.collect()
    }

    #[test]
    fn empty_segment_yields_nothing() {
        assert!(read_all(segment_bytes(1, &[])).unwrap().is_empty());
    }

    #[test]
    fn indexes_follow_base_index() {
        let records = read_all(segment_bytes(40, &[b"a", b"bb", b"ccc"])).unwrap();
        let indexes: Vec<u64> = records.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![40, 41, 42]);
        assert_eq!(&records[2].data[..], b"ccc");
    }

    #[test]
    fn large_frame_exceeding_buffer() {
        let big = vec![0xAB; READ_BUFFER_SIZE * 2 + 3];
        let records = read_all(segment_bytes(1, &[b"x", &big, b"y"])).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].data.len(), big.len());
        assert_eq!(&records[2].data[..], b"y");
    }

    #[test]
    fn truncated_tail_frame_ends_segment() {
        let mut bytes = segment_bytes(1, &[b"first", b"second"]);
        bytes.truncate(bytes.len() - 3);
        let records = read_all(bytes).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0].data[..], b"first");
    }

    #[test]
    fn zeroed_tail_ends_segment() {
        let mut bytes = segment_bytes(1, &[b"only"]);
        bytes.extend_from_slice(&[0u8; 64]);
        assert_eq!(read_all(bytes).unwrap().len(), 1);
    }

    fn read_sealed(bytes: Vec<u8>) -> CoreResult<Vec<StoredRecord>> {
        SegmentReader::open(InMemoryBackend::with_data(bytes), "sealed.wal")?
            .sealed(true)
            .collect()
    }

    #[test]
    fn sealed_segment_reads_to_its_end() {
        let records = read_sealed(segment_bytes(7, &[b"a", b"b"])).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn truncated_frame_in_sealed_segment_is_corruption() {
        let mut bytes = segment_bytes(1, &[b"first", b"second"]);
        bytes.truncate(bytes.len() - 3);
        let err = read_sealed(bytes).unwrap_err();
        assert!(matches!(err, CoreError::SegmentCorruption { .. }));
        let message = err.to_string();
        assert!(message.contains("sealed.wal"));
        let second_frame = HEADER_SIZE + FRAME_LEN_SIZE + 5 + FRAME_CRC_SIZE;
        assert!(message.contains(&format!("offset {second_frame}")));
    }

    #[test]
    fn oversized_length_in_sealed_segment_is_corruption() {
        let mut bytes = segment_bytes(1, &[b"one", b"two", b"three"]);
        let second_frame = HEADER_SIZE + FRAME_LEN_SIZE + 3 + FRAME_CRC_SIZE;
        bytes[second_frame..second_frame + FRAME_LEN_SIZE]
            .copy_from_slice(&0x00ff_ffffu32.to_le_bytes());
        let err = read_sealed(bytes).unwrap_err();
        assert!(matches!(err, CoreError::SegmentCorruption { .. }));
    }

    #[test]
    fn zeroed_tail_in_sealed_segment_is_corruption() {
        let mut bytes = segment_bytes(1, &[b"only"]);
        bytes.extend_from_slice(&[0u8; 64]);
        let err = read_sealed(bytes).unwrap_err();
        assert!(err.to_string().contains("zero-length frame"));
    }

    #[test]
    fn index_overflow_is_corruption() {
        let mut bytes = segment_bytes(u64::MAX, &[]);
        let mut frame = 4u32.to_le_bytes().to_vec();
        frame.extend_from_slice(b"last");
        let crc = crc32fast::hash(&frame);
        frame.extend_from_slice(&crc.to_le_bytes());
        bytes.extend_from_slice(&frame);

        let records: Vec<_> = SegmentReader::open(InMemoryBackend::with_data(bytes), "edge.wal")
            .unwrap()
            .collect();
        assert_eq!(records.len(), 1);
        let err = records[0].as_ref().unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn flipped_payload_bit_is_checksum_mismatch() {
        let mut bytes = segment_bytes(1, &[b"payload"]);
        bytes[HEADER_SIZE + FRAME_LEN_SIZE] ^= 0x01;
        let mut reader =
            SegmentReader::open(InMemoryBackend::with_data(bytes), "bad.wal").unwrap();
        match reader.next() {
            Some(Err(CoreError::ChecksumMismatch {
                segment, offset, ..
            })) => {
                assert_eq!(segment, "bad.wal");
                assert_eq!(offset, HEADER_SIZE as u64);
            }
            other => panic!("expected checksum mismatch, got {other:?}"),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn missing_header_is_corruption() {
        let result = SegmentReader::open(InMemoryBackend::with_data(vec![1, 2, 3]), "tiny.wal");
        let err = result.err().unwrap();
        assert!(err.to_string().contains("tiny.wal"));
    }
}
