//! Segment files: the on-disk home of log entries.
//!
//! A log directory holds one file per segment, named
//! `<base_index:020>-<segment_id:016x>.wal` so that a plain lexical sort
//! orders them by first index.
//!
//! ## Segment Format
//!
//! ```text
//! header: | magic "WSEG" (4) | version (1) | codec (8) | base_index (8) | segment_id (8) | created_at (8) |
//! frame:  | length (4) | payload (N) | crc32 (4) |
//! ```
//!
//! All integers are little endian; `created_at` is unix nanoseconds. The
//! checksum covers the length field and payload. Entries carry no index of
//! their own: the n-th frame of a segment holds index `base_index + n`.
//!
//! ## Read Policy
//!
//! - **Truncated frame** at the end of the file: the writer is mid-append,
//!   treat as end of segment.
//! - **Zero length field**: preallocated space that was never written, end of
//!   segment.
//! - **Checksum mismatch / bad magic / unsupported version**: fatal. A dump
//!   must never skip over corrupt data silently.
//!
//! The codec identifier in the header describes how frame payloads are
//! encoded. The reader does not interpret payloads, so checking the codec is
//! left to whoever decodes them.

mod filer;
mod header;
mod reader;
mod writer;

use bytes::Bytes;

pub use filer::{SegmentFile, SegmentFiler};
pub use header::{
    file_name, parse_file_name, SegmentId, SegmentInfo, CODEC_BINARY_V1, HEADER_SIZE,
    SEGMENT_MAGIC, SEGMENT_VERSION,
};
pub use reader::SegmentReader;
pub use writer::SegmentWriter;

/// One entry as stored: its log index and the raw envelope bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Log index, strictly increasing across the whole log.
    pub index: u64,
    /// Raw envelope bytes.
    pub data: Bytes,
}

/// Size of the frame length prefix.
pub(crate) const FRAME_LEN_SIZE: usize = 4;

/// Size of the frame checksum trailer.
pub(crate) const FRAME_CRC_SIZE: usize = 4;
