//! Segment header and file naming.

use crate::error::{CoreError, CoreResult};
use crate::timestamp::{from_unix_nanos, to_unix_nanos};
use chrono::{DateTime, Utc};
use std::fmt;

/// Magic bytes opening every segment file.
pub const SEGMENT_MAGIC: [u8; 4] = *b"WSEG";

/// Current segment format version.
pub const SEGMENT_VERSION: u8 = 1;

/// magic (4) + version (1) + codec (8) + base_index (8) + segment_id (8) + created_at (8)
pub const HEADER_SIZE: usize = 37;

/// The only payload codec this build understands.
pub const CODEC_BINARY_V1: u64 = 0x1;

/// Identifier of a segment, unique within a log directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId(pub u64);

impl SegmentId {
    /// Creates a new segment ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Metadata of one segment, as read from its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentInfo {
    /// Segment identifier.
    pub id: SegmentId,
    /// Index of the first entry in the segment.
    pub base_index: u64,
    /// Codec used for frame payloads.
    pub codec: u64,
    /// When the segment was created.
    pub created_at: DateTime<Utc>,
}

impl SegmentInfo {
    /// Creates segment metadata using the current codec.
    #[must_use]
    pub fn new(id: SegmentId, base_index: u64, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            base_index,
            codec: CODEC_BINARY_V1,
            created_at,
        }
    }

    /// Overrides the codec identifier.
    #[must_use]
    pub const fn with_codec(mut self, codec: u64) -> Self {
        self.codec = codec;
        self
    }

    /// Returns the file name this segment is stored under.
    #[must_use]
    pub fn file_name(&self) -> String {
        file_name(self.base_index, self.id)
    }

    /// Serializes the header.
    ///
    /// # Errors
    ///
    /// Returns an error if `created_at` does not fit in unix nanoseconds.
    pub fn encode_header(&self) -> CoreResult<[u8; HEADER_SIZE]> {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&SEGMENT_MAGIC);
        buf[4] = SEGMENT_VERSION;
        buf[5..13].copy_from_slice(&self.codec.to_le_bytes());
        buf[13..21].copy_from_slice(&self.base_index.to_le_bytes());
        buf[21..29].copy_from_slice(&self.id.as_u64().to_le_bytes());
        buf[29..37].copy_from_slice(&to_unix_nanos(&self.created_at)?.to_le_bytes());
        Ok(buf)
    }

    /// Parses a header.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SegmentCorruption`] on a short buffer, bad magic or
    /// a newer format version.
    pub fn decode_header(bytes: &[u8]) -> CoreResult<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(CoreError::segment_corruption(format!(
                "header too short: {} bytes",
                bytes.len()
            )));
        }
        if bytes[0..4] != SEGMENT_MAGIC {
            return Err(CoreError::segment_corruption("invalid segment magic"));
        }
        let version = bytes[4];
        if version > SEGMENT_VERSION {
            return Err(CoreError::segment_corruption(format!(
                "unsupported segment version {version}"
            )));
        }

        let u64_at = |at: usize| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&bytes[at..at + 8]);
            raw
        };

        Ok(Self {
            codec: u64::from_le_bytes(u64_at(5)),
            base_index: u64::from_le_bytes(u64_at(13)),
            id: SegmentId::new(u64::from_le_bytes(u64_at(21))),
            created_at: from_unix_nanos(i64::from_le_bytes(u64_at(29))),
        })
    }
}

/// Builds a segment file name.
#[must_use]
pub fn file_name(base_index: u64, id: SegmentId) -> String {
    format!("{base_index:020}-{id}.wal")
}

/// Parses a segment file name into its base index and ID.
///
/// Returns `None` for anything that is not a segment file.
#[must_use]
pub fn parse_file_name(name: &str) -> Option<(u64, SegmentId)> {
    let stem = name.strip_suffix(".wal")?;
    let (base, id) = stem.split_once('-')?;
    if base.len() != 20 || id.len() != 16 {
        return None;
    }
    let base_index = base.parse().ok()?;
    let id = u64::from_str_radix(id, 16).ok()?;
    Some((base_index, SegmentId::new(id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> SegmentInfo {
        SegmentInfo::new(SegmentId::new(0x2a), 1001, from_unix_nanos(1_700_000_000_123_456_789))
    }

    #[test]
    fn header_decodes_what_was_encoded() {
        let header = info().encode_header().unwrap();
        assert_eq!(&header[0..4], b"WSEG");
        assert_eq!(SegmentInfo::decode_header(&header).unwrap(), info());
    }

    #[test]
    fn bad_magic_is_corruption() {
        let mut header = info().encode_header().unwrap();
        header[0] = b'X';
        assert!(matches!(
            SegmentInfo::decode_header(&header),
            Err(CoreError::SegmentCorruption { .. })
        ));
    }

    #[test]
    fn future_version_is_corruption() {
        let mut header = info().encode_header().unwrap();
        header[4] = SEGMENT_VERSION + 1;
        let err = SegmentInfo::decode_header(&header).unwrap_err();
        assert!(err.to_string().contains("unsupported segment version"));
    }

    #[test]
    fn file_names_sort_by_base_index() {
        let a = file_name(9, SegmentId::new(5));
        let b = file_name(10, SegmentId::new(1));
        assert_eq!(a, "00000000000000000009-0000000000000005.wal");
        assert!(a < b);
        assert_eq!(parse_file_name(&b), Some((10, SegmentId::new(1))));
    }

    #[test]
    fn foreign_files_are_not_segments() {
        assert_eq!(parse_file_name("wal-meta.db"), None);
        assert_eq!(parse_file_name("1-1.wal"), None);
        assert_eq!(
            parse_file_name("0000000000000000000x-0000000000000001.wal"),
            None
        );
    }
}
