//! Error types for waldump core.

use std::io;
use thiserror::Error;
use waldump_codec::CodecError;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while reading segments or decoding their entries.
///
/// Every variant is terminal for the scan that produced it. Unknown message
/// kinds are not errors and never show up here.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] waldump_storage::StorageError),

    /// Payload codec error outside of a record decode.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Payload too short to hold a discriminator, or an envelope that does not parse.
    #[error("malformed record: {message}")]
    MalformedRecord {
        /// Description of what is missing.
        message: String,
    },

    /// Segment written with a codec this build does not understand.
    #[error("unsupported codec {codec} in file {segment}")]
    UnsupportedCodec {
        /// Codec identifier from the segment header.
        codec: u64,
        /// Segment file name.
        segment: String,
    },

    /// The decode strategy could not parse the payload into its target shape.
    #[error("failed to decode {kind}: {source}")]
    DecodeFailure {
        /// Message kind being decoded.
        kind: String,
        /// Underlying codec error.
        #[source]
        source: CodecError,
    },

    /// A kind that must never appear in the incremental stream was found there.
    #[error("invariant violation: {message}")]
    InvariantViolation {
        /// Description of the violation.
        message: String,
    },

    /// Adds the log index of the entry that failed.
    #[error("error decoding entry index={index}: {source}")]
    Entry {
        /// Log index of the failing entry.
        index: u64,
        /// The underlying failure.
        #[source]
        source: Box<CoreError>,
    },

    /// Segment file is corrupted or not a segment.
    #[error("segment corruption: {message}")]
    SegmentCorruption {
        /// Description of the corruption.
        message: String,
    },

    /// Frame checksum mismatch.
    #[error("checksum mismatch in {segment} at offset {offset}: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        /// Segment file name.
        segment: String,
        /// Byte offset of the frame.
        offset: u64,
        /// Stored checksum.
        expected: u32,
        /// Computed checksum.
        actual: u32,
    },

    /// Invalid dump configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },
}

impl CoreError {
    /// Creates a malformed record error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            message: message.into(),
        }
    }

    /// Creates an invariant violation error.
    pub fn invariant_violation(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Creates a segment corruption error.
    pub fn segment_corruption(message: impl Into<String>) -> Self {
        Self::SegmentCorruption {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Wraps this error with the log index of the entry being processed.
    #[must_use]
    pub fn at_index(self, index: u64) -> Self {
        Self::Entry {
            index,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, looking through index context.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Entry { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_context_is_displayed_and_unwrapped() {
        let err = CoreError::malformed("empty payload").at_index(42);
        assert_eq!(
            err.to_string(),
            "error decoding entry index=42: malformed record: empty payload"
        );
        assert!(matches!(err.root(), CoreError::MalformedRecord { .. }));
    }

    #[test]
    fn unsupported_codec_names_segment() {
        let err = CoreError::UnsupportedCodec {
            codec: 7,
            segment: "00000000000000000001-0000000000000001.wal".into(),
        };
        assert!(err
            .to_string()
            .contains("00000000000000000001-0000000000000001.wal"));
    }
}
