//! Replication log envelope.
//!
//! Every frame payload in a segment is one replication log entry. The envelope
//! carries the replication-level metadata and wraps the application payload:
//!
//! ```text
//! | version (1) | index (8) | term (8) | type (1) | data_len (4) | data (N) | ext_len (4) | extensions (M) | appended_at (8) |
//! ```
//!
//! Integers are little endian, `appended_at` is signed unix nanoseconds.
//! Only [`LogType::Command`] entries carry application operations; every
//! other type is replication bookkeeping.

use crate::error::{CoreError, CoreResult};
use crate::timestamp::{from_unix_nanos, to_unix_nanos};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::fmt;

/// Current envelope format version.
pub const ENVELOPE_VERSION: u8 = 1;

/// Replication-level entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogType {
    /// Application command; the payload is a message for the state machine.
    Command,
    /// Leader no-op written on election.
    Noop,
    /// Legacy peer addition.
    AddPeerDeprecated,
    /// Legacy peer removal.
    RemovePeerDeprecated,
    /// Barrier entry.
    Barrier,
    /// Cluster membership configuration.
    Configuration,
    /// A type this build does not name.
    Other(u8),
}

impl LogType {
    /// Converts a byte to a log type.
    #[must_use]
    pub const fn from_byte(b: u8) -> Self {
        match b {
            0 => Self::Command,
            1 => Self::Noop,
            2 => Self::AddPeerDeprecated,
            3 => Self::RemovePeerDeprecated,
            4 => Self::Barrier,
            5 => Self::Configuration,
            other => Self::Other(other),
        }
    }

    /// Converts the log type to a byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Command => 0,
            Self::Noop => 1,
            Self::AddPeerDeprecated => 2,
            Self::RemovePeerDeprecated => 3,
            Self::Barrier => 4,
            Self::Configuration => 5,
            Self::Other(b) => b,
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_byte())
    }
}

/// A decoded replication log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEnvelope {
    /// Log index as recorded by the replication layer.
    pub index: u64,
    /// Election term the entry was written in.
    pub term: u64,
    /// Entry type.
    pub log_type: LogType,
    /// Application payload. For commands, the first byte is the message type.
    pub data: Bytes,
    /// Opaque replication extensions.
    pub extensions: Bytes,
    /// When the leader appended the entry.
    pub appended_at: DateTime<Utc>,
}

impl LogEnvelope {
    /// Fixed bytes outside the two variable-length fields.
    const FIXED_SIZE: usize = 1 + 8 + 8 + 1 + 4 + 4 + 8;

    /// Creates a command entry.
    #[must_use]
    pub fn command(index: u64, term: u64, data: impl Into<Bytes>, appended_at: DateTime<Utc>) -> Self {
        Self {
            index,
            term,
            log_type: LogType::Command,
            data: data.into(),
            extensions: Bytes::new(),
            appended_at,
        }
    }

    /// Serializes the envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable field exceeds 4 GiB or the timestamp is out of range.
    pub fn encode(&self) -> CoreResult<Vec<u8>> {
        let data_len = u32::try_from(self.data.len())
            .map_err(|_| CoreError::malformed("envelope data exceeds 4 GiB"))?;
        let ext_len = u32::try_from(self.extensions.len())
            .map_err(|_| CoreError::malformed("envelope extensions exceed 4 GiB"))?;

        let mut buf =
            Vec::with_capacity(Self::FIXED_SIZE + self.data.len() + self.extensions.len());
        buf.push(ENVELOPE_VERSION);
        buf.extend_from_slice(&self.index.to_le_bytes());
        buf.extend_from_slice(&self.term.to_le_bytes());
        buf.push(self.log_type.as_byte());
        buf.extend_from_slice(&data_len.to_le_bytes());
        buf.extend_from_slice(&self.data);
        buf.extend_from_slice(&ext_len.to_le_bytes());
        buf.extend_from_slice(&self.extensions);
        buf.extend_from_slice(&to_unix_nanos(&self.appended_at)?.to_le_bytes());
        Ok(buf)
    }

    /// Parses an envelope. `data` and `extensions` share `bytes`' allocation.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedRecord`] on an unknown version, a short
    /// buffer or trailing bytes.
    pub fn decode(bytes: &Bytes) -> CoreResult<Self> {
        let mut cursor = Cursor { bytes, pos: 0 };

        let version = cursor.u8()?;
        if version != ENVELOPE_VERSION {
            return Err(CoreError::malformed(format!(
                "unsupported envelope version {version}"
            )));
        }
        let index = cursor.u64()?;
        let term = cursor.u64()?;
        let log_type = LogType::from_byte(cursor.u8()?);
        let data = cursor.sized()?;
        let extensions = cursor.sized()?;
        let appended_at = from_unix_nanos(cursor.u64()? as i64);

        if cursor.pos != bytes.len() {
            return Err(CoreError::malformed(format!(
                "{} trailing bytes after envelope",
                bytes.len() - cursor.pos
            )));
        }

        Ok(Self {
            index,
            term,
            log_type,
            data,
            extensions,
            appended_at,
        })
    }
}

struct Cursor<'a> {
    bytes: &'a Bytes,
    pos: usize,
}

impl Cursor<'_> {
    fn take(&mut self, n: usize) -> CoreResult<&[u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| CoreError::malformed("unexpected end of envelope"))?;
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn u8(&mut self) -> CoreResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> CoreResult<u32> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(raw))
    }

    fn u64(&mut self) -> CoreResult<u64> {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(raw))
    }

    fn sized(&mut self) -> CoreResult<Bytes> {
        let len = self.u32()? as usize;
        let start = self.pos;
        self.take(len)?;
        Ok(self.bytes.slice(start..start + len))
    }
}
