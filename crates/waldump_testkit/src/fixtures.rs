//! Test fixtures: log directories and entry builders.
//!
//! Fixtures panic on failure; they only run inside tests.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use waldump_codec::{PayloadFormat, SelfDescribing, Structured};
use waldump_core::operation::{AgentService, DirEntry, KvsRequest, RegisterRequest};
use waldump_core::registry::Strategy;
use waldump_core::segment::{SegmentId, SegmentInfo, SegmentWriter, CODEC_BINARY_V1, HEADER_SIZE};
use waldump_core::{LogEnvelope, LogType, MessageType, TypeRegistry};
use waldump_storage::FileBackend;

/// Base of the deterministic `appended_at` timestamps.
pub const FIXTURE_EPOCH_SECS: i64 = 1_700_000_000;

/// A temporary log directory, removed on drop.
pub struct TempLogDir {
    dir: TempDir,
    next_id: u64,
}

impl TempLogDir {
    /// Creates an empty log directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
            next_id: 1,
        }
    }

    /// Returns the directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes a complete segment holding `entries`, starting at `base_index`.
    pub fn write_segment(&mut self, base_index: u64, entries: &[Vec<u8>]) -> PathBuf {
        self.write_segment_with_codec(base_index, CODEC_BINARY_V1, entries)
    }

    /// Writes a complete segment whose header names `codec`.
    pub fn write_segment_with_codec(
        &mut self,
        base_index: u64,
        codec: u64,
        entries: &[Vec<u8>],
    ) -> PathBuf {
        let info = self.next_info(base_index).with_codec(codec);
        let path = self.path().join(info.file_name());
        let mut writer = SegmentWriter::create(self.path(), info).expect("Failed to create segment");
        for entry in entries {
            writer.append(entry).expect("Failed to append entry");
        }
        writer.sync().expect("Failed to sync segment");
        path
    }

    /// Creates an empty segment and hands back its writer for live appends.
    pub fn create_writer(&mut self, base_index: u64) -> SegmentWriter<FileBackend> {
        let info = self.next_info(base_index);
        SegmentWriter::create(self.path(), info).expect("Failed to create segment")
    }

    fn next_info(&mut self, base_index: u64) -> SegmentInfo {
        let id = SegmentId::new(self.next_id);
        self.next_id += 1;
        SegmentInfo::new(id, base_index, appended_at(base_index))
    }
}

impl Default for TempLogDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Flips one payload byte of the first frame in a segment file.
pub fn corrupt_first_frame(path: &Path) {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .expect("Failed to open segment");
    let offset = HEADER_SIZE as u64 + 4;
    let mut byte = [0u8; 1];
    file.seek(SeekFrom::Start(offset)).expect("seek");
    file.read_exact(&mut byte).expect("read");
    byte[0] ^= 0xff;
    file.seek(SeekFrom::Start(offset)).expect("seek");
    file.write_all(&byte).expect("write");
}

/// Overwrites the length prefix of the `frame`th frame (zero based) in a
/// segment file.
pub fn overwrite_frame_len(path: &Path, frame: usize, len: u32) {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .expect("Failed to open segment");
    let mut offset = HEADER_SIZE as u64;
    for _ in 0..frame {
        let mut raw = [0u8; 4];
        file.seek(SeekFrom::Start(offset)).expect("seek");
        file.read_exact(&mut raw).expect("read");
        offset += 4 + u64::from(u32::from_le_bytes(raw)) + 4;
    }
    file.seek(SeekFrom::Start(offset)).expect("seek");
    file.write_all(&len.to_le_bytes()).expect("write");
}

/// Appends raw bytes to the end of a segment file.
pub fn append_raw(path: &Path, bytes: &[u8]) {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .expect("Failed to open segment");
    file.write_all(bytes).expect("write");
}

/// Deterministic append time for the entry at `index`.
pub fn appended_at(index: u64) -> DateTime<Utc> {
    Utc.timestamp_opt(FIXTURE_EPOCH_SECS + index as i64, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Encodes a command payload: type byte followed by the body in the format
/// the standard registry expects for `message_type`.
pub fn command_payload<T: Serialize>(message_type: MessageType, body: &T) -> Vec<u8> {
    let encoded = match TypeRegistry::standard()
        .resolve(message_type.as_byte())
        .strategy
    {
        Strategy::SelfDescribing(_) => SelfDescribing::encode(body),
        Strategy::Structured(_) | Strategy::PassThrough => Structured::encode(body),
    }
    .expect("Failed to encode command body");

    let mut payload = Vec::with_capacity(encoded.len() + 1);
    payload.push(message_type.as_byte());
    payload.extend(encoded);
    payload
}

/// Builds consecutive envelope-encoded log entries.
#[derive(Debug)]
pub struct LogBuilder {
    next_index: u64,
    term: u64,
    entries: Vec<Vec<u8>>,
}

impl LogBuilder {
    /// Starts a run of entries at `first_index`.
    pub fn new(first_index: u64) -> Self {
        Self {
            next_index: first_index,
            term: 1,
            entries: Vec::new(),
        }
    }

    /// Sets the term for subsequent entries.
    pub fn term(mut self, term: u64) -> Self {
        self.term = term;
        self
    }

    /// Adds a command entry encoding `body` as `message_type`.
    pub fn command<T: Serialize>(self, message_type: MessageType, body: &T) -> Self {
        self.raw_command(&command_payload(message_type, body))
    }

    /// Adds a command entry with an arbitrary payload.
    pub fn raw_command(mut self, payload: &[u8]) -> Self {
        let envelope = LogEnvelope::command(
            self.next_index,
            self.term,
            payload.to_vec(),
            appended_at(self.next_index),
        );
        self.push(envelope);
        self
    }

    /// Adds a replication-internal entry.
    pub fn internal(mut self, log_type: LogType) -> Self {
        let envelope = LogEnvelope {
            log_type,
            ..LogEnvelope::command(
                self.next_index,
                self.term,
                Vec::<u8>::new(),
                appended_at(self.next_index),
            )
        };
        self.push(envelope);
        self
    }

    /// Index the next entry will get.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Returns the encoded entries.
    pub fn build(self) -> Vec<Vec<u8>> {
        self.entries
    }

    fn push(&mut self, envelope: LogEnvelope) {
        self.entries
            .push(envelope.encode().expect("Failed to encode envelope"));
        self.next_index += 1;
    }
}

/// A key/value set request.
pub fn kv_set(key: &str, value: &[u8]) -> KvsRequest {
    KvsRequest {
        datacenter: "dc1".into(),
        op: "set".into(),
        dir_ent: DirEntry {
            key: key.into(),
            value: value.to_vec(),
            ..Default::default()
        },
    }
}

/// A node registration without a service.
pub fn register_node(node: &str, address: &str) -> RegisterRequest {
    RegisterRequest {
        datacenter: "dc1".into(),
        node: node.into(),
        address: address.into(),
        ..Default::default()
    }
}

/// A node registration carrying one service.
pub fn register_service(node: &str, address: &str, service: &str, port: i32) -> RegisterRequest {
    RegisterRequest {
        service: Some(AgentService {
            id: service.into(),
            service: service.into(),
            port,
            ..Default::default()
        }),
        ..register_node(node, address)
    }
}
