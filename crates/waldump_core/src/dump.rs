//! Dump pipeline: stored record in, output record out.

use crate::decoder::Decoder;
use crate::envelope::{LogEnvelope, LogType};
use crate::error::{CoreError, CoreResult};
use crate::operation::Operation;
use crate::segment::{SegmentInfo, StoredRecord, CODEC_BINARY_V1};
use crate::summarize::summarize;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The `Op` field of a [`DumpRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DumpOp {
    /// A decoded application command.
    Operation(Operation),
    /// Description of a replication-internal entry.
    Internal(String),
}

impl DumpOp {
    fn internal(log_type: LogType) -> Self {
        Self::Internal(format!("internal log type {log_type}"))
    }
}

/// One line of dump output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DumpRecord {
    /// Log index.
    pub index: u64,
    /// What the entry does.
    pub op: DumpOp,
    /// When the leader appended the entry.
    pub appended_at: DateTime<Utc>,
}

/// Turns stored records into [`DumpRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct Dumper {
    decoder: Decoder,
    summarize: bool,
}

impl Dumper {
    /// Creates a dumper over the standard registry.
    #[must_use]
    pub fn new(summarize: bool) -> Self {
        Self::with_decoder(Decoder::new(), summarize)
    }

    /// Creates a dumper using `decoder`.
    #[must_use]
    pub fn with_decoder(decoder: Decoder, summarize: bool) -> Self {
        Self { decoder, summarize }
    }

    /// Decodes one stored record.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedCodec`] if the segment codec is not
    /// understood, otherwise any envelope or decoder error. Every error is
    /// wrapped with the record index.
    pub fn dump_entry(&self, info: &SegmentInfo, record: &StoredRecord) -> CoreResult<DumpRecord> {
        if info.codec != CODEC_BINARY_V1 {
            return Err(CoreError::UnsupportedCodec {
                codec: info.codec,
                segment: info.file_name(),
            });
        }
        self.decode_entry(record)
            .map_err(|e| e.at_index(record.index))
    }

    fn decode_entry(&self, record: &StoredRecord) -> CoreResult<DumpRecord> {
        let envelope = LogEnvelope::decode(&record.data)?;
        if envelope.index != record.index {
            tracing::warn!(
                stored = record.index,
                envelope = envelope.index,
                "envelope index differs from stored index"
            );
        }

        let op = match envelope.log_type {
            LogType::Command => {
                let op = self.decoder.decode(&envelope.data)?;
                DumpOp::Operation(if self.summarize { summarize(op) } else { op })
            }
            other => DumpOp::internal(other),
        };

        Ok(DumpRecord {
            index: record.index,
            op,
            appended_at: envelope.appended_at,
        })
    }
}
