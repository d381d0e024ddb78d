//! # waldump core
//!
//! Reads Raft write-ahead log segments and turns each entry into a
//! human-readable operation.
//!
//! This crate provides:
//! - Segment files: listing, header checks, checksummed frame reads
//! - The replication envelope around each entry
//! - A type registry and record decoder for command payloads
//! - Range scans with exclusive bounds, and a follow controller
//! - A compact summary projection of decoded operations
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use waldump_core::{Bound, Dumper, RangeScanner, ScanCursor, SegmentFiler};
//!
//! let filer = SegmentFiler::open(Path::new("/var/lib/consul/raft/wal"))?;
//! let scanner = RangeScanner::new(filer);
//! let dumper = Dumper::new(false);
//! let mut cursor = ScanCursor::default();
//! scanner.scan(Bound::default(), &mut cursor, |info, record| {
//!     let out = dumper.dump_entry(info, &record)?;
//!     println!("{}", out.index);
//!     Ok(true)
//! })?;
//! # Ok::<(), waldump_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod decoder;
mod dump;
pub mod envelope;
mod error;
pub mod message_type;
pub mod operation;
pub mod registry;
pub mod scan;
pub mod segment;
mod summarize;
pub mod tail;
mod timestamp;

pub use config::DumpConfig;
pub use decoder::Decoder;
pub use dump::{DumpOp, DumpRecord, Dumper};
pub use envelope::{LogEnvelope, LogType};
pub use error::{CoreError, CoreResult};
pub use message_type::MessageType;
pub use operation::{Operation, OperationValue};
pub use registry::TypeRegistry;
pub use scan::{Bound, MemoryRecordSource, RangeScanner, RecordSource, ScanCursor, ScanOutcome};
pub use segment::{SegmentFiler, SegmentInfo, SegmentReader, SegmentWriter, StoredRecord};
pub use summarize::{summarize, KvSummary, RegisterSummary};
pub use tail::{CancelToken, TailController};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
