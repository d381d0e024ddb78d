//! # waldump storage
//!
//! Byte store backends underneath the segment reader.
//!
//! Backends are **opaque byte stores**: they hand out byte ranges and know
//! nothing about segment headers, frames or log entries. The segment layer in
//! `waldump_core` owns all format interpretation.
//!
//! ## Available Backends
//!
//! - [`FileBackend`] - A segment file on disk, opened read-only for dumping
//!   or writable for building fixtures
//! - [`InMemoryBackend`] - For tests
//!
//! ## Example
//!
//! ```rust
//! use waldump_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! let offset = backend.append(b"frame").unwrap();
//! assert_eq!(backend.read_at(offset, 5).unwrap(), b"frame");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
