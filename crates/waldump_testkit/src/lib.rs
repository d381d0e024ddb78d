//! # waldump testkit
//!
//! Test utilities for waldump.
//!
//! This crate provides:
//! - Temporary log directories populated with real segment files
//! - Builders for replication envelopes and command payloads
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use waldump_testkit::prelude::*;
//! use waldump_core::MessageType;
//!
//! let mut log = TempLogDir::new();
//! let entries = LogBuilder::new(1)
//!     .command(MessageType::Kvs, &kv_set("foo", b"bar"))
//!     .build();
//! log.write_segment(1, &entries);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
