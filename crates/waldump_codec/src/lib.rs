//! # waldump codec
//!
//! The two payload serialization formats found inside command log entries.
//!
//! - [`Structured`] - positional binary serialization (postcard). The bytes
//!   carry no field names; the target shape drives the decode, so the
//!   shape definition must be known at decode time.
//! - [`SelfDescribing`] - CBOR. Field names travel with the data and the
//!   target shape only selects which ones to keep.
//!
//! Both are exposed through the [`PayloadFormat`] capability so callers can
//! pick a format at runtime and decode any `serde` shape with it.
//!
//! ## Usage
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use waldump_codec::{PayloadFormat, Structured};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Entry {
//!     key: String,
//!     flags: u64,
//! }
//!
//! let entry = Entry { key: "service/web".into(), flags: 3 };
//! let bytes = Structured::encode(&entry).unwrap();
//! let decoded: Entry = Structured::decode(&bytes).unwrap();
//! assert_eq!(entry, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod base64_bytes;
mod error;
mod self_describing;
mod structured;

pub use error::{CodecError, CodecResult};
pub use self_describing::SelfDescribing;
pub use structured::Structured;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A payload serialization format.
pub trait PayloadFormat {
    /// Short name used in error messages.
    const NAME: &'static str;

    /// Decode `bytes` into a fresh `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::DecodingFailed`] if the bytes do not describe a `T`.
    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T>;

    /// Encode `value` into a new buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EncodingFailed`] if `value` cannot be represented.
    fn encode<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>>;
}
