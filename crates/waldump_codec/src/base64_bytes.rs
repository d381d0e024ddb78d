//! Serde adapter for byte fields.
//!
//! Human-readable formats (JSON output) see a base64 string; binary formats
//! see a native byte string. Use with `#[serde(with = "waldump_codec::base64_bytes")]`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;

/// Serialize a byte field.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    if serializer.is_human_readable() {
        serializer.serialize_str(&STANDARD.encode(bytes))
    } else {
        serializer.serialize_bytes(bytes)
    }
}

/// Deserialize a byte field.
///
/// # Errors
///
/// Fails on invalid base64 or a non-byte input.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    if deserializer.is_human_readable() {
        deserializer.deserialize_str(Base64Visitor)
    } else {
        deserializer.deserialize_byte_buf(BytesVisitor)
    }
}

struct Base64Visitor;

impl Visitor<'_> for Base64Visitor {
    type Value = Vec<u8>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a base64 string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        STANDARD.decode(v).map_err(E::custom)
    }
}

struct BytesVisitor;

impl<'de> Visitor<'de> for BytesVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a byte string")
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(v.to_vec())
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(b) = seq.next_element::<u8>()? {
            out.push(b);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::{PayloadFormat, SelfDescribing, Structured};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Blob {
        #[serde(with = "crate::base64_bytes")]
        value: Vec<u8>,
    }

    #[test]
    fn json_sees_base64() {
        let json = serde_json::to_string(&Blob { value: b"hi".to_vec() }).unwrap();
        assert_eq!(json, r#"{"value":"aGk="}"#);
        let back: Blob = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value, b"hi");
    }

    #[test]
    fn binary_formats_see_raw_bytes() {
        let blob = Blob {
            value: vec![0, 1, 2, 255],
        };
        let structured = Structured::encode(&blob).unwrap();
        assert_eq!(structured, vec![4, 0, 1, 2, 255]);
        assert_eq!(Structured::decode::<Blob>(&structured).unwrap(), blob);

        let cbor = SelfDescribing::encode(&blob).unwrap();
        assert_eq!(SelfDescribing::decode::<Blob>(&cbor).unwrap(), blob);
    }
}
