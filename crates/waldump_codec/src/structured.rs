//! Positional binary payloads.

use crate::error::{CodecError, CodecResult};
use crate::PayloadFormat;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Positional binary serialization backed by postcard.
///
/// Integers are varint encoded and sequences, strings and byte fields are
/// length prefixed. Field order in the target shape is significant.
#[derive(Debug, Clone, Copy, Default)]
pub struct Structured;

impl PayloadFormat for Structured {
    const NAME: &'static str = "structured";

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
        postcard::from_bytes(bytes).map_err(|e| CodecError::decoding_failed(Self::NAME, e.to_string()))
    }

    fn encode<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
        postcard::to_allocvec(value)
            .map_err(|e| CodecError::encoding_failed(Self::NAME, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Node {
        name: String,
        port: i32,
        tags: Vec<String>,
        meta: BTreeMap<String, String>,
        parent: Option<Box<Node>>,
    }

    fn sample() -> Node {
        Node {
            name: "web-1".into(),
            port: 8080,
            tags: vec!["primary".into()],
            meta: BTreeMap::from([("zone".into(), "a".into())]),
            parent: Some(Box::new(Node {
                name: "rack".into(),
                port: -1,
                tags: vec![],
                meta: BTreeMap::new(),
                parent: None,
            })),
        }
    }

    #[test]
    fn nested_shape_decodes() {
        let bytes = Structured::encode(&sample()).unwrap();
        let decoded: Node = Structured::decode(&bytes).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn truncated_input_fails() {
        let bytes = Structured::encode(&sample()).unwrap();
        let err = Structured::decode::<Node>(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::DecodingFailed {
                format: "structured",
                ..
            }
        ));
    }

    #[test]
    fn empty_input_fails_for_non_empty_shape() {
        assert!(Structured::decode::<Node>(&[]).is_err());
    }
}
