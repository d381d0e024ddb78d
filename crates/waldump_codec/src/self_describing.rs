//! Self-describing payloads.

use crate::error::{CodecError, CodecResult};
use crate::PayloadFormat;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// CBOR serialization backed by ciborium.
///
/// Struct fields are written as map entries keyed by name, so decoding
/// tolerates unknown fields and missing fields that carry `#[serde(default)]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfDescribing;

impl PayloadFormat for SelfDescribing {
    const NAME: &'static str = "self-describing";

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
        ciborium::from_reader(bytes).map_err(|e| CodecError::decoding_failed(Self::NAME, e.to_string()))
    }

    fn encode<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| CodecError::encoding_failed(Self::NAME, e.to_string()))?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Bundle {
        trust_domain: String,
        root_pems: Vec<String>,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct BundleV2 {
        trust_domain: String,
        #[serde(default)]
        exported_partition: String,
    }

    #[test]
    fn decodes_with_unknown_and_missing_fields() {
        let bytes = SelfDescribing::encode(&Bundle {
            trust_domain: "peer.consul".into(),
            root_pems: vec!["pem".into()],
        })
        .unwrap();

        let decoded: BundleV2 = SelfDescribing::decode(&bytes).unwrap();
        assert_eq!(decoded.trust_domain, "peer.consul");
        assert!(decoded.exported_partition.is_empty());
    }

    #[test]
    fn garbage_fails() {
        let err = SelfDescribing::decode::<Bundle>(&[0xff, 0x00, 0x13]).unwrap_err();
        assert!(err.to_string().starts_with("self-describing decoding failed"));
    }
}
