//! Record decoder.
//!
//! Turns one command payload (type byte followed by the encoded message) into
//! an [`Operation`]. Stateless beyond its registry, so decoding the same bytes
//! twice always gives the same result.

use crate::error::{CoreError, CoreResult};
use crate::operation::Operation;
use crate::registry::{EntryStatus, Strategy, TypeRegistry};

/// Decodes command payloads using a [`TypeRegistry`].
#[derive(Debug, Clone)]
pub struct Decoder {
    registry: TypeRegistry,
}

impl Decoder {
    /// Creates a decoder over the standard registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::standard())
    }

    /// Creates a decoder over a custom registry.
    #[must_use]
    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self { registry }
    }

    /// Returns the registry in use.
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Decodes a single command payload.
    ///
    /// # Errors
    ///
    /// - [`CoreError::MalformedRecord`] if the payload is empty
    /// - [`CoreError::InvariantViolation`] for snapshot-only or removed kinds
    /// - [`CoreError::DecodeFailure`] if the body does not parse into its shape
    pub fn decode(&self, payload: &[u8]) -> CoreResult<Operation> {
        let Some((&raw, body)) = payload.split_first() else {
            return Err(CoreError::malformed(
                "payload has no message type discriminator",
            ));
        };

        let entry = self.registry.resolve(raw);
        match entry.status {
            EntryStatus::SnapshotOnly => {
                return Err(CoreError::invariant_violation(format!(
                    "{} should only exist in snapshots",
                    entry.kind
                )));
            }
            EntryStatus::Removed { since } => {
                return Err(CoreError::invariant_violation(format!(
                    "legacy {} request type removed since {since}",
                    entry.kind
                )));
            }
            EntryStatus::Unknown => {
                tracing::debug!(code = entry.code, raw, "unknown message type, emitting type only");
            }
            EntryStatus::Live | EntryStatus::Unsupported => {}
        }

        let value = match entry.strategy {
            Strategy::PassThrough => None,
            Strategy::Structured(decode) | Strategy::SelfDescribing(decode) => {
                let value = decode(body).map_err(|source| CoreError::DecodeFailure {
                    kind: entry.kind.to_string(),
                    source,
                })?;
                Some(value)
            }
        };

        Ok(Operation {
            kind: entry.into_owned().kind.into_owned(),
            value,
        })
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message_type::{MessageType, IGNORE_UNKNOWN_TYPE_FLAG};
    use crate::operation::*;
    use proptest::prelude::*;
    use serde::Serialize;
    use waldump_codec::{PayloadFormat, SelfDescribing, Structured};

    fn payload<F: PayloadFormat, T: Serialize>(t: MessageType, msg: &T) -> Vec<u8> {
        let mut out = vec![t.as_byte()];
        out.extend(F::encode(msg).unwrap());
        out
    }

    fn kvs() -> KvsRequest {
        KvsRequest {
            datacenter: "dc1".into(),
            op: "set".into(),
            dir_ent: DirEntry {
                key: "foo".into(),
                value: b"bar".to_vec(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn decodes_structured_kind() {
        let op = Decoder::new()
            .decode(&payload::<Structured, _>(MessageType::Kvs, &kvs()))
            .unwrap();
        assert_eq!(op, Operation::new("KVS", kvs()));
    }

    #[test]
    fn acl_bootstrap_has_its_own_shape() {
        let req = AclBootstrapRequest {
            token: AclToken::default(),
            reset_index: 42,
        };
        let op = Decoder::new()
            .decode(&payload::<Structured, _>(MessageType::AclBootstrap, &req))
            .unwrap();
        assert_eq!(op, Operation::new("ACLBootstrap", req));
    }

    #[test]
    fn decodes_self_describing_kind() {
        let req = PeeringDeleteRequest {
            name: "east".into(),
            partition: "default".into(),
        };
        let op = Decoder::new()
            .decode(&payload::<SelfDescribing, _>(MessageType::PeeringDelete, &req))
            .unwrap();
        assert_eq!(op, Operation::new("PeeringDelete", req));
    }

    #[test]
    fn ignore_unknown_flag_is_masked() {
        let mut bytes = payload::<Structured, _>(MessageType::Kvs, &kvs());
        bytes[0] |= IGNORE_UNKNOWN_TYPE_FLAG;
        let op = Decoder::new().decode(&bytes).unwrap();
        assert_eq!(op.kind, "KVS");
    }

    #[test]
    fn empty_payload_is_malformed() {
        let err = Decoder::new().decode(&[]).unwrap_err();
        assert!(matches!(err, CoreError::MalformedRecord { .. }));
    }

    #[test]
    fn snapshot_only_kinds_are_rejected() {
        let decoder = Decoder::new();
        for t in [
            MessageType::ConnectCaProviderState,
            MessageType::ConnectCaConfig,
            MessageType::Index,
            MessageType::ChunkingState,
            MessageType::ServiceVirtualIp,
            MessageType::FreeVirtualIp,
            MessageType::KindServiceNames,
        ] {
            let err = decoder.decode(&[t.as_byte(), 0, 1, 2]).unwrap_err();
            match err {
                CoreError::InvariantViolation { message } => {
                    assert_eq!(message, format!("{} should only exist in snapshots", t.name()));
                }
                other => panic!("unexpected error for {t}: {other}"),
            }
        }
    }

    #[test]
    fn removed_kind_names_its_removal() {
        let err = Decoder::new()
            .decode(&[MessageType::DeprecatedAcl.as_byte(), 0xff])
            .unwrap_err();
        assert!(matches!(err, CoreError::InvariantViolation { .. }));
        assert!(err.to_string().contains("removed since 1.15"));
    }

    #[test]
    fn pass_through_kinds_have_no_value() {
        let decoder = Decoder::new();
        let area = decoder.decode(&[MessageType::Area.as_byte(), 9, 9]).unwrap();
        assert_eq!(area, Operation::kind_only("Area"));
        let checkpoint = decoder
            .decode(&[MessageType::LogVerifierCheckpoint.as_byte()])
            .unwrap();
        assert_eq!(checkpoint, Operation::kind_only("log verifier checkpoint"));
    }

    #[test]
    fn unknown_kind_is_not_an_error() {
        let op = Decoder::new().decode(&[99, 1, 2, 3]).unwrap();
        assert_eq!(op, Operation::kind_only("Unknown(99)"));
    }

    #[test]
    fn garbage_body_is_decode_failure() {
        let err = Decoder::new()
            .decode(&[MessageType::Kvs.as_byte(), 0xff, 0xff, 0xff, 0xff, 0xff])
            .unwrap_err();
        match err {
            CoreError::DecodeFailure { kind, .. } => assert_eq!(kind, "KVS"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn custom_registry_sees_only_its_entries() {
        let decoder = Decoder::with_registry(TypeRegistry::empty());
        let op = decoder
            .decode(&payload::<Structured, _>(MessageType::Kvs, &kvs()))
            .unwrap();
        assert_eq!(op, Operation::kind_only("Unknown(2)"));
    }

    proptest! {
        #[test]
        fn decoding_is_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let decoder = Decoder::new();
            let first = decoder.decode(&bytes).map_err(|e| e.to_string());
            let second = decoder.decode(&bytes).map_err(|e| e.to_string());
            prop_assert_eq!(first, second);
        }
    }
}
