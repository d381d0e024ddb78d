//! Message type registry.
//!
//! Maps every type code this build understands to a decode strategy and a
//! target shape. The set is closed but the failure mode is open: a code that
//! is not registered resolves to a synthetic pass-through entry, so a log
//! written by a newer or differently licensed server still dumps.

use crate::message_type::{strip_flags, unknown_name, MessageType};
use crate::operation::*;
use crate::error::{CoreError, CoreResult};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use waldump_codec::{CodecResult, PayloadFormat, SelfDescribing, Structured};

/// Decodes a payload body (discriminator already stripped) into its shape.
pub type DecodeFn = fn(&[u8]) -> CodecResult<OperationValue>;

/// How a registered kind is turned into an [`OperationValue`].
#[derive(Clone, Copy)]
pub enum Strategy {
    /// Nothing to decode; the kind name is the whole operation.
    PassThrough,
    /// Positional binary decode into the target shape.
    Structured(DecodeFn),
    /// Self-describing decode into the target shape.
    SelfDescribing(DecodeFn),
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PassThrough => "PassThrough",
            Self::Structured(_) => "Structured",
            Self::SelfDescribing(_) => "SelfDescribing",
        })
    }
}

/// Whether a kind may legitimately appear in the incremental log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Normal log entry.
    Live,
    /// Only valid inside a state snapshot.
    SnapshotOnly,
    /// No longer produced or readable.
    Removed {
        /// Version the kind was removed in.
        since: &'static str,
    },
    /// Known kind that this build cannot decode (enterprise only).
    Unsupported,
    /// Code not registered at all.
    Unknown,
}

/// One registered message kind.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    /// Type code with the flag bit cleared.
    pub code: u8,
    /// Name printed in output.
    pub kind: Cow<'static, str>,
    /// Decode strategy.
    pub strategy: Strategy,
    /// Where the kind may appear.
    pub status: EntryStatus,
}

impl RegistryEntry {
    fn new(t: MessageType, strategy: Strategy, status: EntryStatus) -> Self {
        Self {
            code: t.as_byte(),
            kind: Cow::Borrowed(t.name()),
            strategy,
            status,
        }
    }

    /// A live kind decoded positionally.
    #[must_use]
    pub fn structured(t: MessageType, decode: DecodeFn) -> Self {
        Self::new(t, Strategy::Structured(decode), EntryStatus::Live)
    }

    /// A live kind decoded from a self-describing payload.
    #[must_use]
    pub fn self_describing(t: MessageType, decode: DecodeFn) -> Self {
        Self::new(t, Strategy::SelfDescribing(decode), EntryStatus::Live)
    }

    /// A live kind with no payload worth decoding, printed as `kind`.
    #[must_use]
    pub fn marker(t: MessageType, kind: &'static str) -> Self {
        Self {
            kind: Cow::Borrowed(kind),
            ..Self::new(t, Strategy::PassThrough, EntryStatus::Live)
        }
    }

    /// A kind that must only appear inside snapshots.
    #[must_use]
    pub fn snapshot_only(t: MessageType) -> Self {
        Self::new(t, Strategy::PassThrough, EntryStatus::SnapshotOnly)
    }

    /// A kind removed in version `since`.
    #[must_use]
    pub fn removed(t: MessageType, since: &'static str) -> Self {
        Self::new(t, Strategy::PassThrough, EntryStatus::Removed { since })
    }

    /// A known kind this build cannot decode.
    #[must_use]
    pub fn unsupported(t: MessageType) -> Self {
        Self::new(t, Strategy::PassThrough, EntryStatus::Unsupported)
    }

    /// The synthetic entry for an unregistered code.
    #[must_use]
    pub fn unknown(code: u8) -> Self {
        Self {
            code,
            kind: Cow::Owned(unknown_name(code)),
            strategy: Strategy::PassThrough,
            status: EntryStatus::Unknown,
        }
    }

    /// True if the kind must only appear inside snapshots.
    #[must_use]
    pub fn is_snapshot_only(&self) -> bool {
        self.status == EntryStatus::SnapshotOnly
    }

    /// True if the kind is visible but opaque to this build.
    #[must_use]
    pub fn is_known_unsupported(&self) -> bool {
        matches!(self.status, EntryStatus::Unsupported | EntryStatus::Unknown)
    }
}

fn structured<T>(body: &[u8]) -> CodecResult<OperationValue>
where
    T: DeserializeOwned + Into<OperationValue>,
{
    Structured::decode::<T>(body).map(Into::into)
}

fn self_describing<T>(body: &[u8]) -> CodecResult<OperationValue>
where
    T: DeserializeOwned + Into<OperationValue>,
{
    SelfDescribing::decode::<T>(body).map(Into::into)
}

/// Immutable lookup from type code to [`RegistryEntry`].
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    entries: BTreeMap<u8, RegistryEntry>,
}

impl TypeRegistry {
    /// Creates an empty registry. Every code resolves as unknown.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the registry of every kind this build knows.
    #[must_use]
    pub fn standard() -> Self {
        use MessageType as T;
        use RegistryEntry as E;

        let table = [
            E::structured(T::Register, structured::<RegisterRequest>),
            E::structured(T::Deregister, structured::<DeregisterRequest>),
            E::structured(T::Kvs, structured::<KvsRequest>),
            E::structured(T::Session, structured::<SessionRequest>),
            E::removed(T::DeprecatedAcl, "1.15"),
            E::structured(T::Tombstone, structured::<TombstoneRequest>),
            E::structured(T::CoordinateBatchUpdate, structured::<CoordinateBatch>),
            E::structured(T::PreparedQuery, structured::<PreparedQueryRequest>),
            E::structured(T::Txn, structured::<TxnRequest>),
            E::structured(T::Autopilot, structured::<AutopilotSetConfigRequest>),
            E::unsupported(T::Area),
            E::structured(T::AclBootstrap, structured::<AclBootstrapRequest>),
            E::structured(T::Intention, structured::<IntentionRequest>),
            E::structured(T::ConnectCa, structured::<CaRequest>),
            E::snapshot_only(T::ConnectCaProviderState),
            E::snapshot_only(T::ConnectCaConfig),
            E::snapshot_only(T::Index),
            E::structured(T::AclTokenSet, structured::<AclTokenBatchSetRequest>),
            E::structured(T::AclTokenDelete, structured::<AclTokenBatchDeleteRequest>),
            E::structured(T::AclPolicySet, structured::<AclPolicyBatchSetRequest>),
            E::structured(T::AclPolicyDelete, structured::<AclPolicyBatchDeleteRequest>),
            E::structured(T::ConnectCaLeaf, structured::<CaLeafRequest>),
            E::structured(T::ConfigEntry, structured::<ConfigEntryRequest>),
            E::structured(T::AclRoleSet, structured::<AclRoleBatchSetRequest>),
            E::structured(T::AclRoleDelete, structured::<AclRoleBatchDeleteRequest>),
            E::structured(T::AclBindingRuleSet, structured::<AclBindingRuleBatchSetRequest>),
            E::structured(
                T::AclBindingRuleDelete,
                structured::<AclBindingRuleBatchDeleteRequest>,
            ),
            E::structured(T::AclAuthMethodSet, structured::<AclAuthMethodBatchSetRequest>),
            E::structured(
                T::AclAuthMethodDelete,
                structured::<AclAuthMethodBatchDeleteRequest>,
            ),
            E::snapshot_only(T::ChunkingState),
            E::structured(T::FederationState, structured::<FederationStateRequest>),
            E::structured(T::SystemMetadata, structured::<SystemMetadataRequest>),
            E::snapshot_only(T::ServiceVirtualIp),
            E::snapshot_only(T::FreeVirtualIp),
            E::snapshot_only(T::KindServiceNames),
            E::self_describing(T::PeeringWrite, self_describing::<PeeringWriteRequest>),
            E::self_describing(T::PeeringDelete, self_describing::<PeeringDeleteRequest>),
            E::self_describing(
                T::PeeringTrustBundleWrite,
                self_describing::<PeeringTrustBundleWriteRequest>,
            ),
            E::self_describing(
                T::PeeringTrustBundleDelete,
                self_describing::<PeeringTrustBundleDeleteRequest>,
            ),
            E::self_describing(T::PeeringSecretsWrite, self_describing::<SecretsWriteRequest>),
            E::marker(T::LogVerifierCheckpoint, "log verifier checkpoint"),
        ];

        Self {
            entries: table.into_iter().map(|e| (e.code, e)).collect(),
        }
    }

    /// Adds an entry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if the code is already registered.
    pub fn register(&mut self, entry: RegistryEntry) -> CoreResult<()> {
        let code = strip_flags(entry.code);
        if self.entries.contains_key(&code) {
            return Err(CoreError::invalid_config(format!(
                "message type {code} registered twice"
            )));
        }
        self.entries.insert(code, RegistryEntry { code, ..entry });
        Ok(())
    }

    /// Resolves a raw type byte. Never fails.
    ///
    /// The ignore-unknown flag bit is cleared before lookup.
    #[must_use]
    pub fn resolve(&self, raw: u8) -> Cow<'_, RegistryEntry> {
        let code = strip_flags(raw);
        match self.entries.get(&code) {
            Some(entry) => Cow::Borrowed(entry),
            None => Cow::Owned(RegistryEntry::unknown(code)),
        }
    }

    /// Number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered entries in code order.
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }
}
