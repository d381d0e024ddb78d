//! Decoded operations and the message shapes they carry.

mod acl;
mod catalog;
mod connect;
mod peering;

pub use acl::*;
pub use catalog::*;
pub use connect::*;
pub use peering::*;

use crate::summarize::{KvSummary, RegisterSummary};
use serde::Serialize;

/// One decoded command, as handed to the output boundary.
///
/// `value` is absent for kinds that carry nothing this build can decode:
/// markers, enterprise-only messages and unknown codes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    /// Human-readable message kind.
    #[serde(rename = "Type")]
    pub kind: String,
    /// Decoded payload.
    #[serde(rename = "Value", skip_serializing_if = "Option::is_none")]
    pub value: Option<OperationValue>,
}

impl Operation {
    /// Creates an operation with no payload.
    #[must_use]
    pub fn kind_only(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
        }
    }

    /// Creates an operation with a decoded payload.
    #[must_use]
    pub fn new(kind: impl Into<String>, value: impl Into<OperationValue>) -> Self {
        Self {
            kind: kind.into(),
            value: Some(value.into()),
        }
    }
}

macro_rules! operation_values {
    ($($variant:ident($shape:ty),)+) => {
        /// Every payload shape an [`Operation`] can carry.
        ///
        /// Serialized untagged: the output shows the shape's own fields and the
        /// enclosing [`Operation::kind`] says which shape it is.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum OperationValue {
            $(
                #[doc = concat!("A `", stringify!($shape), "`.")]
                $variant($shape),
            )+
        }

        $(
            impl From<$shape> for OperationValue {
                fn from(value: $shape) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

operation_values! {
    Register(RegisterRequest),
    Deregister(DeregisterRequest),
    Kvs(KvsRequest),
    Session(SessionRequest),
    Tombstone(TombstoneRequest),
    Coordinates(CoordinateBatch),
    PreparedQuery(PreparedQueryRequest),
    Txn(TxnRequest),
    Autopilot(AutopilotSetConfigRequest),
    AclBootstrap(AclBootstrapRequest),
    Intention(IntentionRequest),
    ConnectCa(CaRequest),
    AclTokenSet(AclTokenBatchSetRequest),
    AclTokenDelete(AclTokenBatchDeleteRequest),
    AclPolicySet(AclPolicyBatchSetRequest),
    AclPolicyDelete(AclPolicyBatchDeleteRequest),
    ConnectCaLeaf(CaLeafRequest),
    ConfigEntry(ConfigEntryRequest),
    AclRoleSet(AclRoleBatchSetRequest),
    AclRoleDelete(AclRoleBatchDeleteRequest),
    AclBindingRuleSet(AclBindingRuleBatchSetRequest),
    AclBindingRuleDelete(AclBindingRuleBatchDeleteRequest),
    AclAuthMethodSet(AclAuthMethodBatchSetRequest),
    AclAuthMethodDelete(AclAuthMethodBatchDeleteRequest),
    FederationState(FederationStateRequest),
    SystemMetadata(SystemMetadataRequest),
    PeeringWrite(PeeringWriteRequest),
    PeeringDelete(PeeringDeleteRequest),
    PeeringTrustBundleWrite(PeeringTrustBundleWriteRequest),
    PeeringTrustBundleDelete(PeeringTrustBundleDeleteRequest),
    PeeringSecretsWrite(SecretsWriteRequest),
    KvSummary(KvSummary),
    RegisterSummary(RegisterSummary),
}
