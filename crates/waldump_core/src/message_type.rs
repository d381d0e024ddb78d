//! Message type discriminators for command payloads.
//!
//! The first byte of every command payload names the state machine message it
//! carries. The high bit is a flag, not part of the type: writers set it on
//! message types that older readers may skip safely.

use std::fmt;

/// Flag bit marking a message type as safe to ignore when unknown.
pub const IGNORE_UNKNOWN_TYPE_FLAG: u8 = 0x80;

macro_rules! message_types {
    ($($(#[$doc:meta])* $variant:ident = $code:literal => $name:literal,)+) => {
        /// A known message type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum MessageType {
            $($(#[$doc])* $variant = $code,)+
        }

        impl MessageType {
            /// Every known message type in code order.
            pub const ALL: &'static [MessageType] = &[$(Self::$variant,)+];

            /// Converts a byte (flag bit already cleared) to a message type.
            #[must_use]
            pub const fn from_byte(b: u8) -> Option<Self> {
                match b {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Human-readable name, as printed in dump output.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }
    };
}

message_types! {
    /// Node/service/check registration.
    Register = 0 => "Register",
    /// Node/service/check removal.
    Deregister = 1 => "Deregister",
    /// Key/value store write.
    Kvs = 2 => "KVS",
    /// Session create/destroy.
    Session = 3 => "Session",
    /// Legacy ACL request, gone since 1.15.
    DeprecatedAcl = 4 => "ACL",
    /// KV tombstone reap.
    Tombstone = 5 => "Tombstone",
    /// Network coordinate batch update.
    CoordinateBatchUpdate = 6 => "CoordinateBatchUpdate",
    /// Prepared query write.
    PreparedQuery = 7 => "PreparedQuery",
    /// Multi-operation transaction.
    Txn = 8 => "Txn",
    /// Autopilot configuration.
    Autopilot = 9 => "Autopilot",
    /// Network area (enterprise only).
    Area = 10 => "Area",
    /// ACL bootstrap.
    AclBootstrap = 11 => "ACLBootstrap",
    /// Service intention write.
    Intention = 12 => "Intention",
    /// Connect CA roots/config.
    ConnectCa = 13 => "ConnectCA",
    /// CA provider state (snapshot only).
    ConnectCaProviderState = 14 => "ConnectCAProviderState",
    /// CA configuration (snapshot only).
    ConnectCaConfig = 15 => "ConnectCAConfig",
    /// Table index (snapshot only).
    Index = 16 => "Index",
    /// ACL token upsert.
    AclTokenSet = 17 => "ACLToken",
    /// ACL token delete.
    AclTokenDelete = 18 => "ACLTokenDelete",
    /// ACL policy upsert.
    AclPolicySet = 19 => "ACLPolicy",
    /// ACL policy delete.
    AclPolicyDelete = 20 => "ACLPolicyDelete",
    /// Connect leaf certificate.
    ConnectCaLeaf = 21 => "ConnectCALeaf",
    /// Config entry write.
    ConfigEntry = 22 => "ConfigEntry",
    /// ACL role upsert.
    AclRoleSet = 23 => "ACLRole",
    /// ACL role delete.
    AclRoleDelete = 24 => "ACLRoleDelete",
    /// ACL binding rule upsert.
    AclBindingRuleSet = 25 => "ACLBindingRule",
    /// ACL binding rule delete.
    AclBindingRuleDelete = 26 => "ACLBindingRuleDelete",
    /// ACL auth method upsert.
    AclAuthMethodSet = 27 => "ACLAuthMethod",
    /// ACL auth method delete.
    AclAuthMethodDelete = 28 => "ACLAuthMethodDelete",
    /// Chunked apply state (snapshot only).
    ChunkingState = 29 => "ChunkingState",
    /// Federation state write.
    FederationState = 30 => "FederationState",
    /// System metadata write.
    SystemMetadata = 31 => "SystemMetadata",
    /// Service virtual IP (snapshot only).
    ServiceVirtualIp = 32 => "ServiceVirtualIP",
    /// Free virtual IP (snapshot only).
    FreeVirtualIp = 33 => "FreeVirtualIP",
    /// Kind service names (snapshot only).
    KindServiceNames = 34 => "KindServiceName",
    /// Peering write.
    PeeringWrite = 35 => "PeeringWrite",
    /// Peering delete.
    PeeringDelete = 36 => "PeeringDelete",
    /// Peering trust bundle write.
    PeeringTrustBundleWrite = 37 => "PeeringTrustBundleWrite",
    /// Peering trust bundle delete.
    PeeringTrustBundleDelete = 38 => "PeeringTrustBundleDelete",
    /// Peering secrets write.
    PeeringSecretsWrite = 39 => "PeeringSecretsWrite",
    /// Log verifier checkpoint marker.
    LogVerifierCheckpoint = 40 => "RaftLogVerifierCheckpoint",
}

impl MessageType {
    /// Returns the type code.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Clears the ignore-unknown flag from a raw type byte.
#[must_use]
pub const fn strip_flags(raw: u8) -> u8 {
    raw & !IGNORE_UNKNOWN_TYPE_FLAG
}

/// Name printed for a code no [`MessageType`] covers.
#[must_use]
pub fn unknown_name(code: u8) -> String {
    format!("Unknown({code})")
}
