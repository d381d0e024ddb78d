//! Cluster peering messages.
//!
//! Unlike the rest of the catalog these are written in the self-describing
//! format, so every shape tolerates missing and unknown fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A peering relationship with another cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Peering {
    /// Peering ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// Local name for the peer.
    pub name: String,
    /// Partition the peering belongs to.
    pub partition: String,
    /// PENDING, ESTABLISHING, ACTIVE, FAILING, DELETING, TERMINATED.
    pub state: String,
    /// ID the peer knows us by.
    #[serde(rename = "PeerID")]
    pub peer_id: String,
    /// Peer CA roots.
    #[serde(rename = "PeerCAPems")]
    pub peer_ca_pems: Vec<String>,
    /// SNI server name of the peer.
    pub peer_server_name: String,
    /// Addresses of the peer's servers.
    pub peer_server_addresses: Vec<String>,
    /// Free-form metadata.
    pub meta: BTreeMap<String, String>,
}

/// Stream secrets for a peering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SecretsWriteRequest {
    /// Peering ID.
    #[serde(rename = "PeerID")]
    pub peer_id: String,
    /// generate-token, exchange-secret, promote-pending, establish.
    pub operation: String,
    /// Establishment secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub establishment_secret: Option<String>,
    /// Pending stream secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_stream_secret: Option<String>,
    /// Active stream secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_stream_secret: Option<String>,
}

/// Peering upsert, optionally with secrets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PeeringWriteRequest {
    /// The peering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peering: Option<Peering>,
    /// Secrets written with it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets_request: Option<SecretsWriteRequest>,
    /// Free-form metadata.
    pub meta: BTreeMap<String, String>,
}

/// Peering delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PeeringDeleteRequest {
    /// Peer name.
    pub name: String,
    /// Partition.
    pub partition: String,
}

/// Trust bundle received from a peer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PeeringTrustBundle {
    /// Peer trust domain.
    pub trust_domain: String,
    /// Peer name.
    pub peer_name: String,
    /// Local partition.
    pub partition: String,
    /// Root certificates.
    #[serde(rename = "RootPEMs")]
    pub root_pems: Vec<String>,
    /// Partition the peer exported from.
    pub exported_partition: String,
}

/// Trust bundle upsert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PeeringTrustBundleWriteRequest {
    /// The bundle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peering_trust_bundle: Option<PeeringTrustBundle>,
}

/// Trust bundle delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PeeringTrustBundleDeleteRequest {
    /// Peer name.
    pub name: String,
    /// Partition.
    pub partition: String,
}
