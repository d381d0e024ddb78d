//! Service mesh messages: intentions, certificate authority, config entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Allow/deny rule between two services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Intention {
    /// Intention ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// Description.
    pub description: String,
    /// Source namespace.
    #[serde(rename = "SourceNS")]
    pub source_ns: String,
    /// Source service.
    pub source_name: String,
    /// Destination namespace.
    #[serde(rename = "DestinationNS")]
    pub destination_ns: String,
    /// Destination service.
    pub destination_name: String,
    /// allow or deny.
    pub action: String,
    /// Match precedence.
    pub precedence: i32,
}

/// Intention create, update or delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IntentionRequest {
    /// Target datacenter.
    pub datacenter: String,
    /// create, update, delete, upsert, delete-all.
    pub op: String,
    /// The intention.
    pub intention: Option<Intention>,
}

/// A CA root certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaRoot {
    /// Root ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Serial number.
    pub serial_number: u64,
    /// Whether this is the active root.
    pub active: bool,
    /// PEM encoded certificate.
    pub root_cert: String,
}

/// CA provider configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaConfiguration {
    /// Cluster trust domain ID.
    #[serde(rename = "ClusterID")]
    pub cluster_id: String,
    /// Provider name.
    pub provider: String,
    /// Provider options.
    pub config: BTreeMap<String, String>,
}

/// CA roots or configuration update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaRequest {
    /// Target datacenter.
    pub datacenter: String,
    /// set-roots, set-config, set-provider-state, ...
    pub op: String,
    /// Check-and-set index.
    pub index: u64,
    /// Roots to store.
    pub roots: Vec<CaRoot>,
    /// Configuration to store.
    pub config: Option<CaConfiguration>,
}

/// A leaf certificate issued to a service or agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IssuedCert {
    /// Certificate serial.
    pub serial_number: String,
    /// PEM encoded certificate.
    #[serde(rename = "CertPEM")]
    pub cert_pem: String,
    /// Service the certificate identifies.
    pub service: String,
    /// Agent the certificate identifies.
    pub agent: String,
    /// Not valid before.
    pub valid_after: DateTime<Utc>,
    /// Not valid after.
    pub valid_before: DateTime<Utc>,
}

/// Leaf certificate bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaLeafRequest {
    /// Verb.
    pub op: String,
    /// Check-and-set index.
    pub index: u64,
    /// Certificate issued.
    pub issued_cert: Option<IssuedCert>,
}

/// A configuration entry.
///
/// Entries are polymorphic by `kind`; kind-specific settings are flattened
/// into `settings` as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigEntry {
    /// service-defaults, proxy-defaults, ingress-gateway, ...
    pub kind: String,
    /// Entry name.
    pub name: String,
    /// Kind-specific settings.
    pub settings: BTreeMap<String, String>,
    /// Free-form metadata.
    pub meta: BTreeMap<String, String>,
}

/// Config entry upsert or delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigEntryRequest {
    /// Target datacenter.
    pub datacenter: String,
    /// upsert, upsert-cas, delete, delete-cas.
    pub op: String,
    /// The entry.
    pub entry: ConfigEntry,
}
