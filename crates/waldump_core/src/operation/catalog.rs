//! Catalog, KV, session and cluster housekeeping messages.
//!
//! These shapes are decoded positionally, so field order is part of the
//! format. Append new fields at the end only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A service as registered on a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AgentService {
    /// Service instance ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// Service name.
    pub service: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Service address; empty means "use the node address".
    pub address: String,
    /// Service port; zero or negative means unset.
    pub port: i32,
    /// Free-form metadata.
    pub meta: BTreeMap<String, String>,
}

/// A health check definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthCheck {
    /// Node the check runs on.
    pub node: String,
    /// Check ID.
    #[serde(rename = "CheckID")]
    pub check_id: String,
    /// Display name.
    pub name: String,
    /// passing, warning or critical.
    pub status: String,
    /// Operator notes.
    pub notes: String,
    /// Last output.
    pub output: String,
    /// Service the check is bound to, if any.
    #[serde(rename = "ServiceID")]
    pub service_id: String,
    /// Name of that service.
    pub service_name: String,
}

/// Registers a node and optionally a service and check on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterRequest {
    /// Target datacenter.
    pub datacenter: String,
    /// Node ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// Node name.
    pub node: String,
    /// Node address.
    pub address: String,
    /// Extra addresses keyed by purpose.
    pub tagged_addresses: BTreeMap<String, String>,
    /// Node metadata.
    pub node_meta: BTreeMap<String, String>,
    /// Service being registered.
    pub service: Option<AgentService>,
    /// Check being registered.
    pub check: Option<HealthCheck>,
    /// Additional checks.
    pub checks: Vec<HealthCheck>,
    /// Leave node-level fields untouched.
    pub skip_node_update: bool,
}

/// Removes a node, a service or a check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeregisterRequest {
    /// Target datacenter.
    pub datacenter: String,
    /// Node name.
    pub node: String,
    /// Service ID to remove; empty removes nothing at service level.
    #[serde(rename = "ServiceID")]
    pub service_id: String,
    /// Check ID to remove.
    #[serde(rename = "CheckID")]
    pub check_id: String,
}

/// A key/value entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DirEntry {
    /// Number of times the key has been locked.
    pub lock_index: u64,
    /// Key path.
    pub key: String,
    /// Opaque client flags.
    pub flags: u64,
    /// Stored value.
    #[serde(with = "waldump_codec::base64_bytes")]
    pub value: Vec<u8>,
    /// Session holding the lock, if any.
    pub session: String,
    /// Index the entry was created at.
    pub create_index: u64,
    /// Index the entry was last modified at.
    pub modify_index: u64,
}

/// A key/value write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KvsRequest {
    /// Target datacenter.
    pub datacenter: String,
    /// Verb: set, delete, delete-tree, cas, lock, unlock, ...
    pub op: String,
    /// The entry being written.
    pub dir_ent: DirEntry,
}

/// Reaps KV tombstones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TombstoneRequest {
    /// Target datacenter.
    pub datacenter: String,
    /// Verb, normally reap.
    pub op: String,
    /// Tombstones at or below this index are reaped.
    pub reap_index: u64,
}

/// A session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Session {
    /// Session ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owning node.
    pub node: String,
    /// Lock delay in nanoseconds.
    pub lock_delay: u64,
    /// release or delete.
    pub behavior: String,
    /// TTL as written by the client, e.g. "30s".
    #[serde(rename = "TTL")]
    pub ttl: String,
    /// Node checks the session is tied to.
    pub node_checks: Vec<String>,
}

/// Session create or destroy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionRequest {
    /// Target datacenter.
    pub datacenter: String,
    /// create or destroy.
    pub op: String,
    /// The session.
    pub session: Session,
}

/// A network coordinate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Coordinate {
    /// Euclidean position.
    pub vec: Vec<f64>,
    /// Confidence.
    pub error: f64,
    /// Adjustment term.
    pub adjustment: f64,
    /// Height term.
    pub height: f64,
}

/// One node's coordinate update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CoordinateUpdate {
    /// Node name.
    pub node: String,
    /// Network segment.
    pub segment: String,
    /// New coordinate.
    pub coord: Option<Coordinate>,
}

/// A batch of coordinate updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordinateBatch(pub Vec<CoordinateUpdate>);

/// Service selection of a prepared query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceQuery {
    /// Service name.
    pub service: String,
    /// Only return passing instances.
    pub only_passing: bool,
    /// Required tags.
    pub tags: Vec<String>,
    /// Datacenter failover list.
    pub failover_datacenters: Vec<String>,
}

/// A prepared query definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PreparedQuery {
    /// Query ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// Query name.
    pub name: String,
    /// Session the query is tied to.
    pub session: String,
    /// Service selection.
    pub service: ServiceQuery,
}

/// Prepared query create, update or delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PreparedQueryRequest {
    /// Target datacenter.
    pub datacenter: String,
    /// create, update or delete.
    pub op: String,
    /// The query.
    pub query: Option<PreparedQuery>,
}

/// A catalog node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Node {
    /// Node ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// Node name.
    pub node: String,
    /// Node address.
    pub address: String,
    /// Datacenter.
    pub datacenter: String,
    /// Node metadata.
    pub meta: BTreeMap<String, String>,
}

/// KV operation inside a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TxnKvOp {
    /// KV verb.
    pub verb: String,
    /// The entry.
    pub dir_ent: DirEntry,
}

/// Node operation inside a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TxnNodeOp {
    /// Node verb.
    pub verb: String,
    /// The node.
    pub node: Node,
}

/// Service operation inside a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TxnServiceOp {
    /// Service verb.
    pub verb: String,
    /// Node the service lives on.
    pub node: String,
    /// The service.
    pub service: AgentService,
}

/// Check operation inside a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TxnCheckOp {
    /// Check verb.
    pub verb: String,
    /// The check.
    pub check: HealthCheck,
}

/// One operation of a transaction. Exactly one field is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TxnOp {
    /// KV operation.
    #[serde(rename = "KV")]
    pub kv: Option<TxnKvOp>,
    /// Node operation.
    pub node: Option<TxnNodeOp>,
    /// Service operation.
    pub service: Option<TxnServiceOp>,
    /// Check operation.
    pub check: Option<TxnCheckOp>,
}

/// A multi-operation transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TxnRequest {
    /// Target datacenter.
    pub datacenter: String,
    /// Operations applied atomically.
    pub ops: Vec<TxnOp>,
}

/// Autopilot settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AutopilotConfig {
    /// Remove failed servers automatically.
    pub cleanup_dead_servers: bool,
    /// Contact threshold in nanoseconds.
    pub last_contact_threshold: u64,
    /// Log lag tolerated before a server counts as unhealthy.
    pub max_trailing_logs: u64,
    /// Minimum number of servers.
    pub min_quorum: u32,
    /// Stabilization time in nanoseconds.
    pub server_stabilization_time: u64,
}

/// Autopilot configuration update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AutopilotSetConfigRequest {
    /// Target datacenter.
    pub datacenter: String,
    /// New configuration.
    pub config: AutopilotConfig,
    /// Check-and-set against the stored modify index.
    #[serde(rename = "CAS")]
    pub cas: bool,
}

/// A mesh gateway endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GatewayAddress {
    /// Gateway node.
    pub node: String,
    /// Address.
    pub address: String,
    /// Port.
    pub port: i32,
}

/// Federation state of one datacenter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FederationState {
    /// Datacenter name.
    pub datacenter: String,
    /// Mesh gateways of that datacenter.
    pub mesh_gateways: Vec<GatewayAddress>,
    /// Last update time.
    pub updated: DateTime<Utc>,
}

/// Federation state upsert or delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FederationStateRequest {
    /// Target datacenter.
    pub datacenter: String,
    /// upsert or delete.
    pub op: String,
    /// The state.
    pub state: Option<FederationState>,
}

/// A system metadata entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemMetadataEntry {
    /// Key.
    pub key: String,
    /// Value.
    pub value: String,
}

/// System metadata upsert or delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemMetadataRequest {
    /// Target datacenter.
    pub datacenter: String,
    /// upsert or delete.
    pub op: String,
    /// The entry.
    pub entry: Option<SystemMetadataEntry>,
}
