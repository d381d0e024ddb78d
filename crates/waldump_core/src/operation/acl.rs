//! ACL messages. All batch requests are decoded positionally.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference from a token or role to a policy or role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclLink {
    /// Target ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// Target name.
    pub name: String,
}

/// An ACL token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclToken {
    /// Public accessor ID.
    #[serde(rename = "AccessorID")]
    pub accessor_id: String,
    /// Secret ID.
    #[serde(rename = "SecretID")]
    pub secret_id: String,
    /// Description.
    pub description: String,
    /// Linked policies.
    pub policies: Vec<AclLink>,
    /// Linked roles.
    pub roles: Vec<AclLink>,
    /// Token is local to its datacenter.
    pub local: bool,
    /// Auth method that minted the token.
    pub auth_method: String,
    /// Index the token was created at.
    pub create_index: u64,
    /// Index the token was last modified at.
    pub modify_index: u64,
}

/// One-time ACL system bootstrap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclBootstrapRequest {
    /// The initial management token.
    pub token: AclToken,
    /// Bootstrap reset index.
    pub reset_index: u64,
}

/// Token upserts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclTokenBatchSetRequest {
    /// Tokens to write.
    pub tokens: Vec<AclToken>,
    /// Check-and-set against stored modify indexes.
    #[serde(rename = "CAS")]
    pub cas: bool,
    /// Allow links to missing policies or roles.
    pub allow_missing_links: bool,
    /// Reject tokens granting more than the caller holds.
    pub prohibit_unprivileged: bool,
}

/// Token deletes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclTokenBatchDeleteRequest {
    /// Accessor IDs.
    #[serde(rename = "TokenIDs")]
    pub token_ids: Vec<String>,
}

/// An ACL policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclPolicy {
    /// Policy ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// Policy name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Rules source text.
    pub rules: String,
    /// Datacenters the policy applies in; empty means all.
    pub datacenters: Vec<String>,
}

/// Policy upserts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclPolicyBatchSetRequest {
    /// Policies to write.
    pub policies: Vec<AclPolicy>,
}

/// Policy deletes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclPolicyBatchDeleteRequest {
    /// Policy IDs.
    #[serde(rename = "PolicyIDs")]
    pub policy_ids: Vec<String>,
}

/// An ACL role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclRole {
    /// Role ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// Role name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Linked policies.
    pub policies: Vec<AclLink>,
}

/// Role upserts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclRoleBatchSetRequest {
    /// Roles to write.
    pub roles: Vec<AclRole>,
    /// Allow links to missing policies.
    pub allow_missing_links: bool,
}

/// Role deletes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclRoleBatchDeleteRequest {
    /// Role IDs.
    #[serde(rename = "RoleIDs")]
    pub role_ids: Vec<String>,
}

/// Maps identities from an auth method to roles or services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclBindingRule {
    /// Rule ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// Description.
    pub description: String,
    /// Auth method the rule belongs to.
    pub auth_method: String,
    /// Selector expression.
    pub selector: String,
    /// service, node or role.
    pub bind_type: String,
    /// Name template.
    pub bind_name: String,
}

/// Binding rule upserts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclBindingRuleBatchSetRequest {
    /// Rules to write.
    pub binding_rules: Vec<AclBindingRule>,
}

/// Binding rule deletes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclBindingRuleBatchDeleteRequest {
    /// Rule IDs.
    #[serde(rename = "BindingRuleIDs")]
    pub binding_rule_ids: Vec<String>,
}

/// An external identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclAuthMethod {
    /// Method name.
    pub name: String,
    /// kubernetes, jwt, oidc, ...
    #[serde(rename = "Type")]
    pub method_type: String,
    /// Display name.
    pub display_name: String,
    /// Description.
    pub description: String,
    /// Token locality for minted tokens.
    pub token_locality: String,
    /// Method-specific configuration.
    pub config: BTreeMap<String, String>,
}

/// Auth method upserts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclAuthMethodBatchSetRequest {
    /// Methods to write.
    pub auth_methods: Vec<AclAuthMethod>,
}

/// Auth method deletes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclAuthMethodBatchDeleteRequest {
    /// Method names.
    pub auth_method_names: Vec<String>,
}
