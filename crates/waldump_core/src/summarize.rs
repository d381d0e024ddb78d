//! Compact projections of decoded operations.

use crate::operation::{Operation, OperationValue};
use serde::Serialize;

/// Key/value write reduced to its key and value length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KvSummary {
    /// Key written.
    pub key: String,
    /// Length of the value in bytes.
    pub value_size: usize,
}

/// Registration reduced to node, service and address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterSummary {
    /// Node name.
    pub node: String,
    /// Service name, omitted when the registration has no service.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service: String,
    /// Effective address, omitted when empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub addr: String,
}

/// Projects an operation onto its compact form.
///
/// Only key/value writes and registrations keep a payload; every other kind
/// is reduced to its type name.
#[must_use]
pub fn summarize(op: Operation) -> Operation {
    let Operation { kind, value } = op;
    match value {
        Some(OperationValue::Kvs(req)) => Operation::new(
            kind,
            KvSummary {
                value_size: req.dir_ent.value.len(),
                key: req.dir_ent.key,
            },
        ),
        Some(OperationValue::Register(req)) => {
            let mut addr = req.address;
            let mut service = String::new();
            if let Some(svc) = req.service {
                service = svc.service;
                if !svc.address.is_empty() {
                    addr = svc.address;
                }
                if svc.port > 0 {
                    addr = format!("{addr}:{}", svc.port);
                }
            }
            Operation::new(
                kind,
                RegisterSummary {
                    node: req.node,
                    service,
                    addr,
                },
            )
        }
        _ => Operation::kind_only(kind),
    }
}
