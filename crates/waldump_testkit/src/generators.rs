//! Property-based test generators using proptest.

use crate::fixtures::{kv_set, register_node, register_service};
use proptest::prelude::*;
use waldump_core::operation::{KvsRequest, RegisterRequest};
use waldump_core::MessageType;

/// Strategy for any raw type byte, flag bit included.
pub fn raw_type_code_strategy() -> impl Strategy<Value = u8> {
    any::<u8>()
}

/// Strategy for any message type this build names.
pub fn message_type_strategy() -> impl Strategy<Value = MessageType> {
    prop::sample::select(MessageType::ALL.to_vec())
}

/// Strategy for key/value keys.
pub fn kv_key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9/_-]{0,31}").expect("Invalid regex")
}

/// Strategy for key/value set requests with arbitrary values.
pub fn kvs_request_strategy() -> impl Strategy<Value = KvsRequest> {
    (kv_key_strategy(), prop::collection::vec(any::<u8>(), 0..256))
        .prop_map(|(key, value)| kv_set(&key, &value))
}

/// Strategy for registrations, with and without a service.
pub fn register_request_strategy() -> impl Strategy<Value = RegisterRequest> {
    let node = prop::string::string_regex("[a-z][a-z0-9-]{0,15}").expect("Invalid regex");
    let address = (any::<u8>(), any::<u8>()).prop_map(|(a, b)| format!("10.0.{a}.{b}"));
    let service = prop::option::of((
        prop::string::string_regex("[a-z]{1,12}").expect("Invalid regex"),
        -1i32..65536,
    ));
    (node, address, service).prop_map(|(node, address, service)| match service {
        Some((name, port)) => register_service(&node, &address, &name, port),
        None => register_node(&node, &address),
    })
}

/// Strategy for arbitrary command payloads, including empty ones.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..128)
}

/// Strategy for `(after, before)` bounds within `0..=max`. Either side may be zero.
pub fn bound_strategy(max: u64) -> impl Strategy<Value = (u64, u64)> {
    (0..=max, 0..=max)
}
