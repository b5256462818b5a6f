//! overlaying a loaded tree onto existing namespace content
//!
//! The merge is shallow: a top-level key present in the incoming tree replaces the existing
//! value as a whole, a top-level key only present in the existing content is kept.
use crate::registry::Registry;
use crate::value::Value;

pub fn merge(existing: Value, incoming: Value) -> Value {
    match (existing, incoming) {
        (Value::Object(mut existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                existing.insert(key, value);
            }
            Value::Object(existing)
        }
        (_, incoming) => incoming,
    }
}

/// Merge `incoming` with what `registry` currently holds for `namespace`
pub fn merge_into_namespace(namespace: &str, incoming: Value, registry: &dyn Registry) -> Value {
    merge(registry.snapshot(namespace), incoming)
}
