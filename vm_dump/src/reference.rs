//! Parsing of reference descriptors reported by the VM.
//!
//! Descriptors look like `ref <subkind> <rest>`, e.g. `ref instance 100012`
//! or `ref ds_map 7`. Only the subkinds below are ever expanded.

use crate::value::InstanceId;

/// What a descriptor points at, before asking the host to resolve it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RefTarget {
    Instance(InstanceId),
    List(String),
    Map(String),
    /// Known subkind with a malformed payload (bad id, missing handle).
    Invalid,
    /// Unrecognised subkind. Rendered as an opaque leaf.
    Other,
}

pub fn parse_descriptor(descriptor: &str) -> RefTarget {
    let Some(body) = descriptor.trim().strip_prefix("ref") else {
        return RefTarget::Other;
    };
    if !body.starts_with(char::is_whitespace) {
        return RefTarget::Other;
    }
    let body = body.trim_start();
    let (subkind, rest) = body
        .split_once(char::is_whitespace)
        .unwrap_or((body, ""));
    let rest = rest.trim();

    match subkind {
        "instance" => rest
            .split_whitespace()
            .last()
            .and_then(|id| id.parse::<InstanceId>().ok())
            .map(RefTarget::Instance)
            .unwrap_or(RefTarget::Invalid),
        "ds_list" if !rest.is_empty() => RefTarget::List(rest.to_string()),
        "ds_map" if !rest.is_empty() => RefTarget::Map(rest.to_string()),
        "ds_list" | "ds_map" => RefTarget::Invalid,
        _ => RefTarget::Other,
    }
}
