use thiserror::Error;

use crate::value::ValueKind;

/// Failures raised while reading foreign values or resolving entity tables.
///
/// Cycles and depth overflow during a dump are not represented here; the
/// walker degrades those to placeholders and always finishes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DumpError {
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: ValueKind,
        actual: ValueKind,
    },
    #[error("table '{table}' lists key {key} but it could not be fetched")]
    KeyUnresolvable { table: &'static str, key: String },
    #[error("missing member '{member}'")]
    MissingMember { member: String },
    #[error("table '{table}' is already registered")]
    DuplicateTable { table: &'static str },
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DumpError {
    pub fn mismatch(expected: ValueKind, actual: ValueKind) -> Self {
        DumpError::TypeMismatch { expected, actual }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_both_kinds() {
        let err = DumpError::mismatch(ValueKind::String, ValueKind::Number);
        assert_eq!(
            err.to_string(),
            "type mismatch: expected string, found number"
        );
    }

    #[test]
    fn unresolvable_key_names_table() {
        let err = DumpError::KeyUnresolvable {
            table: "items",
            key: "\"sword\"".into(),
        };
        assert_eq!(
            err.to_string(),
            "table 'items' lists key \"sword\" but it could not be fetched"
        );
    }
}
