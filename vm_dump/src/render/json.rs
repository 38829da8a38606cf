use serde_json::{json, Map as JsonMap, Number as JsonNumber, Value as JsonValue};

use super::{Header, RenderStrategy};
use crate::config::DumpConfig;
use crate::value::MethodHandle;

/// Builds a JSON tree. Kinds JSON cannot express natively become objects
/// tagged with a `type` field.
#[derive(Debug, Clone)]
pub struct JsonStrategy {
    max_depth: usize,
}

impl JsonStrategy {
    pub fn new(config: &DumpConfig) -> Self {
        Self {
            max_depth: config.json_max_depth,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

fn tagged(kind: &str) -> JsonValue {
    json!({ "type": kind })
}

impl RenderStrategy for JsonStrategy {
    type Node = JsonValue;

    fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn undefined(&mut self) -> JsonValue {
        tagged("undefined")
    }

    fn method(&mut self, method: &MethodHandle) -> JsonValue {
        match &method.name {
            Some(name) => json!({ "type": "method", "name": name }),
            None => tagged("method"),
        }
    }

    fn pointer(&mut self, address: u64) -> JsonValue {
        json!({ "type": "pointer", "address": format!("{address:#x}") })
    }

    fn boolean(&mut self, value: bool) -> JsonValue {
        JsonValue::Bool(value)
    }

    fn number(&mut self, value: f64) -> JsonValue {
        match JsonNumber::from_f64(value) {
            Some(number) => JsonValue::Number(number),
            None if value.is_nan() => tagged("nan"),
            None if value.is_sign_positive() => tagged("positive infinity"),
            None => tagged("negative infinity"),
        }
    }

    fn int64(&mut self, value: i64) -> JsonValue {
        json!({ "type": "int64", "value": value })
    }

    fn string(&mut self, value: &str) -> JsonValue {
        JsonValue::String(value.to_string())
    }

    fn foreign_reference(&mut self, descriptor: &str) -> JsonValue {
        json!({ "type": "foreign reference", "descriptor": descriptor })
    }

    fn invalid_reference(&mut self, descriptor: &str) -> JsonValue {
        json!({ "type": "invalid reference", "descriptor": descriptor })
    }

    fn seen(&mut self) -> JsonValue {
        tagged("seen")
    }

    fn depth_limit(&mut self) -> JsonValue {
        tagged("recursion limit")
    }

    fn sequence(&mut self, _header: &Header<'_>, items: Vec<JsonValue>) -> JsonValue {
        JsonValue::Array(items)
    }

    fn members(&mut self, _header: &Header<'_>, members: Vec<(&str, JsonValue)>) -> JsonValue {
        let mut map = JsonMap::with_capacity(members.len());
        for (name, value) in members {
            map.insert(name.to_string(), value);
        }
        JsonValue::Object(map)
    }

    fn entries(&mut self, _header: &Header<'_>, entries: Vec<(JsonValue, JsonValue)>) -> JsonValue {
        JsonValue::Array(
            entries
                .into_iter()
                .map(|(key, value)| JsonValue::Array(vec![key, value]))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_numbers_are_tagged() {
        let mut strategy = JsonStrategy::with_max_depth(4);
        assert_eq!(strategy.number(f64::NAN), json!({ "type": "nan" }));
        assert_eq!(
            strategy.number(f64::INFINITY),
            json!({ "type": "positive infinity" })
        );
        assert_eq!(
            strategy.number(f64::NEG_INFINITY),
            json!({ "type": "negative infinity" })
        );
        assert_eq!(strategy.number(-2.5), json!(-2.5));
    }

    #[test]
    fn members_keep_insertion_order() {
        let mut strategy = JsonStrategy::with_max_depth(4);
        let node = strategy.members(
            &Header::Object { name: None },
            vec![("zeta", json!(1)), ("alpha", json!(2))],
        );
        let keys: Vec<&String> = node.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn method_name_is_optional() {
        let mut strategy = JsonStrategy::with_max_depth(4);
        assert_eq!(
            strategy.method(&MethodHandle::default()),
            json!({ "type": "method" })
        );
        let named = MethodHandle {
            name: Some("scr_attack".into()),
        };
        assert_eq!(
            strategy.method(&named),
            json!({ "type": "method", "name": "scr_attack" })
        );
    }
}
