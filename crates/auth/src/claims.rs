use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded claim set of a verified credential (transport-agnostic).
///
/// The set is kept open-ended: the ledger only needs the identity claim, but
/// the rest (`upn`, `groups`, issuer data) is preserved for introspection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// Claim value by name. An explicit JSON `null` counts as absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    pub fn upn(&self) -> Option<&str> {
        self.get("upn").and_then(Value::as_str)
    }

    pub fn groups(&self) -> Vec<&str> {
        match self.get("groups") {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(single)) => vec![single.as_str()],
            _ => Vec::new(),
        }
    }
}

impl From<Map<String, Value>> for ClaimSet {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(v: Value) -> ClaimSet {
        match v {
            Value::Object(map) => ClaimSet::new(map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn null_claims_are_treated_as_absent() {
        let c = claims(json!({ "id": null, "upn": "ana@example.com" }));
        assert!(c.get("id").is_none());
        assert_eq!(c.upn(), Some("ana@example.com"));
    }

    #[test]
    fn groups_accept_array_or_single_string() {
        assert_eq!(claims(json!({ "groups": ["user", "admin"] })).groups(), vec!["user", "admin"]);
        assert_eq!(claims(json!({ "groups": "user" })).groups(), vec!["user"]);
        assert!(claims(json!({})).groups().is_empty());
    }
}
