//! Introspection Types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Introspection request body.
#[derive(Clone, Serialize)]
pub(crate) struct IntrospectionRequest<'a> {
    pub token: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

/// Raw introspection result.
///
/// Kept as an untyped object so a malformed `active` claim can be detected
/// instead of failing deserialization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntrospectionResult(Map<String, Value>);

impl IntrospectionResult {
    /// The `active` claim, only if present and boolean-typed.
    pub fn active(&self) -> Option<bool> {
        self.0.get("active").and_then(Value::as_bool)
    }

    /// True only for `active: true`.
    pub fn is_active(&self) -> bool {
        self.active().unwrap_or(false)
    }

    /// Granted scopes, if reported.
    pub fn scope(&self) -> Option<&str> {
        self.0.get("scope").and_then(Value::as_str)
    }

    /// Expiration timestamp (Unix seconds), if reported.
    pub fn exp(&self) -> Option<i64> {
        self.0.get("exp").and_then(Value::as_i64)
    }

    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.0.get(claim)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> IntrospectionResult {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_active_true() {
        let result = parse(r#"{"active": true, "scope": "account.info", "exp": 1735689600}"#);
        assert!(result.is_active());
        assert_eq!(result.scope(), Some("account.info"));
        assert_eq!(result.exp(), Some(1735689600));
    }

    #[test]
    fn test_non_boolean_active_is_not_active() {
        let result = parse(r#"{"active": "true"}"#);
        assert_eq!(result.active(), None);
        assert!(!result.is_active());
    }

    #[test]
    fn test_missing_active() {
        assert!(!parse("{}").is_active());
        assert!(!parse(r#"{"active": false}"#).is_active());
    }
}
