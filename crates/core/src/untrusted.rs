//! The "no assumptions" value type.

use serde::{Deserialize, Serialize};

use crate::error::json_kind;

/// JSON data whose structure has not been checked.
///
/// Deserializes from any JSON document. Its contents can only be read by
/// running a [`Decoder`](crate::Decoder) over it; [`any()`](crate::any) is the
/// explicit way to take the raw `serde_json::Value` back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Untrusted(serde_json::Value);

impl Untrusted {
    /// Wraps a value produced by a generic JSON parser.
    pub fn new(value: serde_json::Value) -> Self {
        Untrusted(value)
    }

    /// JSON kind of the value: `null`, `boolean`, `number`, `string`,
    /// `array` or `object`.
    pub fn kind(&self) -> &'static str {
        json_kind(&self.0)
    }

    pub(crate) fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for Untrusted {
    fn from(value: serde_json::Value) -> Self {
        Untrusted(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_any_document() {
        let v: Untrusted = serde_json::from_str(r#"{"a": [1, "two", null]}"#).unwrap();
        assert_eq!(v.kind(), "object");
        assert_eq!(v, Untrusted::new(json!({"a": [1, "two", null]})));
    }

    #[test]
    fn serializes_transparently() {
        let v = Untrusted::from(json!([true, 2]));
        assert_eq!(serde_json::to_string(&v).unwrap(), "[true,2]");
    }
}
