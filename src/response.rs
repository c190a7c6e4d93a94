//! Typed response mapping.
//!
//! Every response type is a structural projection of the decoded JSON body
//! that also keeps the original object, so fields added remotely after this
//! crate was written stay reachable through [`ApiResponse::raw`].

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::{MalformedResponseError, Result};

/// A typed, validated view over one decoded response body.
pub trait ApiResponse: Sized {
    /// Name of the response shape, used in error messages.
    const KIND: &'static str;

    /// Validates `value` against the expected shape and builds the response.
    fn from_value(value: Value) -> Result<Self>;

    /// The decoded JSON object this response was built from.
    fn raw(&self) -> &Map<String, Value>;

    fn to_value(&self) -> Value {
        Value::Object(self.raw().clone())
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: &Value, kind: &'static str) -> Result<T> {
    if !value.is_object() {
        return Err(MalformedResponseError::new(
            kind,
            format!("expected a JSON object, got {}", json_kind(value)),
        )
        .into());
    }
    T::deserialize(value).map_err(|err| MalformedResponseError::new(kind, err.to_string()).into())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Maps a list of nested responses, keeping each item's raw object.
pub(crate) fn nested<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: ApiResponse,
{
    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(|item| T::from_value(item).map_err(serde::de::Error::custom))
        .collect()
}

/// Implements [`ApiResponse`] for a struct with a `#[serde(skip)] raw` field.
macro_rules! api_response {
    ($name:ident, $kind:expr) => {
        impl $crate::response::ApiResponse for $name {
            const KIND: &'static str = $kind;

            fn from_value(value: serde_json::Value) -> $crate::errors::Result<Self> {
                let mut typed: Self = $crate::response::decode(&value, $kind)?;
                if let serde_json::Value::Object(map) = value {
                    typed.raw = map;
                }
                Ok(typed)
            }

            fn raw(&self) -> &serde_json::Map<String, serde_json::Value> {
                &self.raw
            }
        }
    };
}
pub(crate) use api_response;

/// Token accounting attached to generation responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u32>,
    pub total_tokens: u32,
}

/// Result of deleting a file or a fine-tuned model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeleteResponse {
    pub id: String,
    pub object: String,
    pub deleted: bool,
    #[serde(skip)]
    raw: Map<String, Value>,
}

api_response!(DeleteResponse, "delete");

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::errors::Error;

    #[test]
    fn delete_response_keeps_raw_object() {
        let body = json!({"id": "file-1", "object": "file", "deleted": true, "extra": {"a": 1}});
        let resp = DeleteResponse::from_value(body.clone()).unwrap();
        assert_eq!(resp.id, "file-1");
        assert!(resp.deleted);
        assert_eq!(resp.raw()["extra"]["a"], 1);
        assert_eq!(resp.to_value(), body);
    }

    #[test]
    fn missing_field_is_malformed() {
        let err = DeleteResponse::from_value(json!({"id": "file-1", "object": "file"})).unwrap_err();
        match err {
            Error::MalformedResponse(err) => {
                assert_eq!(err.response, "delete");
                assert!(err.message.contains("deleted"), "{}", err.message);
            }
            other => panic!("expected malformed response, got {other:?}"),
        }
    }

    #[test]
    fn wrong_kind_is_malformed() {
        let err = DeleteResponse::from_value(json!({"id": 7, "object": "file", "deleted": true}))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));

        let err = DeleteResponse::from_value(json!(["not", "an", "object"])).unwrap_err();
        match err {
            Error::MalformedResponse(err) => assert!(err.message.contains("an array")),
            other => panic!("expected malformed response, got {other:?}"),
        }
    }
}
