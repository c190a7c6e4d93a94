//! Engines API client (legacy catalog naming, served by GooseAI).

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    errors::Result,
    payload::Payload,
    response::{api_response, ApiResponse},
    transporter::Transporter,
};

const RESOURCE: &str = "engines";

/// An engine entry. Providers disagree on the optional fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineResponse {
    pub id: String,
    pub object: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(skip)]
    raw: Map<String, Value>,
}

api_response!(EngineResponse, "engine");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineListResponse {
    pub object: String,
    #[serde(deserialize_with = "crate::response::nested")]
    pub data: Vec<EngineResponse>,
    #[serde(skip)]
    raw: Map<String, Value>,
}

api_response!(EngineListResponse, "engine list");

/// Client for engine catalog operations.
#[derive(Clone)]
pub struct EnginesClient {
    pub(crate) transporter: Arc<dyn Transporter>,
}

impl EnginesClient {
    /// List the currently available engines and whether they are ready.
    pub fn list(&self) -> Result<EngineListResponse> {
        let value = self.transporter.request_object(Payload::list(RESOURCE))?;
        EngineListResponse::from_value(value)
    }

    pub fn retrieve(&self, engine_id: &str) -> Result<EngineResponse> {
        let value = self
            .transporter
            .request_object(Payload::retrieve(RESOURCE, engine_id))?;
        EngineResponse::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn engine_list_maps_gooseai_shape() {
        let body = json!({
            "object": "list",
            "data": [
                {"id": "gpt-neo-20b", "object": "engine", "owner": "goose.ai", "ready": true,
                 "created": 1640000000, "description": "GPT-NeoX 20B", "tokenizer": "pile"},
                {"id": "fairseq-13b", "object": "engine", "ready": false}
            ]
        });
        let list = EngineListResponse::from_value(body.clone()).unwrap();
        assert_eq!(list.data.len(), 2);
        assert_eq!(list.data[0].owner.as_deref(), Some("goose.ai"));
        assert_eq!(list.data[0].raw()["tokenizer"], "pile");
        assert_eq!(list.data[1].ready, Some(false));
        assert_eq!(list.data[1].owner, None);
        assert_eq!(list.to_value(), body);
    }
}
