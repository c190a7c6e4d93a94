//! Models catalog API client.
//!
//! Lists and describes the models available to the API key.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    errors::Result,
    payload::Payload,
    response::{api_response, ApiResponse, DeleteResponse},
    transporter::Transporter,
};

const RESOURCE: &str = "models";

/// A model with its permission entries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
    #[serde(default)]
    pub permission: Vec<ModelPermission>,
    pub root: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(skip)]
    raw: Map<String, Value>,
}

api_response!(ModelResponse, "model");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelPermission {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub allow_create_engine: bool,
    pub allow_sampling: bool,
    pub allow_logprobs: bool,
    pub allow_search_indices: bool,
    pub allow_view: bool,
    pub allow_fine_tuning: bool,
    pub organization: String,
    #[serde(default)]
    pub group: Option<String>,
    pub is_blocking: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelListResponse {
    pub object: String,
    #[serde(deserialize_with = "crate::response::nested")]
    pub data: Vec<ModelResponse>,
    #[serde(skip)]
    raw: Map<String, Value>,
}

api_response!(ModelListResponse, "model list");

/// Client for model catalog operations.
#[derive(Clone)]
pub struct ModelsClient {
    pub(crate) transporter: Arc<dyn Transporter>,
}

impl ModelsClient {
    pub fn list(&self) -> Result<ModelListResponse> {
        let value = self.transporter.request_object(Payload::list(RESOURCE))?;
        ModelListResponse::from_value(value)
    }

    pub fn retrieve(&self, model: &str) -> Result<ModelResponse> {
        let value = self
            .transporter
            .request_object(Payload::retrieve(RESOURCE, model))?;
        ModelResponse::from_value(value)
    }

    /// Delete a fine-tuned model owned by the organization.
    pub fn delete(&self, model: &str) -> Result<DeleteResponse> {
        let value = self
            .transporter
            .request_object(Payload::delete(RESOURCE, model))?;
        DeleteResponse::from_value(value)
    }
}
