//! Fine-tunes API client.
//!
//! Manages fine-tuning jobs that tailor a model to uploaded training data.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    errors::Result,
    files::FileResponse,
    payload::{to_parameters, Payload},
    response::{api_response, ApiResponse},
    transporter::Transporter,
};

const RESOURCE: &str = "fine-tunes";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FineTuneResponse {
    pub id: String,
    pub object: String,
    pub model: String,
    pub created_at: i64,
    /// Only included when retrieving a single fine-tune.
    #[serde(default, deserialize_with = "crate::response::nested")]
    pub events: Vec<FineTuneEvent>,
    #[serde(default)]
    pub fine_tuned_model: Option<String>,
    pub hyperparams: FineTuneHyperparams,
    pub organization_id: String,
    #[serde(deserialize_with = "crate::response::nested")]
    pub result_files: Vec<FileResponse>,
    pub status: String,
    #[serde(deserialize_with = "crate::response::nested")]
    pub validation_files: Vec<FileResponse>,
    #[serde(deserialize_with = "crate::response::nested")]
    pub training_files: Vec<FileResponse>,
    pub updated_at: i64,
    #[serde(skip)]
    raw: Map<String, Value>,
}

api_response!(FineTuneResponse, "fine-tune");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FineTuneHyperparams {
    #[serde(default)]
    pub batch_size: Option<u32>,
    #[serde(default)]
    pub learning_rate_multiplier: Option<f64>,
    pub n_epochs: u32,
    pub prompt_loss_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FineTuneEvent {
    pub object: String,
    pub created_at: i64,
    pub level: String,
    pub message: String,
    #[serde(skip)]
    raw: Map<String, Value>,
}

api_response!(FineTuneEvent, "fine-tune event");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FineTuneListResponse {
    pub object: String,
    #[serde(deserialize_with = "crate::response::nested")]
    pub data: Vec<FineTuneResponse>,
    #[serde(skip)]
    raw: Map<String, Value>,
}

api_response!(FineTuneListResponse, "fine-tune list");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FineTuneEventListResponse {
    pub object: String,
    #[serde(deserialize_with = "crate::response::nested")]
    pub data: Vec<FineTuneEvent>,
    #[serde(skip)]
    raw: Map<String, Value>,
}

api_response!(FineTuneEventListResponse, "fine-tune event list");

/// Client for fine-tuning jobs.
#[derive(Clone)]
pub struct FineTunesClient {
    pub(crate) transporter: Arc<dyn Transporter>,
}

impl FineTunesClient {
    /// Start a fine-tuning job from an uploaded training file.
    pub fn create<P: Serialize + ?Sized>(&self, params: &P) -> Result<FineTuneResponse> {
        let payload = Payload::create(RESOURCE, to_parameters(params)?);
        FineTuneResponse::from_value(self.transporter.request_object(payload)?)
    }

    pub fn list(&self) -> Result<FineTuneListResponse> {
        let value = self.transporter.request_object(Payload::list(RESOURCE))?;
        FineTuneListResponse::from_value(value)
    }

    pub fn retrieve(&self, fine_tune_id: &str) -> Result<FineTuneResponse> {
        let value = self
            .transporter
            .request_object(Payload::retrieve(RESOURCE, fine_tune_id))?;
        FineTuneResponse::from_value(value)
    }

    /// Immediately cancel a running job.
    pub fn cancel(&self, fine_tune_id: &str) -> Result<FineTuneResponse> {
        let value = self
            .transporter
            .request_object(Payload::cancel(RESOURCE, fine_tune_id))?;
        FineTuneResponse::from_value(value)
    }

    pub fn list_events(&self, fine_tune_id: &str) -> Result<FineTuneEventListResponse> {
        let payload = Payload::retrieve_with_suffix(RESOURCE, fine_tune_id, "events");
        FineTuneEventListResponse::from_value(self.transporter.request_object(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fine_tune_json() -> Value {
        json!({
            "id": "ft-AF1WoRqd3aJAHsqc9NY7iL8F",
            "object": "fine-tune",
            "model": "curie",
            "created_at": 1614807352,
            "events": [
                {"object": "fine-tune-event", "created_at": 1614807352, "level": "info",
                 "message": "Job enqueued. Waiting for jobs ahead to complete. Queue number: 0."}
            ],
            "fine_tuned_model": null,
            "hyperparams": {
                "batch_size": 4,
                "learning_rate_multiplier": 0.1,
                "n_epochs": 4,
                "prompt_loss_weight": 0.1
            },
            "organization_id": "org-...",
            "result_files": [],
            "status": "pending",
            "validation_files": [],
            "training_files": [{
                "id": "file-XGinujblHPwGLSztz8cPS8XY",
                "object": "file",
                "bytes": 1547276,
                "created_at": 1610062281,
                "filename": "my-data-train.jsonl",
                "purpose": "fine-tune-train"
            }],
            "updated_at": 1614807352
        })
    }

    #[test]
    fn fine_tune_maps_nested_files_and_events() {
        let body = fine_tune_json();
        let ft = FineTuneResponse::from_value(body.clone()).unwrap();
        assert_eq!(ft.status, "pending");
        assert_eq!(ft.fine_tuned_model, None);
        assert_eq!(ft.hyperparams.batch_size, Some(4));
        assert_eq!(ft.events.len(), 1);
        assert_eq!(ft.events[0].level, "info");
        assert_eq!(ft.training_files[0].bytes, 1547276);
        assert_eq!(
            ft.training_files[0].to_value(),
            body["training_files"][0]
        );
        assert_eq!(ft.to_value(), body);
    }

    #[test]
    fn events_are_optional_in_listings() {
        let mut item = fine_tune_json();
        item.as_object_mut().unwrap().remove("events");
        let body = json!({"object": "list", "data": [item]});
        let list = FineTuneListResponse::from_value(body).unwrap();
        assert!(list.data[0].events.is_empty());
    }

    #[test]
    fn hyperparams_are_required() {
        let mut body = fine_tune_json();
        body.as_object_mut().unwrap().remove("hyperparams");
        assert!(FineTuneResponse::from_value(body).is_err());
    }
}
