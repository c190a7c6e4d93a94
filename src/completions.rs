//! Completions API client.
//!
//! Given a prompt, the model returns one or more predicted completions and,
//! optionally, the log probabilities of alternative tokens at each position.

use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    errors::Result,
    payload::{to_parameters, Payload},
    response::{api_response, ApiResponse, Usage},
    transporter::Transporter,
};

const RESOURCE: &str = "completions";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<CompletionChoice>,
    /// Absent on some OpenAI-compatible providers.
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(skip)]
    raw: Map<String, Value>,
}

api_response!(CompletionResponse, "completion");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionChoice {
    pub text: String,
    pub index: u32,
    #[serde(default)]
    pub logprobs: Option<CompletionLogprobs>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionLogprobs {
    pub tokens: Vec<String>,
    pub token_logprobs: Vec<Option<f64>>,
    #[serde(default)]
    pub top_logprobs: Option<Vec<BTreeMap<String, f64>>>,
    pub text_offset: Vec<u32>,
}

/// Client for completion operations.
#[derive(Clone)]
pub struct CompletionsClient {
    pub(crate) transporter: Arc<dyn Transporter>,
}

impl CompletionsClient {
    /// Create a completion. `params` is sent verbatim as the JSON body.
    pub fn create<P: Serialize + ?Sized>(&self, params: &P) -> Result<CompletionResponse> {
        let payload = Payload::create(RESOURCE, to_parameters(params)?);
        CompletionResponse::from_value(self.transporter.request_object(payload)?)
    }
}
