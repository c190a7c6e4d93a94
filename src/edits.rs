//! Edits API client.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    errors::Result,
    payload::{to_parameters, Payload},
    response::{api_response, ApiResponse, Usage},
    transporter::Transporter,
};

const RESOURCE: &str = "edits";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EditResponse {
    pub object: String,
    pub created: i64,
    pub choices: Vec<EditChoice>,
    pub usage: Usage,
    #[serde(skip)]
    raw: Map<String, Value>,
}

api_response!(EditResponse, "edit");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditChoice {
    pub text: String,
    pub index: u32,
}

/// Client for edit operations.
#[derive(Clone)]
pub struct EditsClient {
    pub(crate) transporter: Arc<dyn Transporter>,
}

impl EditsClient {
    /// Create an edited version of `input` following `instruction`.
    pub fn create<P: Serialize + ?Sized>(&self, params: &P) -> Result<EditResponse> {
        let payload = Payload::create(RESOURCE, to_parameters(params)?);
        EditResponse::from_value(self.transporter.request_object(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn edit_response_maps_choices_and_usage() {
        let body = json!({
            "object": "edit",
            "created": 1664135921,
            "choices": [{"text": "What day of the week is it?\n", "index": 0}],
            "usage": {"prompt_tokens": 25, "completion_tokens": 28, "total_tokens": 53}
        });
        let resp = EditResponse::from_value(body.clone()).unwrap();
        assert_eq!(resp.choices[0].text, "What day of the week is it?\n");
        assert_eq!(resp.usage.total_tokens, 53);
        assert_eq!(resp.to_value(), body);
    }
}
