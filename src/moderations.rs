//! Moderations API client.
//!
//! Classifies whether input text violates the provider's content policy.

use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    errors::Result,
    payload::{to_parameters, Payload},
    response::{api_response, ApiResponse},
    transporter::Transporter,
};

const RESOURCE: &str = "moderations";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModerationResponse {
    pub id: String,
    pub model: String,
    pub results: Vec<ModerationResult>,
    #[serde(skip)]
    raw: Map<String, Value>,
}

api_response!(ModerationResponse, "moderation");

/// Per-input classification, keyed by category name (e.g. `hate/threatening`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationResult {
    pub categories: BTreeMap<String, bool>,
    pub category_scores: BTreeMap<String, f64>,
    pub flagged: bool,
}

/// Client for moderation operations.
#[derive(Clone)]
pub struct ModerationsClient {
    pub(crate) transporter: Arc<dyn Transporter>,
}

impl ModerationsClient {
    pub fn create<P: Serialize + ?Sized>(&self, params: &P) -> Result<ModerationResponse> {
        let payload = Payload::create(RESOURCE, to_parameters(params)?);
        ModerationResponse::from_value(self.transporter.request_object(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn moderation_categories_and_scores() {
        let body = json!({
            "id": "modr-5MWoLO",
            "model": "text-moderation-001",
            "results": [{
                "categories": {"hate": false, "hate/threatening": true, "violence": true},
                "category_scores": {"hate": 0.22, "hate/threatening": 0.6, "violence": 0.99},
                "flagged": true
            }]
        });
        let resp = ModerationResponse::from_value(body.clone()).unwrap();
        let result = &resp.results[0];
        assert!(result.flagged);
        assert_eq!(result.categories["hate/threatening"], true);
        assert_eq!(result.category_scores["violence"], 0.99);
        assert_eq!(resp.to_value(), body);
    }

    #[test]
    fn score_must_be_numeric() {
        let body = json!({
            "id": "modr-1",
            "model": "text-moderation-001",
            "results": [{"categories": {}, "category_scores": {"hate": "high"}, "flagged": false}]
        });
        assert!(ModerationResponse::from_value(body).is_err());
    }
}
