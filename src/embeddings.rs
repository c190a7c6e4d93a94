//! Embeddings API client.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    errors::Result,
    payload::{to_parameters, Payload},
    response::{api_response, ApiResponse, Usage},
    transporter::Transporter,
};

const RESOURCE: &str = "embeddings";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmbeddingResponse {
    pub object: String,
    pub data: Vec<Embedding>,
    pub usage: Usage,
    #[serde(skip)]
    raw: Map<String, Value>,
}

api_response!(EmbeddingResponse, "embedding");

/// One embedding vector, in the order of the request inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub object: String,
    pub embedding: Vec<f64>,
    pub index: u32,
}

/// Client for embedding operations.
#[derive(Clone)]
pub struct EmbeddingsClient {
    pub(crate) transporter: Arc<dyn Transporter>,
}

impl EmbeddingsClient {
    pub fn create<P: Serialize + ?Sized>(&self, params: &P) -> Result<EmbeddingResponse> {
        let payload = Payload::create(RESOURCE, to_parameters(params)?);
        EmbeddingResponse::from_value(self.transporter.request_object(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn embedding_vectors_keep_order() {
        let body = json!({
            "object": "list",
            "data": [
                {"object": "embedding", "embedding": [0.0023064255, -0.009327292, 0.015797347], "index": 0},
                {"object": "embedding", "embedding": [-0.5], "index": 1}
            ],
            "model": "text-embedding-ada-002",
            "usage": {"prompt_tokens": 8, "total_tokens": 8}
        });
        let resp = EmbeddingResponse::from_value(body.clone()).unwrap();
        assert_eq!(resp.data.len(), 2);
        assert_eq!(resp.data[0].embedding.len(), 3);
        assert_eq!(resp.data[1].embedding, vec![-0.5]);
        assert_eq!(resp.usage.completion_tokens, None);
        assert_eq!(resp.raw()["model"], "text-embedding-ada-002");
        assert_eq!(resp.to_value(), body);
    }
}
