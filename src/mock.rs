use std::{
    collections::VecDeque,
    sync::Mutex,
};

use serde_json::Value;

use crate::{
    errors::{Error, Result, ValidationError},
    payload::Payload,
    transporter::Transporter,
};

/// In-memory [`Transporter`] for offline tests.
///
/// Results are served in the order they were queued; every payload received
/// is recorded and can be inspected with [`MockTransporter::requests`].
#[derive(Default)]
pub struct MockTransporter {
    objects: Mutex<VecDeque<Result<Value>>>,
    contents: Mutex<VecDeque<Result<Vec<u8>>>>,
    requests: Mutex<Vec<Payload>>,
}

impl MockTransporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, value: Value) -> Self {
        self.objects.lock().expect("lock poisoned").push_back(Ok(value));
        self
    }

    pub fn with_error(self, err: Error) -> Self {
        self.objects.lock().expect("lock poisoned").push_back(Err(err));
        self
    }

    pub fn with_content(self, bytes: impl Into<Vec<u8>>) -> Self {
        self.contents
            .lock()
            .expect("lock poisoned")
            .push_back(Ok(bytes.into()));
        self
    }

    pub fn with_content_error(self, err: Error) -> Self {
        self.contents.lock().expect("lock poisoned").push_back(Err(err));
        self
    }

    /// Payloads received so far, oldest first.
    pub fn requests(&self) -> Vec<Payload> {
        self.requests.lock().expect("lock poisoned").clone()
    }

    fn record(&self, payload: Payload) {
        self.requests.lock().expect("lock poisoned").push(payload);
    }
}

impl Transporter for MockTransporter {
    fn request_object(&self, payload: Payload) -> Result<Value> {
        self.record(payload);
        self.objects
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(Error::Validation(ValidationError::new("no mock response queued"))))
    }

    fn request_content(&self, payload: Payload) -> Result<Vec<u8>> {
        self.record(payload);
        self.contents
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(Error::Validation(ValidationError::new("no mock content queued"))))
    }
}

/// Canned response bodies shaped like the real API.
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::errors::{ApiError, Error};

    pub fn file() -> Value {
        json!({
            "id": "file-abc123",
            "object": "file",
            "bytes": 140,
            "created_at": 1613779121,
            "filename": "mydata.jsonl",
            "purpose": "fine-tune"
        })
    }

    pub fn completion() -> Value {
        json!({
            "id": "cmpl-uqkvlQyYK7bGYrRHQ0eXlWi7",
            "object": "text_completion",
            "created": 1589478378,
            "model": "text-davinci-003",
            "choices": [
                {"text": "\n\nThis is indeed a test", "index": 0, "logprobs": null, "finish_reason": "length"}
            ],
            "usage": {"prompt_tokens": 5, "completion_tokens": 7, "total_tokens": 12}
        })
    }

    pub fn engines() -> Value {
        json!({
            "object": "list",
            "data": [
                {"id": "gpt-neo-20b", "object": "engine", "owner": "goose.ai", "ready": true}
            ]
        })
    }

    /// The error a 401 with an invalid key produces.
    pub fn invalid_api_key() -> Error {
        Error::Api(ApiError {
            status: 401,
            error_type: Some("invalid_request_error".into()),
            code: Some("invalid_api_key".into()),
            param: None,
            message: "Invalid API key".into(),
            raw_body: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ApiResponse;

    #[test]
    fn serves_queued_results_in_order() {
        let mock = MockTransporter::new()
            .with_response(fixtures::file())
            .with_error(fixtures::invalid_api_key());

        let first = mock.request_object(Payload::list("files")).unwrap();
        assert_eq!(first, fixtures::file());
        assert!(matches!(
            mock.request_object(Payload::list("files")),
            Err(Error::Api(_))
        ));
        assert!(matches!(
            mock.request_object(Payload::list("files")),
            Err(Error::Validation(_))
        ));
        assert_eq!(mock.requests().len(), 3);
    }

    #[test]
    fn fixtures_decode_into_typed_responses() {
        crate::files::FileResponse::from_value(fixtures::file()).unwrap();
        crate::completions::CompletionResponse::from_value(fixtures::completion()).unwrap();
        crate::engines::EngineListResponse::from_value(fixtures::engines()).unwrap();
    }
}
