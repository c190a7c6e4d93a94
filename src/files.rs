//! Files API client.
//!
//! Files are uploaded documents used by other endpoints such as fine-tuning.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    errors::Result,
    payload::{MultipartPart, Payload},
    response::{api_response, ApiResponse, DeleteResponse},
    transporter::Transporter,
};

const RESOURCE: &str = "files";

/// A file object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileResponse {
    pub id: String,
    pub object: String,
    pub bytes: u64,
    pub created_at: i64,
    pub filename: String,
    pub purpose: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_details: Option<Value>,
    #[serde(skip)]
    raw: Map<String, Value>,
}

api_response!(FileResponse, "file");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileListResponse {
    pub object: String,
    #[serde(deserialize_with = "crate::response::nested")]
    pub data: Vec<FileResponse>,
    #[serde(skip)]
    raw: Map<String, Value>,
}

api_response!(FileListResponse, "file list");

/// Client for file operations.
#[derive(Clone)]
pub struct FilesClient {
    pub(crate) transporter: Arc<dyn Transporter>,
}

impl FilesClient {
    /// List files that belong to the organization.
    pub fn list(&self) -> Result<FileListResponse> {
        let value = self.transporter.request_object(Payload::list(RESOURCE))?;
        FileListResponse::from_value(value)
    }

    /// List files uploaded for a given purpose, e.g. `fine-tune`.
    pub fn list_by_purpose(&self, purpose: &str) -> Result<FileListResponse> {
        let payload = Payload::list(RESOURCE).with_query("purpose", purpose);
        FileListResponse::from_value(self.transporter.request_object(payload)?)
    }

    pub fn retrieve(&self, file_id: &str) -> Result<FileResponse> {
        let value = self
            .transporter
            .request_object(Payload::retrieve(RESOURCE, file_id))?;
        FileResponse::from_value(value)
    }

    /// Download the raw contents of a file.
    pub fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        self.transporter
            .request_content(Payload::retrieve_content(RESOURCE, file_id))
    }

    /// Upload a file as multipart form data.
    ///
    /// The API expects a `file` part and a `purpose` text part.
    pub fn upload(&self, parts: Vec<MultipartPart>) -> Result<FileResponse> {
        let value = self
            .transporter
            .request_object(Payload::upload(RESOURCE, parts))?;
        FileResponse::from_value(value)
    }

    pub fn delete(&self, file_id: &str) -> Result<DeleteResponse> {
        let value = self
            .transporter
            .request_object(Payload::delete(RESOURCE, file_id))?;
        DeleteResponse::from_value(value)
    }
}
