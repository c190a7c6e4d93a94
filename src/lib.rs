//! Minimal blocking Rust SDK for OpenAI-compatible APIs.
//!
//! Every call goes through the same path: a [`Payload`] describes the
//! operation, a [`Transporter`] performs the HTTP exchange and classifies
//! failures, and an [`ApiResponse`] mapper validates the decoded body.
//!
//! ```rust,no_run
//! use serde_json::json;
//!
//! let client = openai_client::client("sk-...")?;
//! let completion = client.completions()?.create(&json!({
//!     "model": "text-davinci-003",
//!     "prompt": "Say this is a test",
//! }))?;
//! println!("{}", completion.choices[0].text);
//! # Ok::<(), openai_client::Error>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::result_large_err)]

/// Default API base URL (scheme defaults to `https://`).
pub const DEFAULT_BASE_URL: &str = "api.openai.com/v1";

/// GooseAI base URL, used by [`Config::goose_ai`].
pub const GOOSE_AI_BASE_URL: &str = "https://api.goose.ai/v1";

/// Default User-Agent header value.
pub(crate) const DEFAULT_USER_AGENT: &str =
    concat!("openai-client-rust/", env!("CARGO_PKG_VERSION"));

/// Default connection timeout (5 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Default request timeout (120 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(120);

/// HTTP header name for the organization a request is billed to.
pub const ORGANIZATION_HEADER: &str = "OpenAI-Organization";

mod api_key;
mod capabilities;
mod client;
mod completions;
mod edits;
mod embeddings;
mod engines;
mod errors;
mod files;
mod fine_tunes;
mod http;
mod images;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod models;
mod moderations;
mod payload;
mod response;
#[cfg(any(test, feature = "mock"))]
pub mod testing;
mod transporter;

pub use api_key::ApiKey;
pub use capabilities::{Capabilities, Capability, DEFAULT_CAPABILITIES};
pub use client::{Client, Config, ModelCatalog};
pub use completions::{CompletionChoice, CompletionLogprobs, CompletionResponse, CompletionsClient};
pub use edits::{EditChoice, EditResponse, EditsClient};
pub use embeddings::{Embedding, EmbeddingResponse, EmbeddingsClient};
pub use engines::{EngineListResponse, EngineResponse, EnginesClient};
pub use errors::{
    ApiError, CapabilityError, ConnectionError, ConnectionErrorKind, Error,
    MalformedResponseError, Result, TransportError, ValidationError,
};
pub use files::{FileListResponse, FileResponse, FilesClient};
pub use fine_tunes::{
    FineTuneEvent, FineTuneEventListResponse, FineTuneHyperparams, FineTuneListResponse,
    FineTuneResponse, FineTunesClient,
};
pub use http::{BaseUri, ContentType, HeaderEntry, Headers};
pub use images::{ImageData, ImageResponse, ImagesClient};
#[cfg(any(test, feature = "mock"))]
pub use mock::{fixtures, MockTransporter};
pub use models::{ModelListResponse, ModelPermission, ModelResponse, ModelsClient};
pub use moderations::{ModerationResponse, ModerationResult, ModerationsClient};
pub use payload::{
    to_parameters, MultipartPart, MultipartValue, Parameters, Payload, PayloadBody,
    RenderedRequest, RequestBody,
};
pub use response::{ApiResponse, DeleteResponse, Usage};
pub use transporter::{HttpTransporter, Transporter};

/// Creates a client for the default OpenAI endpoint with default capabilities.
pub fn client(api_key: impl Into<String>) -> Result<Client> {
    Client::new(Config::new(api_key))
}
