//! Logical API operations and their rendering into concrete HTTP requests.
//!
//! A [`Payload`] names the operation (method, resource path, query, body)
//! without knowing where it is sent. [`Payload::render`] turns it into a
//! [`RenderedRequest`] against a [`BaseUri`] and [`Headers`]; it performs no I/O.

use std::path::Path;

use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    errors::{Error, Result, ValidationError},
    http::{BaseUri, ContentType, Headers},
};

/// JSON request parameters, sent verbatim as the request body.
pub type Parameters = Map<String, Value>;

/// Converts any serializable value into request parameters.
///
/// The value must serialize to a JSON object.
pub fn to_parameters<P: Serialize + ?Sized>(params: &P) -> Result<Parameters> {
    match serde_json::to_value(params)? {
        Value::Object(map) => Ok(map),
        _ => Err(Error::Validation(ValidationError::new(
            "request parameters must serialize to a JSON object",
        ))),
    }
}

/// Value carried by one multipart field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MultipartValue {
    Text(String),
    File {
        filename: String,
        bytes: Vec<u8>,
        mime: Option<String>,
    },
}

/// A named multipart form field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultipartPart {
    pub name: String,
    pub value: MultipartValue,
}

impl MultipartPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: MultipartValue::Text(value.into()),
        }
    }

    pub fn file(name: impl Into<String>, filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            value: MultipartValue::File {
                filename: filename.into(),
                bytes,
                mime: None,
            },
        }
    }

    /// Reads `path` into a file part named after the file on disk.
    pub fn file_from_path(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| {
            ValidationError::new(format!("failed to read {}: {err}", path.display()))
                .with_field("file")
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        Ok(Self::file(name, filename, bytes))
    }

    /// Sets the MIME type of a file part. Has no effect on text parts.
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        if let MultipartValue::File { mime: slot, .. } = &mut self.value {
            *slot = Some(mime.into());
        }
        self
    }
}

/// The single body representation of a payload.
#[derive(Clone, Debug, PartialEq)]
pub enum PayloadBody {
    None,
    Json(Parameters),
    Multipart(Vec<MultipartPart>),
}

/// Immutable description of one logical API operation.
#[derive(Clone, Debug, PartialEq)]
pub struct Payload {
    method: Method,
    resource: String,
    id: Option<String>,
    suffix: Option<String>,
    query: Vec<(String, String)>,
    body: PayloadBody,
}

impl Payload {
    fn new(method: Method, resource: &str, id: Option<&str>, body: PayloadBody) -> Self {
        Self {
            method,
            resource: resource.to_string(),
            id: id.map(str::to_string),
            suffix: None,
            query: Vec::new(),
            body,
        }
    }

    /// `GET /{resource}`
    pub fn list(resource: &str) -> Self {
        Self::new(Method::GET, resource, None, PayloadBody::None)
    }

    /// `GET /{resource}/{id}`
    pub fn retrieve(resource: &str, id: &str) -> Self {
        Self::new(Method::GET, resource, Some(id), PayloadBody::None)
    }

    /// `GET /{resource}/{id}/{suffix}`
    pub fn retrieve_with_suffix(resource: &str, id: &str, suffix: &str) -> Self {
        let mut payload = Self::retrieve(resource, id);
        payload.suffix = Some(suffix.to_string());
        payload
    }

    /// `GET /{resource}/{id}/content`
    pub fn retrieve_content(resource: &str, id: &str) -> Self {
        Self::retrieve_with_suffix(resource, id, "content")
    }

    /// `POST /{resource}` with a JSON body.
    pub fn create(resource: &str, params: Parameters) -> Self {
        Self::new(Method::POST, resource, None, PayloadBody::Json(params))
    }

    /// `POST /{resource}` with a multipart body.
    pub fn upload(resource: &str, parts: Vec<MultipartPart>) -> Self {
        Self::new(Method::POST, resource, None, PayloadBody::Multipart(parts))
    }

    /// `POST /{resource}/{id}/cancel`
    pub fn cancel(resource: &str, id: &str) -> Self {
        let mut payload = Self::new(Method::POST, resource, Some(id), PayloadBody::None);
        payload.suffix = Some("cancel".to_string());
        payload
    }

    /// `DELETE /{resource}/{id}`
    pub fn delete(resource: &str, id: &str) -> Self {
        Self::new(Method::DELETE, resource, Some(id), PayloadBody::None)
    }

    /// Appends a query parameter. Parameters render in insertion order.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Resource path relative to the base URI, e.g. `/files/file-abc123`.
    pub fn path(&self) -> String {
        let mut path = String::new();
        for segment in self.segments() {
            path.push('/');
            path.push_str(segment);
        }
        path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> &PayloadBody {
        &self.body
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        let resource = self.resource.split('/').filter(|s| !s.is_empty());
        let suffix = self
            .suffix
            .as_deref()
            .into_iter()
            .flat_map(|s| s.split('/'))
            .filter(|s| !s.is_empty());
        resource.chain(self.id.as_deref()).chain(suffix)
    }

    /// Rejects ids and suffix segments that would not survive as their own
    /// path segment (`""`, `.`, `..`).
    fn check_segments(&self) -> Result<()> {
        let suffix = self.suffix.as_deref().into_iter().flat_map(|s| s.split('/'));
        for segment in self.id.as_deref().into_iter().chain(suffix) {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(ValidationError::new(format!("invalid resource id {segment:?}"))
                    .with_field("id")
                    .into());
            }
        }
        Ok(())
    }

    /// Renders the payload into a concrete request. Pure and deterministic.
    pub fn render(&self, base_uri: &BaseUri, headers: &Headers) -> Result<RenderedRequest> {
        self.check_segments()?;
        let mut url = base_uri.url().clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ValidationError::new("base url cannot carry a path").with_field("base_url")
            })?;
            segments.pop_if_empty();
            segments.extend(self.segments());
        }
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        let (headers, body) = match &self.body {
            PayloadBody::None => (headers.clone(), RequestBody::Empty),
            PayloadBody::Json(params) => (
                headers.with_content_type(ContentType::Json),
                RequestBody::Json(serde_json::to_vec(params)?),
            ),
            PayloadBody::Multipart(parts) => (headers.clone(), RequestBody::Multipart(parts.clone())),
        };

        Ok(RenderedRequest {
            method: self.method.clone(),
            url,
            headers,
            body,
        })
    }
}

/// Body of a rendered request.
///
/// Multipart parts stay structured: the transport generates the boundary and
/// the matching `Content-Type` header when it encodes them.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Vec<u8>),
    Multipart(Vec<MultipartPart>),
}

impl RequestBody {
    pub fn content_type(&self) -> Option<ContentType> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Json(_) => Some(ContentType::Json),
            RequestBody::Multipart(_) => Some(ContentType::Multipart),
        }
    }
}

/// A payload resolved against a base URI and header set.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Headers,
    pub body: RequestBody,
}
