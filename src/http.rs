use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    StatusCode, Url,
};
use serde_json::Value;

use crate::{
    api_key::ApiKey,
    errors::{ApiError, Error, Result, TransportError, ValidationError},
    ORGANIZATION_HEADER,
};

/// Validated API origin plus path prefix, always rendered with a trailing `/`.
///
/// A missing scheme defaults to `https://`, so `api.openai.com/v1` and
/// `https://api.openai.com/v1/` are the same base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUri(Url);

impl BaseUri {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self> {
        let trimmed = raw.as_ref().trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(Error::Validation(
                ValidationError::new("base url is required").with_field("base_url"),
            ));
        }

        let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            format!("{trimmed}/")
        } else {
            format!("https://{trimmed}/")
        };

        let url = Url::parse(&with_scheme).map_err(|err| {
            Error::Validation(
                ValidationError::new(format!("invalid base url: {err}")).with_field("base_url"),
            )
        })?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(Error::Validation(
                ValidationError::new("base url must have a host").with_field("base_url"),
            ));
        }
        Ok(Self(url))
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for BaseUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body content types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentType {
    Json,
    Multipart,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::Multipart => "multipart/form-data",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderEntry {
    pub key: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(key: String, value: String) -> Self {
        Self { key, value }
    }
}

/// Ordered request headers.
///
/// The only way to obtain a `Headers` value is [`Headers::with_authorization`],
/// so the `Authorization` header is always present. Every `with_*` method
/// returns a new value and replaces any existing header of the same name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Headers(Vec<HeaderEntry>);

impl Headers {
    pub fn with_authorization(api_key: &ApiKey) -> Self {
        Self(vec![HeaderEntry::new(
            AUTHORIZATION.as_str().to_string(),
            format!("Bearer {}", api_key.as_str()),
        )])
    }

    pub fn with_organization(&self, organization: impl Into<String>) -> Self {
        self.with_header(ORGANIZATION_HEADER, organization)
    }

    pub fn with_content_type(&self, content_type: ContentType) -> Self {
        self.with_header(CONTENT_TYPE.as_str(), content_type.as_str())
    }

    pub fn with_header(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let mut entries: Vec<HeaderEntry> = self
            .0
            .iter()
            .filter(|entry| !entry.key.eq_ignore_ascii_case(&key))
            .cloned()
            .collect();
        entries.push(HeaderEntry::new(key, value.into()));
        Self(entries)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|entry| entry.key.eq_ignore_ascii_case(key))
            .map(|entry| entry.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.0.len());
        for entry in &self.0 {
            let name = HeaderName::from_bytes(entry.key.as_bytes()).map_err(|err| {
                ValidationError::new(format!("invalid header name: {err}")).with_field(&entry.key)
            })?;
            let value = HeaderValue::from_str(&entry.value).map_err(|err| {
                ValidationError::new(format!("invalid header value: {err}")).with_field(&entry.key)
            })?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

/// Classifies a decoded body that carries an `{"error": {...}}` envelope.
pub(crate) fn api_error_from_value(status: u16, value: &Value, raw_body: &str) -> Option<ApiError> {
    let err_obj = value.get("error")?.as_object()?;

    let message = match err_obj.get("message") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("request failed")
            .to_string(),
    };

    Some(ApiError {
        status,
        error_type: string_field(err_obj.get("type")),
        code: string_field(err_obj.get("code")),
        param: string_field(err_obj.get("param")),
        message,
        raw_body: Some(raw_body.to_string()),
    })
}

/// Builds the error for a non-success response.
pub(crate) fn parse_error_response(status: StatusCode, body: String) -> Error {
    let status_code = status.as_u16();

    if let Ok(value) = serde_json::from_str::<Value>(&body) {
        if let Some(api_err) = api_error_from_value(status_code, &value, &body) {
            return api_err.into();
        }
    }

    TransportError {
        status: status_code,
        body,
    }
    .into()
}

fn string_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
