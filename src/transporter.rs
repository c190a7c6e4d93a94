use reqwest::blocking::{multipart, Client as HttpClient, RequestBuilder, Response};
use serde_json::Value;

use crate::{
    errors::{ConnectionError, Error, MalformedResponseError, Result, ValidationError},
    http::{api_error_from_value, parse_error_response, BaseUri, Headers},
    payload::{MultipartPart, MultipartValue, Payload, RenderedRequest, RequestBody},
};

/// Performs one HTTP exchange per payload and classifies failures.
///
/// Implementations return the decoded body without knowing its shape;
/// typed mapping happens in the resource clients.
pub trait Transporter: Send + Sync {
    /// Sends the payload and decodes the response body as JSON.
    fn request_object(&self, payload: Payload) -> Result<Value>;

    /// Sends the payload and returns the raw response body.
    fn request_content(&self, payload: Payload) -> Result<Vec<u8>>;
}

/// [`Transporter`] backed by a blocking `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpTransporter {
    http: HttpClient,
    base_uri: BaseUri,
    headers: Headers,
}

impl HttpTransporter {
    pub fn new(http: HttpClient, base_uri: BaseUri, headers: Headers) -> Result<Self> {
        headers.to_header_map()?;
        Ok(Self {
            http,
            base_uri,
            headers,
        })
    }

    pub fn base_uri(&self) -> &BaseUri {
        &self.base_uri
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    fn send(&self, payload: &Payload) -> Result<Response> {
        let request = payload.render(&self.base_uri, &self.headers)?;

        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!(
            "openai.http",
            method = %request.method,
            path = %payload.path()
        );
        #[cfg(feature = "tracing")]
        let _guard = span.enter();

        let builder = self.build(request)?;
        match builder.send() {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(status = %status, "request completed");
                    return Ok(resp);
                }

                #[cfg(feature = "tracing")]
                tracing::warn!(status = %status, "request failed");
                let body = resp
                    .text()
                    .map_err(|err| Error::Connection(ConnectionError::from(err)))?;
                Err(parse_error_response(status, body))
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "connection error");
                Err(ConnectionError::from(err).into())
            }
        }
    }

    fn build(&self, request: RenderedRequest) -> Result<RequestBuilder> {
        let builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers.to_header_map()?);

        Ok(match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder.body(bytes),
            RequestBody::Multipart(parts) => builder.multipart(multipart_form(parts)?),
        })
    }
}

impl Transporter for HttpTransporter {
    fn request_object(&self, payload: Payload) -> Result<Value> {
        let resp = self.send(&payload)?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|err| Error::Connection(ConnectionError::from(err)))?;

        let value: Value = serde_json::from_str(&body).map_err(|err| {
            MalformedResponseError::new("json", format!("response body is not valid JSON: {err}"))
        })?;
        if let Some(api_err) = api_error_from_value(status, &value, &body) {
            return Err(api_err.into());
        }
        Ok(value)
    }

    fn request_content(&self, payload: Payload) -> Result<Vec<u8>> {
        let resp = self.send(&payload)?;
        let status = resp.status().as_u16();
        let bytes = resp
            .bytes()
            .map_err(|err| Error::Connection(ConnectionError::from(err)))?;

        if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
            if let Some(api_err) =
                api_error_from_value(status, &value, &String::from_utf8_lossy(&bytes))
            {
                return Err(api_err.into());
            }
        }
        Ok(bytes.to_vec())
    }
}

fn multipart_form(parts: Vec<MultipartPart>) -> Result<multipart::Form> {
    let mut form = multipart::Form::new();
    for part in parts {
        form = match part.value {
            MultipartValue::Text(value) => form.text(part.name, value),
            MultipartValue::File {
                filename,
                bytes,
                mime,
            } => {
                let mut file = multipart::Part::bytes(bytes).file_name(filename);
                if let Some(mime) = mime {
                    file = file.mime_str(&mime).map_err(|err| {
                        ValidationError::new(format!("invalid mime type: {err}"))
                            .with_field(part.name.clone())
                    })?;
                }
                form.part(part.name, file)
            }
        };
    }
    Ok(form)
}
