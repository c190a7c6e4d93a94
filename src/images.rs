//! Image generation API client.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    errors::Result,
    payload::{to_parameters, MultipartPart, Payload},
    response::{api_response, ApiResponse},
    transporter::Transporter,
};

/// Generated images, returned by create, edit and variation alike.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageResponse {
    pub created: i64,
    pub data: Vec<ImageData>,
    #[serde(skip)]
    raw: Map<String, Value>,
}

api_response!(ImageResponse, "image");

/// One generated image: a URL or base64 JSON depending on `response_format`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,
}

/// Client for image operations.
///
/// # Example
///
/// ```rust,ignore
/// use openai_client::MultipartPart;
/// use serde_json::json;
///
/// let images = client.images()?;
/// let generated = images.create(&json!({"prompt": "A cute baby sea otter", "n": 1}))?;
/// println!("{}", generated.data[0].url.as_deref().unwrap_or_default());
///
/// let edited = images.edit(vec![
///     MultipartPart::file_from_path("image", "otter.png")?,
///     MultipartPart::text("prompt", "Add a hat"),
/// ])?;
/// ```
#[derive(Clone)]
pub struct ImagesClient {
    pub(crate) transporter: Arc<dyn Transporter>,
}

impl ImagesClient {
    /// Generate images from a text prompt.
    pub fn create<P: Serialize + ?Sized>(&self, params: &P) -> Result<ImageResponse> {
        let payload = Payload::create("images/generations", to_parameters(params)?);
        ImageResponse::from_value(self.transporter.request_object(payload)?)
    }

    /// Edit an uploaded image given a prompt (and optional mask).
    pub fn edit(&self, parts: Vec<MultipartPart>) -> Result<ImageResponse> {
        let payload = Payload::upload("images/edits", parts);
        ImageResponse::from_value(self.transporter.request_object(payload)?)
    }

    /// Create variations of an uploaded image.
    pub fn variation(&self, parts: Vec<MultipartPart>) -> Result<ImageResponse> {
        let payload = Payload::upload("images/variations", parts);
        ImageResponse::from_value(self.transporter.request_object(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn url_and_base64_images() {
        let body = json!({
            "created": 1589478378,
            "data": [{"url": "https://example.com/a.png"}, {"b64_json": "aGVsbG8="}]
        });
        let resp = ImageResponse::from_value(body.clone()).unwrap();
        assert_eq!(resp.data[0].url.as_deref(), Some("https://example.com/a.png"));
        assert_eq!(resp.data[1].b64_json.as_deref(), Some("aGVsbG8="));
        assert_eq!(resp.data[1].url, None);
        assert_eq!(resp.to_value(), body);
    }
}
