//! Voice and video uploads.

use crate::apis::models::MediaKind;
use crate::retrieve::{Gateway, GatewayError, RequestBody, RequestOptions};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

/// Media endpoints.
#[derive(Clone)]
pub struct MediaApi {
    gateway: Gateway,
}

impl MediaApi {
    /// Wraps `gateway`.
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// `POST /embed` with a multipart body of `file` and `type`.
    ///
    /// The default JSON content type is removed so the transport can set the
    /// multipart boundary.
    pub async fn create_embedding(
        &self,
        media: Vec<u8>,
        file_name: &str,
        kind: MediaKind,
    ) -> Result<Value, GatewayError> {
        const ENDPOINT: &str = "/embed";

        let part = match Part::bytes(media)
            .file_name(file_name.to_string())
            .mime_str(kind.mime())
        {
            Ok(part) => part,
            Err(e) => {
                let err = GatewayError::InvalidRequest {
                    message: format!("Invalid media type '{}': {}", kind.mime(), e),
                };
                return Err(self.gateway.report_failure(ENDPOINT, err));
            }
        };

        let form = Form::new().part("file", part).text("type", kind.as_str());
        let options = RequestOptions::post()
            .without_header(CONTENT_TYPE.as_str())
            .body(RequestBody::Multipart(form));

        self.gateway.send(ENDPOINT, options).await
    }
}
