//! HTTP client for the remote staging endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::StagingStyle,
    error::StageErrorBody,
    protocol::{InlineImage, StageRequest, StageResponse, STAGE_PATH},
};
use tracing::{error, info, warn};
use url::Url;

use crate::{
    captured::CapturedImage,
    encoding::{decode_data_url, encode_base64, is_data_url, strip_data_url_prefix},
    error::StagingError,
};

const UNKNOWN_SERVER_ERROR: &str = "An unknown server error occurred";
const NO_ERROR_DETAILS: &str = "No error details";

#[async_trait]
pub trait StagingService: Send + Sync {
    /// Returns the URL (possibly a `data:` URL) of the staged image.
    async fn stage(
        &self,
        image: &CapturedImage,
        style: StagingStyle,
        description: &str,
    ) -> Result<String, StagingError>;
}

#[derive(Debug, Clone)]
pub struct HttpStagingClient {
    http: Client,
    server_url: Url,
}

impl HttpStagingClient {
    pub fn new(server_url: &str) -> Result<Self, StagingError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, StagingError> {
        let server_url = Url::parse(server_url.trim()).map_err(|err| {
            StagingError::Validation(format!("invalid server URL '{server_url}': {err}"))
        })?;
        Ok(Self { http, server_url })
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    fn resolve(&self, path_or_url: &str) -> Result<Url, StagingError> {
        self.server_url.join(path_or_url).map_err(|err| {
            StagingError::Validation(format!("invalid URL '{path_or_url}': {err}"))
        })
    }

    pub fn build_request(
        image: &CapturedImage,
        style: StagingStyle,
        description: &str,
    ) -> Result<StageRequest, StagingError> {
        if image.is_empty() {
            return Err(StagingError::Encoding(format!(
                "'{}' contains no data",
                image.file_name()
            )));
        }
        let data = encode_base64(image.bytes());
        Ok(StageRequest {
            image: InlineImage {
                data: strip_data_url_prefix(&data).to_string(),
                mime_type: image.mime_type(),
            },
            style,
            description: description.to_string(),
        })
    }

    /// Loads the bytes behind a staged image URL for local display.
    pub async fn fetch_image(&self, image_url: &str) -> Result<Vec<u8>, StagingError> {
        if is_data_url(image_url) {
            let (_, bytes) = decode_data_url(image_url)?;
            return Ok(bytes);
        }
        let url = self.resolve(image_url)?;
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "staged image download failed");
            return Err(StagingError::Download {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

fn service_error(status: StatusCode, detail: String) -> StagingError {
    StagingError::Service {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
        detail,
    }
}

#[async_trait]
impl StagingService for HttpStagingClient {
    async fn stage(
        &self,
        image: &CapturedImage,
        style: StagingStyle,
        description: &str,
    ) -> Result<String, StagingError> {
        let request = Self::build_request(image, style, description)?;
        let endpoint = self.resolve(STAGE_PATH)?;
        info!(
            %endpoint,
            style = style.label(),
            mime = image.mime_type().as_str(),
            len = image.len(),
            "submitting staging request"
        );

        let response = self
            .http
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                error!("staging request failed to send: {err}");
                StagingError::Transport(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<serde_json::Value>().await {
                Ok(value) => StageErrorBody::from_value(value)
                    .detail()
                    .unwrap_or_else(|| NO_ERROR_DETAILS.to_string()),
                Err(_) => UNKNOWN_SERVER_ERROR.to_string(),
            };
            error!(status = status.as_u16(), %detail, "staging endpoint returned error");
            return Err(service_error(status, detail));
        }

        let body: StageResponse = response.json().await.map_err(|err| {
            error!("invalid staging response payload: {err}");
            StagingError::MalformedResponse(err.to_string())
        })?;

        match body.image_url {
            Some(url) if !url.trim().is_empty() => Ok(url),
            _ => {
                warn!("staging response did not include an image URL");
                Err(StagingError::MissingImageUrl)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/staging_tests.rs"]
mod tests;
