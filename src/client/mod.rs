mod normalize;
pub mod transport;

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::{
    config::ApiConfig,
    error::{ClientError, Result},
    models::{
        ApiError, ErrorCode, GenerationRequest, GenerationResponse, PollStatusRequest,
        PollStatusResponse,
    },
};

pub use transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};

pub const GENERATE_PATH: &str = "/api/image-editing/v1/generate";
pub const RESULT_PATH: &str = "/api/image-editing/v1/result";

/// Client for the Nano Banana image-editing backend.
///
/// Each call makes exactly one HTTP request and never returns an error:
/// failures come back as [`GenerationResponse::Failure`] or
/// [`PollStatusResponse::Failed`]. Polling cadence is up to the caller.
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Submits an image edit. On success the result carries the request id
    /// to poll with; the output image usually arrives through
    /// [`poll_status`](Self::poll_status).
    pub async fn generate_image(&self, request: &GenerationRequest) -> GenerationResponse {
        let url = self.config.endpoint(GENERATE_PATH);
        log::info!(
            "Submitting image edit to {} (masked: {})",
            url,
            request.is_masked()
        );
        let started = Instant::now();

        let outcome = self
            .post(url, normalize::generation_body(request))
            .await
            .and_then(normalize::generation_result);

        match outcome {
            Ok(result) => {
                log::debug!(
                    "Generation accepted in {}ms, request id {}",
                    started.elapsed().as_millis(),
                    result.request_id.as_deref().unwrap_or_default()
                );
                GenerationResponse::Success(result)
            }
            Err(e) => {
                log::error!("Generation failed: {}", e);
                GenerationResponse::Failure(ApiError::from_error(ErrorCode::GenerationFailed, e))
            }
        }
    }

    /// Asks the backend once for the state of `request.request_id`.
    pub async fn poll_status(&self, request: &PollStatusRequest) -> PollStatusResponse {
        let url = self.config.endpoint(RESULT_PATH);
        log::debug!("Polling {} for {}", url, request.request_id);

        let outcome = self
            .post(url, normalize::poll_body(&request.request_id))
            .await
            .and_then(|response| normalize::poll_result(&request.request_id, response));

        match outcome {
            Ok(status) => {
                log::debug!("Request {} is {}", request.request_id, status.status());
                status
            }
            Err(e) => {
                log::error!("Polling failed: {}", e);
                PollStatusResponse::Failed(ApiError::from_error(ErrorCode::PollingFailed, e))
            }
        }
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth = HeaderValue::from_str(self.config.api_key().unwrap_or_default())
            .map_err(|_| ClientError::InvalidHeader("Authorization".into()))?;
        headers.insert(AUTHORIZATION, auth);

        for (name, value) in self.config.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ClientError::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| ClientError::InvalidHeader(name.to_string()))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    async fn post(&self, url: String, body: Value) -> Result<TransportResponse> {
        let headers = self.build_headers()?;
        self.transport
            .post_json(TransportRequest {
                url,
                headers,
                body,
                timeout: self.config.timeout(),
            })
            .await
    }
}

/// Builds a client with the [`ApiConfig::nano_banana`] preset.
pub fn create_nano_banana_client(base_url: impl Into<String>, api_key: Option<String>) -> ApiClient {
    ApiClient::new(ApiConfig::nano_banana(base_url, api_key))
}
