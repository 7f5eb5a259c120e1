//! HTTP clients for captionbridge.
//!
//! [`ApiClient`] talks to the video-hosting API (folders, languages, video
//! search, upload tokens and caption upload) with `x-api-key` auth.
//! [`ConversionClient`] drives the external subtitle conversion service.

pub mod api;
pub mod conversion;
pub mod search;

use captionbridge_core::{ApiError, UploadError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use conversion::{AssemblyResult, AssemblyStatus, AssemblySubmission, ConversionClient};
pub use search::normalize_search_response;

/// HTTP client for the video-hosting API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    /// Create a client. A blank `api_key` is rejected before any request is made.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, UploadError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(UploadError::Credential);
        }

        let client = build_http_client(timeout)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("x-api-key", self.api_key.as_str())
    }

    /// GET request against an already-built URL. Deserializes JSON response.
    pub async fn get_url<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut request = self.apply_auth(self.client.get(url));
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(transport_error)?;
        let response = ensure_success(response).await?;
        decode_json(response).await
    }

    /// GET request relative to the base URL.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        self.get_url(&self.build_url(path), query).await
    }

    /// Raw client for requests outside the base URL (e.g. upload URLs).
    pub fn client(&self) -> &Client {
        &self.client
    }
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<Client, UploadError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| UploadError::HttpClient(format!("Failed to create HTTP client: {}", e)))
}

pub(crate) fn transport_error(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

/// Turn a non-success response into [`ApiError::Status`] carrying the body.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}
