//! Client for the Transloadit assembly API used to convert subtitle formats.

use crate::{build_http_client, decode_json, ensure_success, transport_error};
use bytes::Bytes;
use captionbridge_core::{ApiError, ConversionConfig, SubtitleFile, UploadError};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

/// Response to an assembly submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssemblySubmission {
    #[serde(default)]
    pub ok: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, alias = "assemblyId")]
    pub assembly_id: Option<String>,
    #[serde(default, alias = "assemblySslUrl")]
    pub assembly_ssl_url: Option<String>,
    #[serde(default, alias = "assemblyUrl")]
    pub assembly_url: Option<String>,
}

impl AssemblySubmission {
    /// Status URL to poll, secure variant first.
    pub fn status_url(&self) -> Option<&str> {
        self.assembly_ssl_url
            .as_deref()
            .or(self.assembly_url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

/// One output file of a finished assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssemblyResult {
    #[serde(default, alias = "sslUrl")]
    pub ssl_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl AssemblyResult {
    pub fn download_url(&self) -> Option<&str> {
        self.ssl_url.as_deref().or(self.url.as_deref())
    }
}

/// Response to an assembly status poll.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssemblyStatus {
    #[serde(default)]
    pub ok: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Result groups keyed by step name, in the order the service sent them.
    #[serde(default)]
    pub results: Map<String, Value>,
}

impl AssemblyStatus {
    /// First entry of the first result group.
    pub fn first_result(&self) -> Option<AssemblyResult> {
        let first = self.results.values().next()?.as_array()?.first()?;
        serde_json::from_value(first.clone()).ok()
    }
}

/// Transloadit client
#[derive(Clone)]
pub struct ConversionClient {
    client: Client,
    api_url: String,
    auth_key: String,
    template_id: String,
}

impl Debug for ConversionClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ConversionClient")
            .field("api_url", &self.api_url)
            .field("template_id", &self.template_id)
            .finish()
    }
}

impl ConversionClient {
    pub fn new(config: &ConversionConfig, timeout: Duration) -> Result<Self, UploadError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            auth_key: config.auth_key.clone(),
            template_id: config.template_id.clone(),
        })
    }

    fn params(&self) -> Value {
        json!({
            "auth": { "key": self.auth_key },
            "template_id": self.template_id,
        })
    }

    /// Submit a file as a new assembly.
    pub async fn submit(&self, file: &SubtitleFile) -> Result<AssemblySubmission, ApiError> {
        let form = Form::new().text("params", self.params().to_string()).part(
            "file",
            Part::bytes(file.data.to_vec()).file_name(file.name.clone()),
        );

        let response = self
            .client
            .post(format!("{}/assemblies", self.api_url))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;
        decode_json(response).await
    }

    /// Fetch the current status of an assembly.
    pub async fn status(&self, status_url: &str) -> Result<AssemblyStatus, ApiError> {
        let response = self
            .client
            .get(status_url)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;
        decode_json(response).await
    }

    /// Download a converted file.
    pub async fn download(&self, url: &str) -> Result<Bytes, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;
        response.bytes().await.map_err(transport_error)
    }
}
