//! Trait implementations backed by the HTTP clients.

use crate::traits::{CaptionService, ConversionService, LanguageSource, VideoSearch};
use async_trait::async_trait;
use bytes::Bytes;
use captionbridge_api_client::{ApiClient, AssemblyStatus, AssemblySubmission, ConversionClient};
use captionbridge_core::{
    ApiError, LanguageEntry, SubtitleFile, TokenResponse, UploadTicket, VideoCandidate,
};

#[async_trait]
impl LanguageSource for ApiClient {
    async fn fetch_languages(&self) -> Result<Vec<LanguageEntry>, ApiError> {
        self.list_languages().await
    }
}

#[async_trait]
impl VideoSearch for ApiClient {
    async fn search_videos(
        &self,
        folder_id: &str,
        keyword: &str,
    ) -> Result<Vec<VideoCandidate>, ApiError> {
        ApiClient::search_videos(self, folder_id, keyword).await
    }
}

#[async_trait]
impl CaptionService for ApiClient {
    async fn upload_token(&self, asset_key: &str) -> Result<TokenResponse, ApiError> {
        ApiClient::upload_token(self, asset_key).await
    }

    async fn upload_caption(
        &self,
        ticket: &UploadTicket,
        lang_id: &str,
        file: &SubtitleFile,
    ) -> Result<String, ApiError> {
        ApiClient::upload_caption(self, ticket, lang_id, file).await
    }
}

#[async_trait]
impl ConversionService for ConversionClient {
    async fn submit(&self, file: &SubtitleFile) -> Result<AssemblySubmission, ApiError> {
        ConversionClient::submit(self, file).await
    }

    async fn status(&self, status_url: &str) -> Result<AssemblyStatus, ApiError> {
        ConversionClient::status(self, status_url).await
    }

    async fn download(&self, url: &str) -> Result<Bytes, ApiError> {
        ConversionClient::download(self, url).await
    }
}
