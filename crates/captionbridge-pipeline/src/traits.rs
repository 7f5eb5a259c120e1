//! Seams between the pipeline and the outside world.

use async_trait::async_trait;
use bytes::Bytes;
use captionbridge_api_client::{AssemblyStatus, AssemblySubmission};
use captionbridge_core::{
    ApiError, LanguageEntry, SubtitleFile, TokenResponse, UploadTicket, VideoCandidate,
};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Source of the caption language catalog
#[async_trait]
pub trait LanguageSource: Send + Sync {
    async fn fetch_languages(&self) -> Result<Vec<LanguageEntry>, ApiError>;
}

/// Title search inside a folder
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search_videos(
        &self,
        folder_id: &str,
        keyword: &str,
    ) -> Result<Vec<VideoCandidate>, ApiError>;
}

/// Upload-token issuance and caption submission
#[async_trait]
pub trait CaptionService: Send + Sync {
    async fn upload_token(&self, asset_key: &str) -> Result<TokenResponse, ApiError>;

    async fn upload_caption(
        &self,
        ticket: &UploadTicket,
        lang_id: &str,
        file: &SubtitleFile,
    ) -> Result<String, ApiError>;
}

/// External subtitle format conversion jobs
#[async_trait]
pub trait ConversionService: Send + Sync {
    async fn submit(&self, file: &SubtitleFile) -> Result<AssemblySubmission, ApiError>;

    async fn status(&self, status_url: &str) -> Result<AssemblyStatus, ApiError>;

    async fn download(&self, url: &str) -> Result<Bytes, ApiError>;
}

/// Wall-clock source
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Suspension between conversion polls
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
