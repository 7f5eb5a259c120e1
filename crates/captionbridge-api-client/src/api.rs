//! Domain methods for the video-hosting API.

use crate::search::{encode_component, normalize_search_response};
use crate::{ensure_success, transport_error, ApiClient};
use captionbridge_core::{
    ApiError, Folder, LanguageEntry, SubtitleFile, TokenResponse, UploadTicket, VideoCandidate,
};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::Deserialize;

pub const FOLDER_LIST_PATH: &str = "/info/videopack/folder/v1/info.json";
pub const LANGUAGE_LIST_PATH: &str = "/info/videopack/caption/v1/language.json";
pub const VIDEO_SEARCH_PATH: &str = "/info/videopack/video/v1/list.json";
pub const UPLOAD_TOKEN_PATH: &str = "/info/videopack/caption/v1/upload/token.json";

#[derive(Debug, Deserialize)]
struct FolderListResponse {
    #[serde(rename = "folderList", default)]
    folder_list: Option<Vec<Folder>>,
}

#[derive(Debug, Deserialize)]
struct LanguageListResponse {
    caption: CaptionLanguages,
}

#[derive(Debug, Deserialize)]
struct CaptionLanguages {
    #[serde(default)]
    language: Vec<LanguageEntry>,
}

impl ApiClient {
    /// List the folders available to this API key.
    pub async fn list_folders(&self) -> Result<Vec<Folder>, ApiError> {
        let response: FolderListResponse = self.get(FOLDER_LIST_PATH, &[]).await?;
        Ok(response.folder_list.unwrap_or_default())
    }

    /// Fetch the caption language catalog.
    pub async fn list_languages(&self) -> Result<Vec<LanguageEntry>, ApiError> {
        let response: LanguageListResponse = self.get(LANGUAGE_LIST_PATH, &[]).await?;
        Ok(response.caption.language)
    }

    /// Search videos by title inside a folder.
    ///
    /// The keyword is percent-encoded byte by byte (UTF-8 octets) rather than
    /// form-encoded, which is what the search endpoint expects for non-ASCII
    /// titles.
    pub async fn search_videos(
        &self,
        folder_id: &str,
        keyword: &str,
    ) -> Result<Vec<VideoCandidate>, ApiError> {
        let url = format!(
            "{}?folderId={}&searchItem=title&keyword={}",
            self.build_url(VIDEO_SEARCH_PATH),
            encode_component(folder_id),
            encode_component(keyword),
        );

        tracing::debug!(folder_id = %folder_id, keyword = %keyword, "Searching videos");
        let body: serde_json::Value = self.get_url(&url, &[]).await?;
        Ok(normalize_search_response(&body))
    }

    /// Request an upload token for a video asset.
    pub async fn upload_token(&self, access_key: &str) -> Result<TokenResponse, ApiError> {
        self.get(UPLOAD_TOKEN_PATH, &[("accessKey", access_key)])
            .await
    }

    /// Upload a caption file to the URL issued with `ticket`.
    ///
    /// Returns the response body; any non-2xx answer is an error carrying it.
    pub async fn upload_caption(
        &self,
        ticket: &UploadTicket,
        lang_id: &str,
        file: &SubtitleFile,
    ) -> Result<String, ApiError> {
        let mut url = Url::parse(&ticket.upload_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", ticket.upload_url, e)))?;
        url.query_pairs_mut().append_pair("token", &ticket.token);

        let form = Form::new()
            .text("token", ticket.token.clone())
            .text("langId", lang_id.to_string())
            .part(
                "file",
                Part::bytes(file.data.to_vec()).file_name(file.name.clone()),
            );

        let response = self
            .client()
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;
        response.text().await.map_err(transport_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_payload_shape() {
        let body = r#"{"caption": {"language": [
            {"langId": 1, "language": "Korean", "code": "ko"},
            {"langId": "2", "language": "English", "code": "en"}
        ]}}"#;
        let parsed: LanguageListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.caption.language.len(), 2);
        assert_eq!(parsed.caption.language[0].lang_id, "1");
    }

    #[test]
    fn test_folder_payload_without_list() {
        let parsed: FolderListResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.folder_list.is_none());
    }
}

