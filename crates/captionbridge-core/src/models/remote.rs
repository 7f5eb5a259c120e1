use serde::{Deserialize, Serialize};

/// Remote container scoping a set of video assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(deserialize_with = "super::string_or_number")]
    pub id: String,
    #[serde(rename = "folderName")]
    pub folder_name: String,
}

/// Search hit normalized from any of the video search response shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCandidate {
    pub title: String,
    pub asset_key: String,
}

impl VideoCandidate {
    pub fn new(title: impl Into<String>, asset_key: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            asset_key: asset_key.into(),
        }
    }
}

/// Raw upload-token response; either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    #[serde(rename = "uploadUrl", default)]
    pub upload_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Validated upload destination for one caption file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    pub upload_url: String,
    pub token: String,
}

impl TryFrom<TokenResponse> for UploadTicket {
    type Error = crate::error::UploadError;

    fn try_from(raw: TokenResponse) -> Result<Self, Self::Error> {
        let upload_url = raw.upload_url.filter(|u| !u.is_empty());
        let token = raw.token.filter(|t| !t.is_empty());
        match (upload_url, token) {
            (Some(upload_url), Some(token)) => Ok(Self { upload_url, token }),
            (None, _) => Err(crate::error::UploadError::TokenUnavailable(
                "response has no uploadUrl".to_string(),
            )),
            (_, None) => Err(crate::error::UploadError::TokenUnavailable(
                "response has no token".to_string(),
            )),
        }
    }
}
