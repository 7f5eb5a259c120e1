//! Title to asset key resolution.

use crate::traits::VideoSearch;
use captionbridge_core::similarity::best_match;
use captionbridge_core::{UploadError, VideoCandidate};
use std::sync::Arc;

/// Resolves a derived title to the key of the closest-titled video in a folder.
pub struct AssetResolver {
    search: Arc<dyn VideoSearch>,
}

impl AssetResolver {
    pub fn new(search: Arc<dyn VideoSearch>) -> Self {
        Self { search }
    }

    /// Search the folder for `title` and return the best candidate's key.
    ///
    /// `Ok(None)` means the search succeeded but returned nothing.
    pub async fn resolve(
        &self,
        folder_id: &str,
        title: &str,
    ) -> Result<Option<String>, UploadError> {
        let candidates = self
            .search
            .search_videos(folder_id, title)
            .await
            .map_err(UploadError::Resolution)?;

        let selected = select_best(title, &candidates);
        match selected {
            Some(candidate) => tracing::debug!(
                title = %title,
                matched = %candidate.title,
                asset_key = %candidate.asset_key,
                candidates = candidates.len(),
                "Resolved video asset"
            ),
            None => tracing::debug!(title = %title, "Video search returned no candidates"),
        }

        Ok(selected.map(|candidate| candidate.asset_key.clone()))
    }
}

/// Highest-similarity candidate; the earliest one wins a tie.
pub fn select_best<'a>(title: &str, candidates: &'a [VideoCandidate]) -> Option<&'a VideoCandidate> {
    best_match(title, candidates.iter().map(|c| c.title.as_str()))
        .map(|(index, _)| &candidates[index])
}
