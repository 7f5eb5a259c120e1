//! Subtitle format conversion through an external assembly service.
//!
//! A submitted job is polled on a fixed cadence until it reports completion,
//! reports an unexpected state, or runs out of polls. The decision after each
//! poll is made by [`transition`], which has no side effects.

use crate::traits::{ConversionService, Sleeper};
use captionbridge_core::constants::{
    CONVERSION_CANONICAL_HOST, CONVERSION_SERVICE_DOMAIN, CONVERSION_TARGET_EXTENSION,
};
use captionbridge_core::filename::with_extension;
use captionbridge_core::{ConversionConfig, ConversionError, SubtitleFile};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const ASSEMBLY_COMPLETED: &str = "ASSEMBLY_COMPLETED";
pub const ASSEMBLY_EXECUTING: &str = "ASSEMBLY_EXECUTING";
pub const ASSEMBLY_UPLOADING: &str = "ASSEMBLY_UPLOADING";

const UNKNOWN_STATE: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionState {
    Submitted,
    Polling { attempts: u32 },
    Completed,
    Failed(String),
    TimedOut { attempts: u32 },
}

impl ConversionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConversionState::Completed
                | ConversionState::Failed(_)
                | ConversionState::TimedOut { .. }
        )
    }

    fn attempts(&self) -> u32 {
        match self {
            ConversionState::Polling { attempts } | ConversionState::TimedOut { attempts } => {
                *attempts
            }
            _ => 0,
        }
    }
}

/// Next state after observing `label` on a poll.
pub fn transition(state: &ConversionState, label: &str, max_polls: u32) -> ConversionState {
    if state.is_terminal() {
        return state.clone();
    }

    let attempts = state.attempts() + 1;
    match label {
        ASSEMBLY_COMPLETED => ConversionState::Completed,
        ASSEMBLY_EXECUTING | ASSEMBLY_UPLOADING if attempts >= max_polls => {
            ConversionState::TimedOut { attempts }
        }
        ASSEMBLY_EXECUTING | ASSEMBLY_UPLOADING => ConversionState::Polling { attempts },
        other => ConversionState::Failed(other.to_string()),
    }
}

/// Route status polls through the canonical API host over https.
pub fn normalize_status_url(raw: &str) -> Result<String, ConversionError> {
    let mut url = Url::parse(raw)
        .map_err(|e| ConversionError::StatusCheck(format!("invalid status URL {}: {}", raw, e)))?;

    let is_service_host = url.host_str().is_some_and(|host| {
        host == CONVERSION_SERVICE_DOMAIN
            || host.ends_with(&format!(".{}", CONVERSION_SERVICE_DOMAIN))
    });
    if is_service_host {
        url.set_host(Some(CONVERSION_CANONICAL_HOST))
            .map_err(|e| ConversionError::StatusCheck(e.to_string()))?;
    }
    if url.scheme() != "https" && url.set_scheme("https").is_err() {
        return Err(ConversionError::StatusCheck(format!(
            "status URL {} cannot use https",
            raw
        )));
    }

    Ok(url.to_string())
}

pub struct FormatConverter {
    service: Arc<dyn ConversionService>,
    sleeper: Arc<dyn Sleeper>,
    poll_interval: Duration,
    max_polls: u32,
    target_extension: String,
}

impl FormatConverter {
    pub fn new(
        service: Arc<dyn ConversionService>,
        sleeper: Arc<dyn Sleeper>,
        poll_interval: Duration,
        max_polls: u32,
    ) -> Self {
        Self {
            service,
            sleeper,
            poll_interval,
            max_polls,
            target_extension: CONVERSION_TARGET_EXTENSION.to_string(),
        }
    }

    pub fn from_config(
        service: Arc<dyn ConversionService>,
        sleeper: Arc<dyn Sleeper>,
        config: &ConversionConfig,
    ) -> Self {
        Self::new(service, sleeper, config.poll_interval, config.max_polls)
    }

    /// Convert `file`, returning a new file named `{stem}.srt`.
    pub async fn convert(&self, file: &SubtitleFile) -> Result<SubtitleFile, ConversionError> {
        let submission = self
            .service
            .submit(file)
            .await
            .map_err(|e| ConversionError::Submission(e.to_string()))?;

        if let Some(error) = submission.error.as_deref() {
            return Err(ConversionError::Submission(error.to_string()));
        }
        let assembly_id = submission
            .assembly_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ConversionError::MissingJobField("assembly_id"))?;
        let status_url = submission
            .status_url()
            .ok_or(ConversionError::MissingJobField("assembly_ssl_url"))?;
        let status_url = normalize_status_url(status_url)?;

        tracing::info!(
            file_name = %file.name,
            assembly_id = %assembly_id,
            "Conversion submitted"
        );

        let mut state = ConversionState::Submitted;
        let mut last_status = None;
        while !state.is_terminal() {
            self.sleeper.sleep(self.poll_interval).await;

            let status = self
                .service
                .status(&status_url)
                .await
                .map_err(|e| ConversionError::StatusCheck(e.to_string()))?;
            let label = status
                .ok
                .as_deref()
                .or(status.error.as_deref())
                .unwrap_or(UNKNOWN_STATE);

            state = transition(&state, label, self.max_polls);
            tracing::debug!(
                assembly_id = %assembly_id,
                label = %label,
                state = ?state,
                "Conversion polled"
            );
            last_status = Some(status);
        }

        match state {
            ConversionState::Completed => {}
            ConversionState::Failed(label) => {
                tracing::warn!(assembly_id = %assembly_id, label = %label, "Conversion failed");
                return Err(ConversionError::UnexpectedState(label));
            }
            ConversionState::TimedOut { attempts } => {
                tracing::warn!(assembly_id = %assembly_id, attempts, "Conversion timed out");
                return Err(ConversionError::TimedOut { attempts });
            }
            pending @ (ConversionState::Submitted | ConversionState::Polling { .. }) => {
                return Err(ConversionError::UnexpectedState(format!("{:?}", pending)));
            }
        }

        let output = last_status
            .and_then(|status| status.first_result())
            .ok_or(ConversionError::NoOutput)?;
        let download_url = output.download_url().ok_or(ConversionError::NoOutput)?;

        let data = self
            .service
            .download(download_url)
            .await
            .map_err(|e| ConversionError::Download(e.to_string()))?;

        let converted = SubtitleFile::new(with_extension(&file.name, &self.target_extension), data);
        tracing::info!(
            assembly_id = %assembly_id,
            converted = %converted.name,
            size = converted.size(),
            "Conversion completed"
        );
        Ok(converted)
    }
}
