//! Sequential upload of a queued batch.
//!
//! Files are processed one at a time in name order. A failing file is
//! recorded and the batch moves on; only the preconditions checked before
//! the first file abort a run.

use crate::converter::FormatConverter;
use crate::events::{EventBus, PipelineEvent};
use crate::report::{BatchReport, FileFailure};
use crate::resolver::AssetResolver;
use crate::traits::{CaptionService, VideoSearch};
use captionbridge_core::filename::{derive_title, needs_conversion};
use captionbridge_core::{
    Batch, ConversionError, FileStatus, LogLevel, LogSeverity, QueuedFile, UploadError,
    UploadTicket,
};
use std::sync::Arc;
use tokio::sync::broadcast;

/// The most recent successful title resolution.
///
/// Consecutive files for the same title (typically one per language) share
/// one search. Only an exact title match reuses the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionMemo {
    last: Option<(String, String)>,
}

impl ResolutionMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, title: &str) -> Option<&str> {
        self.last
            .as_ref()
            .filter(|(memo_title, _)| memo_title == title)
            .map(|(_, asset_key)| asset_key.as_str())
    }

    pub fn remember(&mut self, title: impl Into<String>, asset_key: impl Into<String>) {
        self.last = Some((title.into(), asset_key.into()));
    }
}

pub struct UploadPipeline {
    credential: String,
    resolver: AssetResolver,
    captions: Arc<dyn CaptionService>,
    converter: Option<FormatConverter>,
    events: EventBus,
}

impl UploadPipeline {
    pub fn new(
        credential: impl Into<String>,
        search: Arc<dyn VideoSearch>,
        captions: Arc<dyn CaptionService>,
    ) -> Self {
        Self {
            credential: credential.into(),
            resolver: AssetResolver::new(search),
            captions,
            converter: None,
            events: EventBus::new(),
        }
    }

    /// Enable conversion of formats the caption endpoint does not accept.
    pub fn with_converter(mut self, converter: FormatConverter) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    /// Upload every file in `batch` to the videos of `folder_id`.
    pub async fn run(&self, batch: &mut Batch, folder_id: &str) -> Result<BatchReport, UploadError> {
        if batch.is_empty() {
            return Err(UploadError::EmptyQueue);
        }
        if folder_id.trim().is_empty() {
            return Err(UploadError::NoFolder);
        }
        if self.credential.trim().is_empty() {
            return Err(UploadError::Credential);
        }

        let total = batch.len();
        let mut report = BatchReport::new(total);
        let mut memo = ResolutionMemo::new();

        tracing::info!(folder_id = %folder_id, total, "Starting batch upload");

        for (index, item) in batch.iter_mut().enumerate() {
            self.set_status(item, FileStatus::Processing);
            let started = format!("Upload started: {}", item.name());
            self.log(item, started, LogSeverity::Info);

            match self.process(item, folder_id, &mut memo).await {
                Ok(()) => {
                    self.set_status(item, FileStatus::Success);
                    self.log(item, "Upload completed", LogSeverity::Success);
                    report.record_success();
                    tracing::info!(file_id = %item.id, "Caption uploaded");
                }
                Err(err) => {
                    self.set_status(item, FileStatus::Error);
                    self.log(item, format!("Upload failed: {}", err), LogSeverity::Error);
                    log_failure(item, &err);
                    report.record_failure(FileFailure::new(item.id.clone(), item.name(), &err));
                }
            }

            self.events.emit(PipelineEvent::ProgressChanged {
                completed: index + 1,
                total,
            });
        }

        tracing::info!(
            success = report.success_count,
            failed = report.failure_count,
            "Batch upload finished"
        );
        Ok(report)
    }

    async fn process(
        &self,
        item: &mut QueuedFile,
        folder_id: &str,
        memo: &mut ResolutionMemo,
    ) -> Result<(), UploadError> {
        let lang_id = item
            .language_id()
            .map(str::to_string)
            .ok_or(UploadError::LanguageNotSelected)?;

        let title = derive_title(item.name());
        let remembered = memo.lookup(&title).map(str::to_string);
        let asset_key = match remembered {
            Some(key) => {
                tracing::debug!(file_id = %item.id, title = %title, "Reusing resolved asset");
                key
            }
            None => {
                let key = self
                    .resolver
                    .resolve(folder_id, &title)
                    .await?
                    .ok_or_else(|| UploadError::NoMatchingAsset {
                        title: title.clone(),
                    })?;
                memo.remember(title.as_str(), key.as_str());
                key
            }
        };
        self.log(item, format!("Matched video asset {}", asset_key), LogSeverity::Info);

        let file = if needs_conversion(item.name()) {
            let converter = self
                .converter
                .as_ref()
                .ok_or(ConversionError::NotConfigured)?;
            self.log(item, "Converting to SRT", LogSeverity::Info);
            let converted = converter.convert(&item.file).await?;
            self.log(
                item,
                format!("Converted to {}", converted.name),
                LogSeverity::Info,
            );
            converted
        } else {
            item.file.clone()
        };

        let token = self
            .captions
            .upload_token(&asset_key)
            .await
            .map_err(|e| UploadError::TokenUnavailable(e.to_string()))?;
        let ticket = UploadTicket::try_from(token)?;

        self.captions
            .upload_caption(&ticket, &lang_id, &file)
            .await
            .map_err(UploadError::Upload)?;
        Ok(())
    }

    fn set_status(&self, item: &mut QueuedFile, status: FileStatus) {
        item.status = status;
        self.events.emit(PipelineEvent::StatusChanged {
            file_id: item.id.clone(),
            status,
        });
    }

    fn log(&self, item: &mut QueuedFile, message: impl Into<String>, severity: LogSeverity) {
        let entry = item.log(message, severity);
        self.events.emit(PipelineEvent::LogAppended {
            file_id: item.id.clone(),
            entry,
        });
    }
}

fn log_failure(item: &QueuedFile, err: &UploadError) {
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(
            file_id = %item.id,
            error_code = err.error_code(),
            error = %err,
            "File skipped"
        ),
        LogLevel::Warn => tracing::warn!(
            file_id = %item.id,
            error_code = err.error_code(),
            error = %err,
            "File upload failed"
        ),
        LogLevel::Error => tracing::error!(
            file_id = %item.id,
            error_code = err.error_code(),
            error = %err,
            "File upload failed"
        ),
    }
}
