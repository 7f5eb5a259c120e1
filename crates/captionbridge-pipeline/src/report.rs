//! Batch outcome summary.

use captionbridge_core::{FileId, UploadError};
use serde::Serialize;

/// Why one file of a batch failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    pub file_id: FileId,
    pub file_name: String,
    pub error_code: &'static str,
    pub message: String,
}

impl FileFailure {
    pub fn new(file_id: FileId, file_name: impl Into<String>, error: &UploadError) -> Self {
        Self {
            file_id,
            file_name: file_name.into(),
            error_code: error.error_code(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub(crate) fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub(crate) fn record_failure(&mut self, failure: FileFailure) {
        self.failure_count += 1;
        self.failures.push(failure);
    }

    pub fn is_complete_success(&self) -> bool {
        self.failure_count == 0
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        if self.is_complete_success() {
            format!("All {} file(s) uploaded successfully", self.success_count)
        } else {
            format!(
                "{} succeeded, {} failed",
                self.success_count, self.failure_count
            )
        }
    }
}
