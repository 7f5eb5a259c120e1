use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::LanguageEntry;

/// A subtitle file as acquired from disk or produced by conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleFile {
    pub name: String,
    pub data: Bytes,
}

impl SubtitleFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Identity of a queued file, derived from its name and byte size.
///
/// Two distinct files sharing both name and size get the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileId(String);

impl FileId {
    pub fn for_file(name: &str, size: u64) -> Self {
        Self(format!("{}_{}", name, size))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pending,
    Processing,
    Success,
    Error,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub severity: LogSeverity,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, severity: LogSeverity) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
            severity,
        }
    }
}

/// One subtitle file awaiting upload, with its resolution state.
#[derive(Debug, Clone)]
pub struct QueuedFile {
    pub id: FileId,
    pub file: SubtitleFile,
    pub language: Option<LanguageEntry>,
    pub status: FileStatus,
    pub logs: Vec<LogEntry>,
}

impl QueuedFile {
    pub fn new(file: SubtitleFile) -> Self {
        Self {
            id: FileId::for_file(&file.name, file.size()),
            file,
            language: None,
            status: FileStatus::Pending,
            logs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.file.name
    }

    pub fn language_id(&self) -> Option<&str> {
        self.language.as_ref().map(|l| l.lang_id.as_str())
    }

    /// Append a log entry and return a copy for event emission.
    pub fn log(&mut self, message: impl Into<String>, severity: LogSeverity) -> LogEntry {
        let entry = LogEntry::new(message, severity);
        self.logs.push(entry.clone());
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_id_from_name_and_size() {
        let file = QueuedFile::new(SubtitleFile::new("movie_ko.srt", vec![0u8; 12]));
        assert_eq!(file.id.as_str(), "movie_ko.srt_12");
        assert_eq!(file.status, FileStatus::Pending);
        assert!(file.language_id().is_none());
    }

    #[test]
    fn test_log_appends_in_order() {
        let mut file = QueuedFile::new(SubtitleFile::new("a.srt", "1"));
        file.log("first", LogSeverity::Info);
        let last = file.log("second", LogSeverity::Error);
        assert_eq!(file.logs.len(), 2);
        assert_eq!(file.logs[0].message, "first");
        assert_eq!(last.severity, LogSeverity::Error);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&FileStatus::Processing).unwrap(),
            "\"processing\""
        );
    }
}
