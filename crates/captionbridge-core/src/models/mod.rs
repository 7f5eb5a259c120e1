//! Domain models
//!
//! Remote payload types keep the field names the video-hosting API uses so
//! they can be persisted and re-read verbatim.

mod batch;
mod file;
mod language;
mod remote;

pub use batch::{Batch, BatchAddOutcome};
pub use file::{FileId, FileStatus, LogEntry, LogSeverity, QueuedFile, SubtitleFile};
pub use language::LanguageEntry;
pub use remote::{Folder, TokenResponse, UploadTicket, VideoCandidate};

use serde::{Deserialize, Deserializer};

/// Accept an identifier sent either as a JSON string or a JSON number.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number identifier, got {}",
            other
        ))),
    }
}
