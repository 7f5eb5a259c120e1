//! captionbridge core library
//!
//! Domain models, error types, configuration and the pure helpers (filename
//! analysis and title similarity) shared by every captionbridge crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod filename;
pub mod models;
pub mod similarity;

// Re-export commonly used types
pub use config::{Config, ConversionConfig};
pub use error::{ApiError, ConversionError, LogLevel, UploadError};
pub use models::{
    Batch, BatchAddOutcome, FileId, FileStatus, Folder, LanguageEntry, LogEntry, LogSeverity,
    QueuedFile, SubtitleFile, TokenResponse, UploadTicket, VideoCandidate,
};
