//! Test helpers for pipeline unit tests
//!
//! In-memory fakes of the service traits that record how they were called.

pub mod fakes;

pub use fakes::*;

use captionbridge_core::{LanguageEntry, SubtitleFile};

pub fn languages() -> Vec<LanguageEntry> {
    vec![
        LanguageEntry::new("10", "Korean", "ko"),
        LanguageEntry::new("20", "English", "en"),
        LanguageEntry::new("30", "Japanese", "ja"),
    ]
}

pub fn subtitle(name: &str) -> SubtitleFile {
    SubtitleFile::new(name, format!("1\n00:00:01,000 --> 00:00:02,000\n{}\n", name))
}
