//! Filename analysis
//!
//! Subtitle files are expected to be named `{title}_{code}.{ext}`, e.g.
//! `movie_ko.srt`. The trailing underscore segment is treated as a language
//! code and everything before it as the video title.

use crate::constants::{CONVERSION_EXTENSIONS, SUPPORTED_EXTENSIONS};
use crate::models::LanguageEntry;

/// File name without its final extension.
pub fn stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) => &file_name[..idx],
        None => file_name,
    }
}

/// Lower-cased final extension without the dot.
pub fn extension(file_name: &str) -> Option<String> {
    file_name
        .rfind('.')
        .map(|idx| file_name[idx + 1..].to_lowercase())
        .filter(|ext| !ext.is_empty())
}

pub fn is_supported(file_name: &str) -> bool {
    extension(file_name).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Whether the caption endpoint needs this file converted first.
pub fn needs_conversion(file_name: &str) -> bool {
    extension(file_name).is_some_and(|ext| CONVERSION_EXTENSIONS.contains(&ext.as_str()))
}

/// Same base name with the extension replaced.
pub fn with_extension(file_name: &str, ext: &str) -> String {
    format!("{}.{}", stem(file_name), ext)
}

/// Catalog entry whose code equals the last underscore segment of the stem.
pub fn detect_language<'a>(
    file_name: &str,
    catalog: &'a [LanguageEntry],
) -> Option<&'a LanguageEntry> {
    let candidate = stem(file_name).rsplit('_').next()?;
    catalog.iter().find(|entry| entry.code == candidate)
}

/// Title portion of the file name.
///
/// The last underscore segment is dropped whenever there is more than one,
/// without checking that it is a known language code.
pub fn derive_title(file_name: &str) -> String {
    let stem = stem(file_name);
    match stem.rsplit_once('_') {
        Some((title, _code)) => title.to_string(),
        None => stem.to_string(),
    }
}
