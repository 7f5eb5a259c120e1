use serde::{Deserialize, Serialize};
use std::fmt;

/// A caption language known to the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    #[serde(rename = "langId", deserialize_with = "super::string_or_number")]
    pub lang_id: String,
    #[serde(rename = "language")]
    pub language_name: String,
    pub code: String,
}

impl LanguageEntry {
    pub fn new(
        lang_id: impl Into<String>,
        language_name: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            lang_id: lang_id.into(),
            language_name: language_name.into(),
            code: code.into(),
        }
    }

    /// Canonical `"{name} ({code})"` rendering used for manual selection.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.language_name, self.code)
    }
}

impl fmt::Display for LanguageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.language_name, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_numeric_lang_id() {
        let entry: LanguageEntry =
            serde_json::from_str(r#"{"langId": 3, "language": "Korean", "code": "ko"}"#).unwrap();
        assert_eq!(entry, LanguageEntry::new("3", "Korean", "ko"));
    }

    #[test]
    fn test_serialize_keeps_remote_field_names() {
        let json = serde_json::to_value(LanguageEntry::new("7", "English", "en")).unwrap();
        assert_eq!(json["langId"], "7");
        assert_eq!(json["language"], "English");
        assert_eq!(json["code"], "en");
    }

    #[test]
    fn test_display_name() {
        let entry = LanguageEntry::new("1", "Korean", "ko");
        assert_eq!(entry.display_name(), "Korean (ko)");
        assert_eq!(entry.to_string(), "Korean (ko)");
    }
}
