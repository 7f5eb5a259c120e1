use super::{FileId, LanguageEntry, QueuedFile, SubtitleFile};
use crate::error::UploadError;
use crate::filename;

/// What happened to a group of acquired files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchAddOutcome {
    pub added: usize,
    pub duplicates: usize,
    /// Names rejected for an unsupported extension.
    pub rejected: Vec<String>,
}

/// The queued files of one session, kept sorted by file name.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    files: Vec<QueuedFile>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue newly acquired files.
    ///
    /// Unsupported extensions are dropped, files already queued with the same
    /// name and size are skipped, and each new file gets its language
    /// detected from its name. Fails when none of a non-empty group is
    /// supported.
    pub fn add_files(
        &mut self,
        files: Vec<SubtitleFile>,
        languages: &[LanguageEntry],
    ) -> Result<BatchAddOutcome, UploadError> {
        let mut outcome = BatchAddOutcome::default();
        if files.is_empty() {
            return Ok(outcome);
        }

        let (supported, rejected): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|f| filename::is_supported(&f.name));
        outcome.rejected = rejected.into_iter().map(|f| f.name).collect();

        if supported.is_empty() {
            return Err(UploadError::UnsupportedFormat(outcome.rejected.join(", ")));
        }

        for file in supported {
            let mut queued = QueuedFile::new(file);
            if self.contains(&queued.id) {
                outcome.duplicates += 1;
                continue;
            }
            queued.language = filename::detect_language(queued.name(), languages).cloned();
            self.files.push(queued);
            outcome.added += 1;
        }

        self.sort();
        Ok(outcome)
    }

    pub fn remove(&mut self, id: &FileId) -> Option<QueuedFile> {
        let idx = self.files.iter().position(|f| &f.id == id)?;
        Some(self.files.remove(idx))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Manually choose the language of a queued file.
    pub fn set_language(&mut self, id: &FileId, language: LanguageEntry) -> bool {
        match self.get_mut(id) {
            Some(file) => {
                file.language = Some(language);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &FileId) -> bool {
        self.files.iter().any(|f| &f.id == id)
    }

    pub fn get(&self, id: &FileId) -> Option<&QueuedFile> {
        self.files.iter().find(|f| &f.id == id)
    }

    pub fn get_mut(&mut self, id: &FileId) -> Option<&mut QueuedFile> {
        self.files.iter_mut().find(|f| &f.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedFile> {
        self.files.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut QueuedFile> {
        self.files.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn sort(&mut self) {
        self.files.sort_by(|a, b| a.file.name.cmp(&b.file.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn languages() -> Vec<LanguageEntry> {
        vec![
            LanguageEntry::new("1", "Korean", "ko"),
            LanguageEntry::new("2", "English", "en"),
        ]
    }

    #[test]
    fn test_add_filters_sorts_and_detects() {
        let mut batch = Batch::new();
        let outcome = batch
            .add_files(
                vec![
                    SubtitleFile::new("zeta_en.vtt", "b"),
                    SubtitleFile::new("alpha_ko.srt", "a"),
                    SubtitleFile::new("poster.jpg", "c"),
                ],
                &languages(),
            )
            .unwrap();

        assert_eq!(outcome.added, 2);
        assert_eq!(outcome.rejected, vec!["poster.jpg".to_string()]);
        let names: Vec<_> = batch.iter().map(|f| f.name().to_string()).collect();
        assert_eq!(names, vec!["alpha_ko.srt", "zeta_en.vtt"]);
        assert_eq!(batch.iter().next().unwrap().language_id(), Some("1"));
    }

    #[test]
    fn test_add_skips_same_name_and_size() {
        let mut batch = Batch::new();
        batch
            .add_files(vec![SubtitleFile::new("a_ko.srt", "abc")], &[])
            .unwrap();
        let outcome = batch
            .add_files(
                vec![
                    SubtitleFile::new("a_ko.srt", "xyz"),
                    SubtitleFile::new("a_ko.srt", "abcd"),
                ],
                &[],
            )
            .unwrap();

        assert_eq!(outcome.duplicates, 1);
        assert_eq!(outcome.added, 1);
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_add_only_unsupported_fails() {
        let mut batch = Batch::new();
        let err = batch
            .add_files(vec![SubtitleFile::new("clip.mp4", "x")], &[])
            .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
        assert!(batch.is_empty());
    }

    #[test]
    fn test_set_language_and_remove() {
        let mut batch = Batch::new();
        batch
            .add_files(vec![SubtitleFile::new("movie.srt", "x")], &languages())
            .unwrap();
        let id = FileId::for_file("movie.srt", 1);
        assert!(batch.get(&id).unwrap().language.is_none());

        assert!(batch.set_language(&id, LanguageEntry::new("2", "English", "en")));
        assert_eq!(batch.get(&id).unwrap().language_id(), Some("2"));

        assert!(batch.remove(&id).is_some());
        assert!(batch.remove(&id).is_none());
        assert!(!batch.set_language(&id, LanguageEntry::new("2", "English", "en")));
    }
}
