use crate::traits::{CaptionService, Clock, ConversionService, LanguageSource, Sleeper, VideoSearch};
use async_trait::async_trait;
use bytes::Bytes;
use captionbridge_api_client::{AssemblyStatus, AssemblySubmission};
use captionbridge_core::{
    ApiError, LanguageEntry, SubtitleFile, TokenResponse, UploadTicket, VideoCandidate,
};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub struct FakeLanguageSource {
    pub result: Mutex<Result<Vec<LanguageEntry>, ApiError>>,
    pub calls: AtomicUsize,
}

impl FakeLanguageSource {
    pub fn ok(entries: Vec<LanguageEntry>) -> Self {
        Self {
            result: Mutex::new(Ok(entries)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: Mutex::new(Err(ApiError::Status {
                status: 503,
                body: "unavailable".to_string(),
            })),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_result(&self, result: Result<Vec<LanguageEntry>, ApiError>) {
        *self.result.lock().unwrap() = result;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageSource for FakeLanguageSource {
    async fn fetch_languages(&self) -> Result<Vec<LanguageEntry>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.lock().unwrap().clone()
    }
}

/// Search fake answering from a fixed title -> candidates table. Unknown
/// keywords get an empty list.
#[derive(Default)]
pub struct FakeVideoSearch {
    pub catalog: HashMap<String, Vec<VideoCandidate>>,
    pub failure: Option<ApiError>,
    pub queries: Mutex<Vec<(String, String)>>,
}

impl FakeVideoSearch {
    pub fn with(entries: &[(&str, &[(&str, &str)])]) -> Self {
        let catalog = entries
            .iter()
            .map(|(keyword, hits)| {
                let hits = hits
                    .iter()
                    .map(|(title, key)| VideoCandidate::new(*title, *key))
                    .collect();
                (keyword.to_string(), hits)
            })
            .collect();
        Self {
            catalog,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl VideoSearch for FakeVideoSearch {
    async fn search_videos(
        &self,
        folder_id: &str,
        keyword: &str,
    ) -> Result<Vec<VideoCandidate>, ApiError> {
        self.queries
            .lock()
            .unwrap()
            .push((folder_id.to_string(), keyword.to_string()));
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self.catalog.get(keyword).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeCaptionService {
    /// Asset keys whose token response lacks the token field
    pub tokenless_assets: Vec<String>,
    /// Asset keys whose caption upload is rejected
    pub rejected_assets: Vec<String>,
    pub token_requests: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<(String, String, String)>>,
}

impl FakeCaptionService {
    /// (upload_url, lang_id, file name) per successful upload
    pub fn uploads(&self) -> Vec<(String, String, String)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl CaptionService for FakeCaptionService {
    async fn upload_token(&self, asset_key: &str) -> Result<TokenResponse, ApiError> {
        self.token_requests
            .lock()
            .unwrap()
            .push(asset_key.to_string());
        let token = if self.tokenless_assets.iter().any(|a| a == asset_key) {
            None
        } else {
            Some(format!("token-{}", asset_key))
        };
        Ok(TokenResponse {
            upload_url: Some(format!("https://upload.example/{}", asset_key)),
            token,
        })
    }

    async fn upload_caption(
        &self,
        ticket: &UploadTicket,
        lang_id: &str,
        file: &SubtitleFile,
    ) -> Result<String, ApiError> {
        if self
            .rejected_assets
            .iter()
            .any(|a| ticket.upload_url.ends_with(a.as_str()))
        {
            return Err(ApiError::Status {
                status: 400,
                body: "caption already exists".to_string(),
            });
        }
        self.uploads.lock().unwrap().push((
            ticket.upload_url.clone(),
            lang_id.to_string(),
            file.name.clone(),
        ));
        Ok("OK".to_string())
    }
}

/// Conversion fake replaying a scripted sequence of status labels. Once the
/// script runs out the last label repeats.
pub struct FakeConversionService {
    pub submission: AssemblySubmission,
    pub script: Mutex<VecDeque<String>>,
    pub last_label: Mutex<String>,
    pub results: serde_json::Map<String, serde_json::Value>,
    pub polls: Mutex<Vec<String>>,
    pub downloads: Mutex<Vec<String>>,
}

impl FakeConversionService {
    pub fn new(labels: &[&str]) -> Self {
        let mut results = serde_json::Map::new();
        results.insert(
            "convert_srt".to_string(),
            serde_json::json!([{ "ssl_url": "https://tmp.transloadit.com/out.srt" }]),
        );
        Self {
            submission: AssemblySubmission {
                ok: Some(serde_json::json!("ASSEMBLY_UPLOADING")),
                error: None,
                assembly_id: Some("assembly-1".to_string()),
                assembly_ssl_url: Some(
                    "https://api2-fra.transloadit.com/assemblies/assembly-1".to_string(),
                ),
                assembly_url: None,
            },
            script: Mutex::new(labels.iter().map(|l| l.to_string()).collect()),
            last_label: Mutex::new("ASSEMBLY_EXECUTING".to_string()),
            results,
            polls: Mutex::new(Vec::new()),
            downloads: Mutex::new(Vec::new()),
        }
    }

    pub fn poll_count(&self) -> usize {
        self.polls.lock().unwrap().len()
    }
}

#[async_trait]
impl ConversionService for FakeConversionService {
    async fn submit(&self, _file: &SubtitleFile) -> Result<AssemblySubmission, ApiError> {
        Ok(self.submission.clone())
    }

    async fn status(&self, status_url: &str) -> Result<AssemblyStatus, ApiError> {
        self.polls.lock().unwrap().push(status_url.to_string());
        let label = {
            let mut script = self.script.lock().unwrap();
            let mut last = self.last_label.lock().unwrap();
            if let Some(next) = script.pop_front() {
                *last = next;
            }
            last.clone()
        };
        Ok(AssemblyStatus {
            ok: Some(label),
            error: None,
            results: self.results.clone(),
        })
    }

    async fn download(&self, url: &str) -> Result<Bytes, ApiError> {
        self.downloads.lock().unwrap().push(url.to_string());
        Ok(Bytes::from_static(b"1\n00:00:01,000 --> 00:00:02,000\nconverted\n"))
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    pub sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

pub struct ManualClock {
    pub now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
