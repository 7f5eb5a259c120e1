//! End-to-end pipeline run against a mockito server, using the real HTTP
//! client and the on-disk catalog cache.

use captionbridge_api_client::api::{LANGUAGE_LIST_PATH, UPLOAD_TOKEN_PATH, VIDEO_SEARCH_PATH};
use captionbridge_api_client::ApiClient;
use captionbridge_core::{Batch, FileStatus, SubtitleFile};
use captionbridge_pipeline::{LanguageCatalog, PipelineEvent, SystemClock, UploadPipeline};
use captionbridge_storage::LocalStore;
use mockito::Matcher;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const LANGUAGES: &str = r#"{"caption": {"language": [
    {"langId": 1, "language": "Korean", "code": "ko"},
    {"langId": "2", "language": "English", "code": "en"}
]}}"#;

fn subtitle(name: &str) -> SubtitleFile {
    SubtitleFile::new(name, format!("1\n00:00:01,000 --> 00:00:02,000\n{}\n", name))
}

#[tokio::test]
async fn test_batch_upload_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let cache_dir = TempDir::new().unwrap();

    let languages = server
        .mock("GET", LANGUAGE_LIST_PATH)
        .match_header("x-api-key", "test-key")
        .with_status(200)
        .with_body(LANGUAGES)
        .expect(1)
        .create_async()
        .await;
    let search = server
        .mock("GET", VIDEO_SEARCH_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("folderId".into(), "77".into()),
            Matcher::UrlEncoded("keyword".into(), "movie".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"videoList": [
                {"title": "trailer", "accessKey": "ak-trailer"},
                {"title": "Movie", "accessKey": "ak-movie"}
            ]}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let token = server
        .mock("GET", UPLOAD_TOKEN_PATH)
        .match_query(Matcher::UrlEncoded("accessKey".into(), "ak-movie".into()))
        .with_status(200)
        .with_body(format!(
            r#"{{"uploadUrl": "{}/caption/upload", "token": "tok-1"}}"#,
            server.url()
        ))
        .expect(2)
        .create_async()
        .await;
    let upload = server
        .mock("POST", "/caption/upload")
        .match_query(Matcher::UrlEncoded("token".into(), "tok-1".into()))
        .with_status(200)
        .with_body("OK")
        .expect(2)
        .create_async()
        .await;

    let client = Arc::new(ApiClient::new(&server.url(), "test-key", Duration::from_secs(5)).unwrap());
    let store = Arc::new(LocalStore::new(cache_dir.path()).await.unwrap());

    let mut catalog = LanguageCatalog::new(client.clone(), store.clone(), Arc::new(SystemClock));
    let entries = catalog.load().await.unwrap().to_vec();
    assert_eq!(entries.len(), 2);

    // A second catalog over the same directory is served from disk.
    let mut cached = LanguageCatalog::new(client.clone(), store, Arc::new(SystemClock));
    assert_eq!(cached.load().await.unwrap(), entries.as_slice());

    let mut batch = Batch::new();
    let outcome = batch
        .add_files(
            vec![
                subtitle("movie_ko.srt"),
                subtitle("movie_en.srt"),
                subtitle("notes.doc"),
            ],
            &entries,
        )
        .unwrap();
    assert_eq!(outcome.added, 2);
    assert_eq!(outcome.rejected, vec!["notes.doc".to_string()]);

    let pipeline = UploadPipeline::new("test-key", client.clone(), client);
    let mut events = pipeline.subscribe();
    let report = pipeline.run(&mut batch, "77").await.unwrap();

    assert!(report.is_complete_success(), "{:?}", report.failures);
    assert_eq!(report.success_count, 2);
    assert!(batch.iter().all(|f| f.status == FileStatus::Success));

    let mut last_progress = None;
    while let Ok(event) = events.try_recv() {
        if let PipelineEvent::ProgressChanged { completed, total } = event {
            last_progress = Some((completed, total));
        }
    }
    assert_eq!(last_progress, Some((2, 2)));

    languages.assert_async().await;
    search.assert_async().await;
    token.assert_async().await;
    upload.assert_async().await;
}

#[tokio::test]
async fn test_search_failure_is_recorded_per_file() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", VIDEO_SEARCH_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("search backend down")
        .create_async()
        .await;

    let client = Arc::new(ApiClient::new(&server.url(), "test-key", Duration::from_secs(5)).unwrap());
    let mut batch = Batch::new();
    let languages = vec![captionbridge_core::LanguageEntry::new("1", "Korean", "ko")];
    batch
        .add_files(vec![subtitle("a_ko.srt"), subtitle("b_ko.srt")], &languages)
        .unwrap();

    let pipeline = UploadPipeline::new("test-key", client.clone(), client);
    let report = pipeline.run(&mut batch, "77").await.unwrap();

    assert_eq!(report.failure_count, 2);
    assert!(report
        .failures
        .iter()
        .all(|f| f.error_code == "RESOLUTION_ERROR" && f.message.contains("search backend down")));
}
