use std::sync::Arc;
use std::time::Duration;

use matsearch_client::app::{AppConfig, ClipDownload, ScanStart, Session};
use matsearch_client::domains::media::ClipRequest;
use matsearch_client::domains::upload::{UploadOutcome, UploadRequest};
use matsearch_client::infrastructure::ApiError;
use matsearch_client::domains::search::{SearchError, ValidationFailure};
use matsearch_client::infrastructure::api_types::{
    ModelCatalog, ModelInfo, RawStatus, ScanResponse, UploadResponse,
};
use matsearch_client::infrastructure::testing::{
    RecordingBusyIndicator, RecordingNotifier, TestApiService,
};
use matsearch_client::model::{ResultItem, SearchMode};
use matsearch_client::{NotifyLevel, PollerState};
use serde_json::json;

struct Harness {
    api: TestApiService,
    notifier: RecordingNotifier,
    session: Session,
}

fn harness() -> Harness {
    let api = TestApiService::default();
    let notifier = RecordingNotifier::default();
    let session = Session::with_api(
        AppConfig::default(),
        Arc::new(api.clone()),
        Arc::new(notifier.clone()),
        Arc::new(RecordingBusyIndicator::default()),
    );
    Harness {
        api,
        notifier,
        session,
    }
}

fn scanning_status() -> RawStatus {
    RawStatus {
        status: true,
        scanning_files: 100,
        remain_files: 60,
        progress: 0.4,
        remain_time: Some(3661),
        ..RawStatus::default()
    }
}

#[tokio::test(start_paused = true)]
async fn session_publishes_status_until_teardown() {
    let h = harness();
    h.api.push_status(Ok(scanning_status()));
    let mut status = h.session.subscribe_status();

    h.session.start();
    status.changed().await.unwrap();
    let snapshot = status.borrow_and_update().clone().unwrap();
    assert_eq!(snapshot.remain_time, "01:01:01");
    assert_eq!(snapshot.scanned_files(), 40);
    assert!((snapshot.progress - 40.0).abs() < 1e-9);

    h.session.teardown();
    assert_eq!(h.session.poller_state(), PollerState::Stopped);
    let calls = h.api.status_calls();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(h.api.status_calls(), calls);
}

#[tokio::test]
async fn video_search_then_clip_download() {
    let mut h = harness();
    h.api.push_match_response(Ok(json!([{
        "path": "/media/trip.mp4",
        "score": 0.91,
        "start_time": 12.4,
        "end_time": 18
    }])));
    h.api.set_bytes_response(Ok(vec![1, 2, 3]));

    h.session.form_mut().positive = "waves".into();
    let outcome = h.session.search(SearchMode::TextToVideo).await.unwrap();
    let item = &outcome.items()[0];
    assert!(item.url.starts_with("/api/get_video/"));
    assert_eq!(item.start_time, "12.4");
    assert_eq!(item.end_time, "18");
    assert_eq!(h.session.results().unwrap().outcome, outcome);

    let clip = h.session.clip_for_result(item).unwrap();
    assert_eq!((clip.start_seconds(), clip.end_seconds()), (12, 18));
    let download = h.session.download_clip(&clip).await.unwrap();
    assert_eq!(
        download,
        ClipDownload {
            file_name: "trip.mp4".into(),
            bytes: vec![1, 2, 3]
        }
    );
    assert_eq!(h.api.byte_requests(), vec![clip.locator()]);
    assert_eq!(
        h.notifier.last(),
        Some((
            NotifyLevel::Success,
            "Video clip downloaded successfully".to_string()
        ))
    );
}

#[tokio::test]
async fn clip_with_inverted_bounds_is_rejected_locally() {
    let h = harness();
    let item = ResultItem {
        path: "/media/trip.mp4".into(),
        start_time: "20".into(),
        end_time: "10".into(),
        ..ResultItem::default()
    };
    assert!(h.session.clip_for_result(&item).is_err());
    assert!(ClipRequest::new("/media/trip.mp4", 5, 5).is_err());
    assert!(h.api.byte_requests().is_empty());
    assert_eq!(h.notifier.with_level(NotifyLevel::Error).len(), 1);
}

#[tokio::test]
async fn scan_is_refused_while_already_scanning() {
    let h = harness();
    h.api.push_status(Ok(scanning_status()));
    h.session.refresh_status().await.unwrap();

    let started = h.session.start_scan().await.unwrap();
    assert_eq!(started, ScanStart::AlreadyRunning);
    assert_eq!(h.api.scan_calls(), 0);
    assert_eq!(
        h.notifier.last(),
        Some((NotifyLevel::Warning, "Scan is already in progress".to_string()))
    );
}

#[tokio::test]
async fn scan_start_refreshes_status() {
    let h = harness();
    h.api.push_status(Ok(scanning_status()));

    let started = h.session.start_scan().await.unwrap();
    assert_eq!(started, ScanStart::Started);
    assert_eq!(h.api.scan_calls(), 1);
    assert_eq!(h.api.status_calls(), 1);
    assert!(h.session.status().unwrap().is_scanning);
    assert_eq!(
        h.notifier.with_level(NotifyLevel::Success),
        vec!["Scan started successfully".to_string()]
    );
}

#[tokio::test]
async fn backend_reporting_running_scan_is_a_warning() {
    let h = harness();
    h.api.set_scan_response(Ok(ScanResponse {
        status: "already scanning".into(),
    }));
    assert_eq!(
        h.session.start_scan().await.unwrap(),
        ScanStart::AlreadyRunning
    );
    assert_eq!(h.notifier.with_level(NotifyLevel::Warning).len(), 1);
}

#[tokio::test]
async fn upload_gate_and_outcomes() {
    let h = harness();

    let text = UploadRequest::new("notes.txt", "text/plain", b"hi".to_vec());
    assert_eq!(
        h.session.upload_image(&text).await,
        UploadOutcome::Failure("Only image files are allowed!".into())
    );
    assert!(h.api.uploads().is_empty());

    let image = UploadRequest::new("cat.png", "image/png", vec![0; 64]);
    assert_eq!(h.session.upload_image(&image).await, UploadOutcome::Success);
    assert_eq!(h.api.uploads(), vec![image.clone()]);

    h.api.set_upload_response(Err(ApiError::Status {
        status: 400,
        message: "No file part".into(),
    }));
    assert_eq!(
        h.session.upload_image(&image).await,
        UploadOutcome::Failure("No file part".into())
    );
    assert_eq!(
        h.notifier.messages(),
        vec![
            (NotifyLevel::Error, "Only image files are allowed!".to_string()),
            (NotifyLevel::Success, "File uploaded successfully".to_string()),
            (NotifyLevel::Error, "Upload failed: No file part".to_string()),
        ]
    );
}

#[tokio::test]
async fn upload_then_search_in_one_session() {
    let mut h = harness();
    h.api.set_upload_response(Ok(UploadResponse {
        status: Some("success".into()),
        file_path: Some("/tmp/upload/abc123".into()),
        ..UploadResponse::default()
    }));
    h.api.push_match_response(Ok(json!([{"url": "/api/get_image/4"}])));

    let image = UploadRequest::new("cat.png", "image/png", vec![0; 64]);
    let outcome = h
        .session
        .search_with_upload(SearchMode::ImageToImage, &image)
        .await
        .unwrap();

    assert_eq!(outcome.mode(), SearchMode::ImageToImage);
    assert_eq!(h.api.uploads(), vec![image]);
    let forms = h.api.match_forms();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].search_type, SearchMode::ImageToImage);
    assert_eq!(forms[0].img_id.as_deref(), Some("abc123"));
    assert_eq!(h.session.results().unwrap().request_id, 1);
}

#[tokio::test]
async fn upload_search_stops_at_rejected_upload_or_mode() {
    let mut h = harness();
    let image = UploadRequest::new("cat.png", "image/png", vec![0; 64]);

    let err = h
        .session
        .search_with_upload(SearchMode::TextToImage, &image)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SearchError::Validation(ValidationFailure::UploadNotUsed { .. })
    ));
    assert!(h.api.uploads().is_empty());

    h.api.set_upload_response(Err(ApiError::Status {
        status: 400,
        message: "No file part".into(),
    }));
    let err = h
        .session
        .search_with_upload(SearchMode::ImageToVideo, &image)
        .await
        .unwrap_err();
    assert_eq!(err, SearchError::Upload("No file part".into()));
    assert_eq!(h.api.uploads().len(), 1);
    assert_eq!(h.api.match_calls(), 0);
}

#[tokio::test]
async fn searches_after_teardown_are_not_published() {
    let mut h = harness();
    h.api.push_match_response(Ok(json!([{"url": "/api/get_image/1"}])));

    h.session.teardown();
    h.session.form_mut().positive = "sunset".into();
    let outcome = h.session.search(SearchMode::TextToImage).await.unwrap();

    assert_eq!(outcome.image_urls().len(), 1);
    assert!(h.session.results().is_none());
    assert_eq!(h.api.match_calls(), 1);
}

#[tokio::test]
async fn reverse_search_from_displayed_result() {
    let mut h = harness();
    h.api.push_match_response(Ok(json!([{"url": "/api/get_image/8?thumbnail=1"}])));
    h.api.push_match_response(Ok(json!([{"path": "clip.mp4"}])));

    h.session.form_mut().positive = "sunset".into();
    let first = h.session.search(SearchMode::TextToImage).await.unwrap();
    let url = first.image_urls()[0].to_string();

    let second = h
        .session
        .search_from_result(SearchMode::IndexedImageToVideo, &url)
        .await
        .unwrap();
    assert_eq!(h.session.form().img_id.as_deref(), Some("8"));
    assert_eq!(second.mode(), SearchMode::IndexedImageToVideo);
    assert_eq!(h.session.results().unwrap().request_id, 2);
}

#[tokio::test]
async fn clean_cache_and_model_switching() {
    let h = harness();
    let mut catalog = ModelCatalog::new();
    for (name, current) in [("ViT-B-16", true), ("ViT-L-14", false)] {
        catalog.insert(
            name.to_string(),
            ModelInfo {
                name: name.to_string(),
                path: format!("/models/{name}"),
                current,
            },
        );
    }
    h.api.set_models(catalog);

    h.session.clean_cache().await.unwrap();
    assert_eq!(h.api.clean_cache_calls(), 1);

    let response = h.session.change_model("ViT-L-14").await.unwrap();
    assert!(response.success);
    let models = h.session.list_models().await.unwrap();
    assert!(models["ViT-L-14"].current);
    assert!(!models["ViT-B-16"].current);

    assert!(h.session.change_model("missing").await.is_err());
    assert_eq!(
        h.notifier.messages(),
        vec![
            (NotifyLevel::Success, "Cache cleaned successfully".to_string()),
            (NotifyLevel::Success, "Model changed to ViT-L-14".to_string()),
            (
                NotifyLevel::Error,
                "Failed to change model: invalid model name".to_string()
            ),
        ]
    );
}
