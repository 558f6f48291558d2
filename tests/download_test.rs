use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use vodgrab::{
    BatchOptions, BatchRunner, DownloadEngine, DownloadError, DownloadProgress, DownloadRequest,
    DownloadTask, VodItem,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_engine() -> DownloadEngine {
    DownloadEngine::new()
        .unwrap()
        .with_retry_delay(Duration::ZERO)
}

fn test_task(
    url: String,
    output_path: PathBuf,
    max_attempts: u32,
) -> (DownloadTask, mpsc::UnboundedReceiver<DownloadProgress>) {
    let (progress_sender, progress_receiver) = mpsc::unbounded_channel();

    (
        DownloadTask {
            id: "test".to_string(),
            request: DownloadRequest::new(url, output_path).with_max_attempts(max_attempts),
            progress_sender,
        },
        progress_receiver,
    )
}

#[tokio::test]
async fn test_success_on_first_attempt() {
    let server = MockServer::start().await;

    // A fresh file always asks for the whole range
    Mock::given(method("GET"))
        .and(path("/media/1.mp4"))
        .and(header("Range", "bytes=0-"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"movie bytes".as_slice()))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("Some-Movie.mp4");
    let (task, _progress) = test_task(format!("{}/media/1.mp4", server.uri()), target.clone(), 3);

    let result = test_engine().download(task).await.unwrap();

    assert_eq!(result, target);
    assert_eq!(std::fs::read(&target).unwrap(), b"movie bytes");
}

#[tokio::test]
async fn test_all_attempts_fail_reports_attempt_count() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("Some-Movie.mp4");
    let (task, _progress) = test_task(format!("{}/media/1.mp4", server.uri()), target, 3);

    let err = test_engine().download(task).await.unwrap_err();

    match &err {
        DownloadError::Exhausted { attempts, .. } => assert_eq!(*attempts, 3),
        other => panic!("expected Exhausted, got: {other:?}"),
    }
    assert!(err.to_string().contains("after 3 attempts"));
}

#[tokio::test]
async fn test_single_attempt_budget() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("Some-Movie.mp4");
    let (task, _progress) = test_task(format!("{}/media/1.mp4", server.uri()), target, 1);

    let err = test_engine().download(task).await.unwrap_err();

    match err {
        DownloadError::Exhausted { attempts, .. } => assert_eq!(attempts, 1),
        other => panic!("expected Exhausted, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_zero_attempts_is_rejected_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("Some-Movie.mp4");
    let (task, _progress) = test_task(format!("{}/media/1.mp4", server.uri()), target.clone(), 0);

    let err = test_engine().download(task).await.unwrap_err();

    assert!(matches!(err, DownloadError::InvalidAttempts { value: 0 }));
    assert!(!target.exists());
}

#[tokio::test]
async fn test_resumes_partial_file_and_succeeds_on_second_attempt() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("Some-Movie.mp4");

    // 1 MiB already on disk from an earlier interrupted run
    std::fs::write(&target, vec![0u8; 1_048_576]).unwrap();

    // The first attempt fails, the second delivers the tail
    Mock::given(method("GET"))
        .and(header("Range", "bytes=1048576-"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(header("Range", "bytes=1048576-"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("Content-Range", "bytes 1048576-1048579/1048580")
                .set_body_bytes(b"tail".as_slice()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (task, _progress) = test_task(format!("{}/media/1.mp4", server.uri()), target.clone(), 3);

    let result = test_engine().download(task).await.unwrap();

    assert_eq!(result, target);
    let bytes = std::fs::read(&target).unwrap();
    assert_eq!(bytes.len(), 1_048_580);
    assert_eq!(&bytes[1_048_576..], b"tail");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_existing_bytes_are_never_rewritten() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("Some-Movie.mp4");

    std::fs::write(&target, b"hello").unwrap();

    Mock::given(method("GET"))
        .and(header("Range", "bytes=5-"))
        .respond_with(ResponseTemplate::new(206).set_body_bytes(b" world".as_slice()))
        .expect(1)
        .mount(&server)
        .await;

    let (task, _progress) = test_task(format!("{}/media/1.mp4", server.uri()), target.clone(), 3);

    test_engine().download(task).await.unwrap();

    assert_eq!(std::fs::read(&target).unwrap(), b"hello world");
}

#[tokio::test]
async fn test_dropped_progress_receiver_does_not_affect_download() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"movie bytes".as_slice()))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("Some-Movie.mp4");
    let (task, progress) = test_task(format!("{}/media/1.mp4", server.uri()), target.clone(), 3);

    // Progress is cosmetic: nobody listening must not break the transfer
    drop(progress);

    let result = test_engine().download(task).await.unwrap();
    assert_eq!(result, target);
}

fn test_item(name: &str, stream_id: u64, url: Option<String>) -> VodItem {
    VodItem {
        name: name.to_string(),
        stream_id,
        container_extension: "mp4".to_string(),
        download_url: url,
    }
}

#[tokio::test]
async fn test_batch_skips_existing_files_without_requests() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    std::fs::write(temp_dir.path().join("Some-Movie.mp4"), b"done").unwrap();

    let items = vec![test_item(
        "Some-Movie",
        1,
        Some(format!("{}/movie/u/p/1.mp4", server.uri())),
    )];

    let (runner, mut progress) = BatchRunner::with_engine(
        test_engine(),
        BatchOptions {
            output_dir: temp_dir.path().to_path_buf(),
            max_attempts: 3,
        },
    );

    let stats = runner.run(&items).await;
    drop(runner);

    assert_eq!(stats.skipped(), 1);
    assert_eq!(stats.completed(), 0);
    assert_eq!(stats.failed(), 0);
    assert!(server.received_requests().await.unwrap().is_empty());

    let mut saw_skip = false;
    while let Some(event) = progress.recv().await {
        if matches!(event, DownloadProgress::Skipped { .. }) {
            saw_skip = true;
        }
    }
    assert!(saw_skip);
}

#[tokio::test]
async fn test_batch_continues_after_exhausted_item() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/movie/u/p/1.mp4"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/u/p/2.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"second movie".as_slice()))
        .expect(1)
        .mount(&server)
        .await;

    let items = vec![
        test_item("Bad-Movie", 1, Some(format!("{}/movie/u/p/1.mp4", server.uri()))),
        test_item("Good-Movie", 2, Some(format!("{}/movie/u/p/2.mp4", server.uri()))),
    ];

    let (runner, _progress) = BatchRunner::with_engine(
        test_engine(),
        BatchOptions {
            output_dir: temp_dir.path().to_path_buf(),
            max_attempts: 2,
        },
    );

    let stats = runner.run(&items).await;

    assert_eq!(stats.failed(), 1);
    assert_eq!(stats.completed(), 1);
    assert_eq!(stats.total(), 2);
    assert_eq!(
        std::fs::read(temp_dir.path().join("Good-Movie.mp4")).unwrap(),
        b"second movie"
    );
    assert!(!temp_dir.path().join("Bad-Movie.mp4").exists() || {
        // A failed item may leave an empty partial file behind; it must not
        // contain bogus data.
        std::fs::read(temp_dir.path().join("Bad-Movie.mp4"))
            .unwrap()
            .is_empty()
    });
}

#[tokio::test]
async fn test_batch_counts_unnormalized_items_as_failed() {
    let temp_dir = TempDir::new().unwrap();

    let items = vec![test_item("No-Url-Movie", 1, None)];

    let (runner, _progress) = BatchRunner::with_engine(
        test_engine(),
        BatchOptions {
            output_dir: temp_dir.path().to_path_buf(),
            max_attempts: 3,
        },
    );

    let stats = runner.run(&items).await;

    assert_eq!(stats.failed(), 1);
    assert_eq!(stats.total(), 1);
}
