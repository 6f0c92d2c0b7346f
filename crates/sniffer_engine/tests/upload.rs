use pretty_assertions::assert_eq;
use serde_json::json;
use sniffer_engine::{FlushError, ReqwestUploader, UploadVideo, Uploader, UploaderSettings};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn uploader_for(server: &MockServer) -> ReqwestUploader {
    ReqwestUploader::new(UploaderSettings {
        base_url: server.uri(),
        ..UploaderSettings::default()
    })
}

fn sample_batch() -> Vec<UploadVideo> {
    vec![
        UploadVideo {
            url: "https://x/a/playlist.json?exp=1&hmac=aa".to_string(),
            title: "Lesson 1".to_string(),
            html: "<html>a</html>".to_string(),
        },
        UploadVideo {
            url: "https://x/b/playlist.json?exp=1&hmac=bb".to_string(),
            title: "Lesson 2".to_string(),
            html: "<html>b</html>".to_string(),
        },
    ]
}

async fn mount_ping(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

#[tokio::test]
async fn flush_posts_json_batch_and_reports_count() {
    let server = MockServer::start().await;
    mount_ping(&server).await;

    let batch = sample_batch();
    Mock::given(method("POST"))
        .and(path("/download"))
        .and(body_json(json!({
            "videos": [
                {
                    "url": "https://x/a/playlist.json?exp=1&hmac=aa",
                    "title": "Lesson 1",
                    "html": "<html>a</html>",
                },
                {
                    "url": "https://x/b/playlist.json?exp=1&hmac=bb",
                    "title": "Lesson 2",
                    "html": "<html>b</html>",
                },
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let uploader = uploader_for(&server);
    let accepted = uploader.flush(&batch).await.expect("flush ok");
    assert_eq!(accepted, 2);
}

#[tokio::test]
async fn empty_batch_fails_without_touching_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/download"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let uploader = uploader_for(&server);
    let err = uploader.flush(&[]).await.unwrap_err();
    assert_eq!(err, FlushError::EmptyStore);
    server.verify().await;
}

#[tokio::test]
async fn failed_ping_means_server_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let uploader = uploader_for(&server);
    assert!(!uploader.ping().await);

    let err = uploader.flush(&sample_batch()).await.unwrap_err();
    assert_eq!(err, FlushError::ServerUnavailable);
}

#[tokio::test]
async fn unreachable_server_means_server_unavailable() {
    // Nothing listens here; the connection is refused outright.
    let uploader = ReqwestUploader::new(UploaderSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        connect_timeout: std::time::Duration::from_millis(200),
        request_timeout: std::time::Duration::from_millis(200),
    });

    assert!(!uploader.ping().await);
    let err = uploader.flush(&sample_batch()).await.unwrap_err();
    assert_eq!(err, FlushError::ServerUnavailable);
}

#[tokio::test]
async fn rejection_carries_the_server_error_message() {
    let server = MockServer::start().await;
    mount_ping(&server).await;
    Mock::given(method("POST"))
        .and(path("/download"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "No valid videos in batch"
        })))
        .mount(&server)
        .await;

    let uploader = uploader_for(&server);
    let err = uploader.flush(&sample_batch()).await.unwrap_err();
    assert_eq!(
        err,
        FlushError::UploadRejected("No valid videos in batch".to_string())
    );
}

#[tokio::test]
async fn rejection_without_json_body_uses_generic_message() {
    let server = MockServer::start().await;
    mount_ping(&server).await;
    Mock::given(method("POST"))
        .and(path("/download"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let uploader = uploader_for(&server);
    let err = uploader.flush(&sample_batch()).await.unwrap_err();
    assert_eq!(
        err,
        FlushError::UploadRejected("Failed to save data".to_string())
    );
}
