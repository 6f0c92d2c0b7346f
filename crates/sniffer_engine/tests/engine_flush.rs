use std::time::Duration;

use serde_json::json;
use sniffer_engine::{EngineEvent, EngineHandle, FlushError, UploadVideo, UploaderSettings};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn wait_for_event(engine: &EngineHandle) -> EngineEvent {
    for _ in 0..250 {
        if let Some(event) = engine.try_recv() {
            return event;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("engine produced no event in time");
}

fn one_video() -> Vec<UploadVideo> {
    vec![UploadVideo {
        url: "https://x/playlist.json?exp=1&hmac=abc".to_string(),
        title: "Lesson 1".to_string(),
        html: "<html/>".to_string(),
    }]
}

#[tokio::test]
async fn flush_command_round_trips_success_event() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/download"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let engine = EngineHandle::new(UploaderSettings {
        base_url: server.uri(),
        ..UploaderSettings::default()
    });
    engine.flush(one_video());

    let EngineEvent::FlushCompleted { result } = wait_for_event(&engine).await;
    assert_eq!(result, Ok(1));
}

#[tokio::test]
async fn flush_command_round_trips_failure_event() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let engine = EngineHandle::new(UploaderSettings {
        base_url: server.uri(),
        ..UploaderSettings::default()
    });
    engine.flush(one_video());

    let EngineEvent::FlushCompleted { result } = wait_for_event(&engine).await;
    assert_eq!(result, Err(FlushError::ServerUnavailable));
}
