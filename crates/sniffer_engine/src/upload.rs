use std::time::Duration;

use serde::{Deserialize, Serialize};
use sniffer_logging::sniffer_warn;

use crate::types::FlushError;

/// Companion-server endpoints and transport limits.
#[derive(Debug, Clone)]
pub struct UploaderSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for UploaderSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Wire form of one captured video record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadVideo {
    pub url: String,
    pub title: String,
    pub html: String,
}

#[derive(Serialize)]
struct UploadBody<'a> {
    videos: &'a [UploadVideo],
}

#[derive(Debug, Default, Deserialize)]
struct ServerReply {
    error: Option<String>,
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    /// Upload the whole batch, returning how many records were accepted.
    async fn flush(&self, videos: &[UploadVideo]) -> Result<usize, FlushError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    settings: UploaderSettings,
}

impl ReqwestUploader {
    pub fn new(settings: UploaderSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, FlushError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|_| FlushError::ServerUnavailable)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    /// Liveness probe: any transport error or non-OK status means unavailable.
    pub async fn ping(&self) -> bool {
        let Ok(client) = self.build_client() else {
            return false;
        };
        match client.get(self.endpoint("ping")).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                sniffer_warn!("Server check failed: {err}");
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn flush(&self, videos: &[UploadVideo]) -> Result<usize, FlushError> {
        if videos.is_empty() {
            return Err(FlushError::EmptyStore);
        }

        if !self.ping().await {
            return Err(FlushError::ServerUnavailable);
        }

        let client = self.build_client()?;
        let response = client
            .post(self.endpoint("download"))
            .json(&UploadBody { videos })
            .send()
            .await
            .map_err(|_| FlushError::ServerUnavailable)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        // Error bodies are not guaranteed to be JSON.
        let reply: ServerReply = serde_json::from_str(&body).unwrap_or_default();

        if !status.is_success() {
            return Err(FlushError::UploadRejected(
                reply.error.unwrap_or_else(|| "Failed to save data".to_string()),
            ));
        }

        Ok(videos.len())
    }
}
