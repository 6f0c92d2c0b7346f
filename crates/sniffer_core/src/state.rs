use std::collections::BTreeMap;

use crate::classify::{ClassifierSettings, ManifestClassifier};
use crate::detector::{DetectedLink, Detector};
use crate::view_model::StoreView;

/// One captured video: manifest URL plus the page metadata seen with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub url: String,
    pub title: String,
    pub html: String,
}

/// State owned by the background context.
///
/// Created at background startup and torn down with it; no other context
/// reads or writes it except through relay messages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackgroundState {
    videos: BTreeMap<String, VideoRecord>,
    detector: Detector,
    classifier: ManifestClassifier,
    dirty: bool,
}

impl BackgroundState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ClassifierSettings) -> Self {
        Self {
            videos: BTreeMap::new(),
            detector: Detector::new(settings.clone()),
            classifier: ManifestClassifier::new(settings),
            dirty: false,
        }
    }

    /// Qualified insert: the URL must carry the manifest path marker.
    /// A later record for the same URL fully replaces the prior one.
    pub fn put(&mut self, url: &str, title: String, html: String) -> bool {
        if !self.classifier.is_candidate(url) {
            return false;
        }
        self.videos.insert(
            url.to_string(),
            VideoRecord {
                url: url.to_string(),
                title,
                html,
            },
        );
        self.dirty = true;
        true
    }

    /// Raw overwrite insert with no qualification check.
    pub fn record(&mut self, url: String, title: String, html: String) {
        self.videos.insert(
            url.clone(),
            VideoRecord { url, title, html },
        );
        self.dirty = true;
    }

    pub fn clear(&mut self) {
        self.videos.clear();
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// Snapshot of all records in ascending URL order, for upload.
    pub fn batch(&self) -> Vec<VideoRecord> {
        self.videos.values().cloned().collect()
    }

    /// Run an observed request URL through the shared dedup detector.
    pub fn observe(&mut self, url: &str, observed_at: &str) -> Option<DetectedLink> {
        self.detector.observe(url, observed_at)
    }

    pub fn view(&self) -> StoreView {
        StoreView {
            badge_text: self.videos.len().to_string(),
            video_count: self.videos.len(),
            urls: self.videos.keys().cloned().collect(),
        }
    }

    /// Returns whether a view refresh is owed, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
