use std::collections::BTreeSet;

use crate::classify::{ClassifierSettings, ManifestClassifier};

/// Dedup marker for a signed manifest URL sighted during this page lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedLink {
    pub url: String,
    pub observed_at: String,
}

/// Tracks which URLs have already produced a found event.
///
/// All tap sources share one detector, so a URL flagged through one
/// mechanism is never re-emitted through another.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Detector {
    classifier: ManifestClassifier,
    seen: BTreeSet<String>,
}

impl Detector {
    pub fn new(settings: ClassifierSettings) -> Self {
        Self {
            classifier: ManifestClassifier::new(settings),
            seen: BTreeSet::new(),
        }
    }

    /// Returns a link on the first sighting of a signed manifest URL.
    ///
    /// Dedup is by exact URL string; later sightings return `None`.
    pub fn observe(&mut self, url: &str, observed_at: &str) -> Option<DetectedLink> {
        if !self.classifier.is_signed(url) {
            return None;
        }
        if !self.seen.insert(url.to_string()) {
            return None;
        }
        Some(DetectedLink {
            url: url.to_string(),
            observed_at: observed_at.to_string(),
        })
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
