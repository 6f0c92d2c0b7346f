use url::Url;

/// Markers that identify a downloadable streaming manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierSettings {
    /// Substring that must appear in the URL path.
    pub path_marker: String,
    /// Query key carrying the link expiry.
    pub expiry_marker: String,
    /// Query key carrying the link signature.
    pub signature_marker: String,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            path_marker: "playlist.json".to_string(),
            expiry_marker: "exp".to_string(),
            signature_marker: "hmac".to_string(),
        }
    }
}

/// Classifies observed URLs against the manifest markers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManifestClassifier {
    settings: ClassifierSettings,
}

impl ManifestClassifier {
    pub fn new(settings: ClassifierSettings) -> Self {
        Self { settings }
    }

    /// A candidate carries the path marker. Unparseable URLs never qualify.
    pub fn is_candidate(&self, raw: &str) -> bool {
        match Url::parse(raw) {
            Ok(url) => url.path().contains(&self.settings.path_marker),
            Err(_) => false,
        }
    }

    /// A signed manifest is a candidate that carries both query markers.
    pub fn is_signed(&self, raw: &str) -> bool {
        let Ok(url) = Url::parse(raw) else {
            return false;
        };
        if !url.path().contains(&self.settings.path_marker) {
            return false;
        }
        let mut has_expiry = false;
        let mut has_signature = false;
        for (key, _) in url.query_pairs() {
            if key == self.settings.expiry_marker.as_str() {
                has_expiry = true;
            } else if key == self.settings.signature_marker.as_str() {
                has_signature = true;
            }
        }
        has_expiry && has_signature
    }
}
