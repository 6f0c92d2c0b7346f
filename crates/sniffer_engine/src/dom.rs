use std::sync::Mutex;

use scraper::{Html, Selector};

/// Page surface the content pipeline works against.
///
/// The host environment's document is reached only through this seam, so
/// the pipeline runs the same against a live page or an in-process snapshot.
pub trait PageDom: Send + Sync {
    /// Full serialized document.
    fn document_html(&self) -> String;
    /// Trimmed text of the first element matching `selector`, when any.
    fn select_text(&self, selector: &str) -> Option<String>;
    fn set_background(&self, color: &str);
    fn background(&self) -> Option<String>;
    /// Activate the play control matching `selector`. Returns whether
    /// anything was there to click.
    fn activate_play_control(&self, selector: &str) -> bool;
    /// The page's current visible URL.
    fn current_url(&self) -> String;
}

/// Scraper-backed document snapshot.
pub struct SnapshotDom {
    inner: Mutex<Inner>,
}

struct Inner {
    url: String,
    html: String,
    background: Option<String>,
    play_activated: bool,
}

impl SnapshotDom {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                url: url.into(),
                html: html.into(),
                background: None,
                play_activated: false,
            }),
        }
    }

    /// Replace the document, as a client-side navigation would.
    pub fn navigate(&self, url: impl Into<String>, html: impl Into<String>) {
        let mut inner = self.inner.lock().expect("lock dom state");
        inner.url = url.into();
        inner.html = html.into();
        inner.play_activated = false;
    }

    pub fn play_activated(&self) -> bool {
        self.inner.lock().expect("lock dom state").play_activated
    }
}

impl PageDom for SnapshotDom {
    fn document_html(&self) -> String {
        self.inner.lock().expect("lock dom state").html.clone()
    }

    fn select_text(&self, selector: &str) -> Option<String> {
        let html = self.document_html();
        let doc = Html::parse_document(&html);
        let sel = Selector::parse(selector).ok()?;
        doc.select(&sel)
            .next()
            .map(|node| node.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    }

    fn set_background(&self, color: &str) {
        self.inner.lock().expect("lock dom state").background = Some(color.to_string());
    }

    fn background(&self) -> Option<String> {
        self.inner.lock().expect("lock dom state").background.clone()
    }

    fn activate_play_control(&self, selector: &str) -> bool {
        let html = self.document_html();
        let doc = Html::parse_document(&html);
        let Ok(sel) = Selector::parse(selector) else {
            return false;
        };
        if doc.select(&sel).next().is_none() {
            return false;
        }
        self.inner.lock().expect("lock dom state").play_activated = true;
        true
    }

    fn current_url(&self) -> String {
        self.inner.lock().expect("lock dom state").url.clone()
    }
}
