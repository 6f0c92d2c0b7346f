use crate::dom::PageDom;

/// Title lookup chain and the placeholder used when nothing matches.
#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    pub title_selectors: Vec<String>,
    pub fallback_title: String,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            title_selectors: vec![".education-name".to_string(), "h1".to_string()],
            fallback_title: "untitled_video".to_string(),
        }
    }
}

/// Metadata captured from the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub title: String,
    pub html: String,
}

pub trait MetadataExtractor: Send + Sync {
    fn page_info(&self, dom: &dyn PageDom) -> PageInfo;
}

/// Tries each configured selector in order; a missing title is not an
/// error, it falls back to the placeholder.
#[derive(Debug, Default)]
pub struct SelectorExtractor {
    settings: ExtractorSettings,
}

impl SelectorExtractor {
    pub fn new(settings: ExtractorSettings) -> Self {
        Self { settings }
    }
}

impl MetadataExtractor for SelectorExtractor {
    fn page_info(&self, dom: &dyn PageDom) -> PageInfo {
        let title = self
            .settings
            .title_selectors
            .iter()
            .find_map(|selector| dom.select_text(selector))
            .unwrap_or_else(|| self.settings.fallback_title.clone());

        PageInfo {
            title,
            html: dom.document_html(),
        }
    }
}
