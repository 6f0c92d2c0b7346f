/// Render snapshot of the background store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreView {
    /// Badge text: always the decimal count of stored records.
    pub badge_text: String,
    pub video_count: usize,
    /// Stored manifest URLs in ascending order.
    pub urls: Vec<String>,
}
