use crate::msg::Reply;
use crate::state::VideoRecord;

/// Work the background runtime must carry out after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the page context for `{title, html}`, to be stored under `url`.
    RequestPageInfo { url: String },
    /// Ask the page context to run metadata extraction for `url`.
    RequestVideoInfo { url: String },
    /// Hand the materialized batch to the engine for upload.
    ///
    /// The reply to the triggering message is deferred until the engine
    /// reports back with `FlushCompleted`.
    BeginFlush { batch: Vec<VideoRecord> },
    /// Answer the sender of the message being dispatched.
    Respond(Reply),
}
