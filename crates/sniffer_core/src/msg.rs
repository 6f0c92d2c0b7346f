use std::fmt;

/// Which interception mechanism observed a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapKind {
    /// Declarative request interception registered with the host.
    WebRequest,
    /// The page's wrapped request-sending primitive.
    RequestPrimitive,
    /// A resource-timing entry.
    ResourceTiming,
}

impl fmt::Display for TapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TapKind::WebRequest => write!(f, "web-request"),
            TapKind::RequestPrimitive => write!(f, "request-primitive"),
            TapKind::ResourceTiming => write!(f, "resource-timing"),
        }
    }
}

/// Messages consumed by the background context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundMsg {
    /// Page observer captured metadata for a manifest URL (qualified insert).
    LinkAdded {
        url: String,
        title: String,
        html: String,
    },
    /// Metadata from the page's extraction pathway (raw overwrite insert).
    VideoInfoReceived {
        url: String,
        title: String,
        html: String,
    },
    /// Page-side classifier sighted a signed manifest URL. Logged, not stored.
    UrlFound { url: String },
    /// A network tap observed an outbound request URL.
    RequestObserved {
        url: String,
        source: TapKind,
        observed_at: String,
    },
    /// Popup asked for the store to be flushed to the companion server.
    SaveRequested,
    /// Popup asked for the store to be emptied.
    ClearRequested,
    /// The engine finished a flush attempt.
    FlushCompleted { result: Result<usize, FlushFailure> },
}

/// Messages consumed by the page context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageMsg {
    /// Background wants `{title, html}` for the current page.
    PageInfoRequested,
    /// Background wants metadata extracted and sent back for this URL.
    VideoInfoRequested { url: String },
    /// Popup picked a page background color.
    SetBackground { color: String },
}

/// Messages consumed by the popup context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupMsg {
    /// Page published a fragment for display in the popup panel.
    PanelHtml { html: String },
}

/// Replies carried back over the relay to the sender of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ack {
        success: bool,
    },
    PageInfo {
        title: String,
        html: String,
    },
    SaveOutcome {
        success: bool,
        message: Option<String>,
        error: Option<String>,
    },
}

/// Why a flush did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushFailure {
    /// The store had no entries; the network was never touched.
    EmptyStore,
    /// The companion server's liveness probe failed.
    ServerUnavailable,
    /// The server rejected the batch, with its error text when provided.
    Rejected(String),
}

impl fmt::Display for FlushFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlushFailure::EmptyStore => write!(f, "No videos to save"),
            FlushFailure::ServerUnavailable => write!(f, "Server is not available"),
            FlushFailure::Rejected(message) => write!(f, "{message}"),
        }
    }
}
