use thiserror::Error;

/// Why a flush attempt did not land on the companion server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlushError {
    #[error("No videos to save")]
    EmptyStore,
    #[error("Server is not available")]
    ServerUnavailable,
    #[error("{0}")]
    UploadRejected(String),
}

/// Events emitted by the engine worker back to the background context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    FlushCompleted {
        /// Number of uploaded records on success.
        result: Result<usize, FlushError>,
    },
}
