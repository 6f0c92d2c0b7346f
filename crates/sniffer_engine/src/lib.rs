//! Sniffer engine: page surfaces and effect execution.
mod autoplay;
mod dom;
mod engine;
mod extract;
mod resource_log;
mod types;
mod upload;

pub use autoplay::{AutoplayProbe, AutoplaySettings};
pub use dom::{PageDom, SnapshotDom};
pub use engine::EngineHandle;
pub use extract::{ExtractorSettings, MetadataExtractor, PageInfo, SelectorExtractor};
pub use resource_log::ResourceLog;
pub use types::{EngineEvent, FlushError};
pub use upload::{ReqwestUploader, UploadVideo, Uploader, UploaderSettings};
