//! Sniffer core: pure state machine for the background context.
mod classify;
mod detector;
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use classify::{ClassifierSettings, ManifestClassifier};
pub use detector::{DetectedLink, Detector};
pub use effect::Effect;
pub use msg::{BackgroundMsg, FlushFailure, PageMsg, PopupMsg, Reply, TapKind};
pub use state::{BackgroundState, VideoRecord};
pub use update::update;
pub use view_model::StoreView;
