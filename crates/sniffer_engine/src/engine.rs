use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use sniffer_logging::{sniffer_error, sniffer_info, sniffer_warn};

use crate::upload::{ReqwestUploader, UploadVideo, Uploader, UploaderSettings};
use crate::EngineEvent;

enum EngineCommand {
    Flush { videos: Vec<UploadVideo> },
}

/// Handle to the engine worker thread.
///
/// Commands go in over a channel; completion events come back the same way,
/// so the background context never blocks on the network.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: UploaderSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let uploader = Arc::new(ReqwestUploader::new(settings));

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    sniffer_error!("engine runtime failed to start: {err}");
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let uploader = uploader.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(uploader.as_ref(), command, event_tx).await;
                });
            }
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    pub fn flush(&self, videos: Vec<UploadVideo>) {
        let _ = self.cmd_tx.send(EngineCommand::Flush { videos });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }
}

async fn handle_command(
    uploader: &dyn Uploader,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Flush { videos } => {
            let count = videos.len();
            let result = uploader.flush(&videos).await;
            match &result {
                Ok(accepted) => sniffer_info!("flushed {accepted} videos"),
                Err(err) => sniffer_warn!("flush of {count} videos failed: {err}"),
            }
            let _ = event_tx.send(EngineEvent::FlushCompleted { result });
        }
    }
}
