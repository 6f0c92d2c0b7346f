use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use sniffer_core::{
    update, BackgroundMsg, BackgroundState, Effect, FlushFailure, PageMsg, Reply, VideoRecord,
};
use sniffer_engine::{EngineEvent, EngineHandle, FlushError, UploadVideo};
use sniffer_logging::{sniffer_info, sniffer_trace, sniffer_warn};

use super::relay::{self, Envelope, Inbox, Outbox};

const PAGE_REPLY_TIMEOUT: Duration = Duration::from_secs(5);
const IDLE_POLL: Duration = Duration::from_millis(20);

/// The visible badge, shared with the console front end.
pub struct Badge {
    text: Mutex<String>,
}

impl Badge {
    pub fn new() -> Self {
        Self {
            text: Mutex::new("0".to_string()),
        }
    }

    pub fn text(&self) -> String {
        self.text.lock().expect("lock badge").clone()
    }

    fn set(&self, text: String) {
        *self.text.lock().expect("lock badge") = text;
    }
}

/// Spawn the background context: the hub owning the store.
pub(crate) fn spawn(
    inbox: Inbox<BackgroundMsg>,
    self_tx: Outbox<BackgroundMsg>,
    page_tx: Outbox<PageMsg>,
    engine: EngineHandle,
    badge: Arc<Badge>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut context = BackgroundContext {
            state: BackgroundState::new(),
            engine,
            page_tx,
            self_tx,
            badge,
            pending_save: None,
        };
        context.run(inbox);
    })
}

struct BackgroundContext {
    state: BackgroundState,
    engine: EngineHandle,
    page_tx: Outbox<PageMsg>,
    self_tx: Outbox<BackgroundMsg>,
    badge: Arc<Badge>,
    /// Reply channel of a save whose flush is still in flight.
    pending_save: Option<mpsc::Sender<Reply>>,
}

impl BackgroundContext {
    fn run(&mut self, inbox: Inbox<BackgroundMsg>) {
        loop {
            self.drain_engine_events();
            match inbox.recv_timeout(IDLE_POLL) {
                Ok(envelope) => self.dispatch(envelope),
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    fn drain_engine_events(&mut self) {
        while let Some(EngineEvent::FlushCompleted { result }) = self.engine.try_recv() {
            let reply = self.pending_save.take();
            self.dispatch(Envelope {
                msg: BackgroundMsg::FlushCompleted {
                    result: result.map_err(map_flush_error),
                },
                reply,
            });
        }
    }

    fn dispatch(&mut self, envelope: Envelope<BackgroundMsg>) {
        let Envelope { msg, reply } = envelope;
        match &msg {
            BackgroundMsg::UrlFound { url } => sniffer_info!("found url: {url}"),
            BackgroundMsg::RequestObserved { url, source, .. } => {
                sniffer_trace!("request observed via {source}: {url}");
            }
            _ => {}
        }

        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        // Badge refresh rides directly on the mutation, before any reply
        // goes out.
        if self.state.consume_dirty() {
            let view = self.state.view();
            self.badge.set(view.badge_text.clone());
            println!("[badge] {}", view.badge_text);
        }

        self.run_effects(effects, reply);
    }

    fn run_effects(&mut self, effects: Vec<Effect>, mut reply: Option<mpsc::Sender<Reply>>) {
        for effect in effects {
            match effect {
                Effect::RequestPageInfo { url } => self.request_page_info(url),
                Effect::RequestVideoInfo { url } => {
                    relay::send(&self.page_tx, PageMsg::VideoInfoRequested { url });
                }
                Effect::BeginFlush { batch } => {
                    if self.pending_save.is_some() {
                        sniffer_warn!("a save was already in flight; its reply is dropped");
                    }
                    self.pending_save = reply.take();
                    self.engine
                        .flush(batch.into_iter().map(map_record).collect());
                }
                Effect::Respond(response) => {
                    if let Some(tx) = reply.take() {
                        let _ = tx.send(response);
                    }
                }
            }
        }
    }

    /// Ask the page for its metadata and feed the answer back to ourselves
    /// as an `addLink`-style insert. Runs on a helper thread so the hub
    /// never blocks on the page context.
    fn request_page_info(&self, url: String) {
        let page_tx = self.page_tx.clone();
        let self_tx = self.self_tx.clone();
        thread::spawn(move || {
            match relay::request(&page_tx, PageMsg::PageInfoRequested, PAGE_REPLY_TIMEOUT) {
                Some(Reply::PageInfo { title, html }) => {
                    relay::send(&self_tx, BackgroundMsg::LinkAdded { url, title, html });
                }
                other => sniffer_warn!("page info request for {url} failed: {other:?}"),
            }
        });
    }
}

fn map_flush_error(err: FlushError) -> FlushFailure {
    match err {
        FlushError::EmptyStore => FlushFailure::EmptyStore,
        FlushError::ServerUnavailable => FlushFailure::ServerUnavailable,
        FlushError::UploadRejected(message) => FlushFailure::Rejected(message),
    }
}

fn map_record(record: VideoRecord) -> UploadVideo {
    UploadVideo {
        url: record.url,
        title: record.title,
        html: record.html,
    }
}
