use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use sniffer_core::{
    BackgroundMsg, ClassifierSettings, ManifestClassifier, PageMsg, PopupMsg, Reply, TapKind,
};
use sniffer_engine::{
    AutoplayProbe, AutoplaySettings, ExtractorSettings, MetadataExtractor, PageDom, ResourceLog,
    SelectorExtractor, SnapshotDom,
};
use sniffer_logging::{sniffer_debug, sniffer_info};

use super::relay::{self, Envelope, Inbox, Outbox};

const IDLE_POLL: Duration = Duration::from_millis(20);

/// Shared wall clock, injected so the pipeline itself stays clock-free.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

/// What the host page surface reports into the content pipeline.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// A network tap saw an outbound request.
    RequestObserved { url: String, source: TapKind },
    /// A `<video>`/`<iframe>` element appeared in the document.
    MediaElementAdded,
    /// The visible URL changed (client-side navigation included).
    Navigated { url: String, html: String },
    /// The user clicked a fragment whose HTML goes to the popup panel.
    FragmentClicked { html: String },
    /// Fixed-interval driver for the autoplay probe.
    ProbeTick,
}

pub(crate) fn spawn(
    inbox: Inbox<PageMsg>,
    host_rx: mpsc::Receiver<HostEvent>,
    dom: Arc<SnapshotDom>,
    bg_tx: Outbox<BackgroundMsg>,
    popup_tx: Outbox<PopupMsg>,
    clock: Clock,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let initial_url = dom.current_url();
        let mut context = PageContext {
            dom,
            resources: ResourceLog::new(),
            classifier: ManifestClassifier::new(ClassifierSettings::default()),
            extractor: SelectorExtractor::new(ExtractorSettings::default()),
            probe: AutoplayProbe::new(AutoplaySettings::default(), &initial_url),
            bg_tx,
            popup_tx,
            clock,
        };
        context.run(inbox, host_rx);
    })
}

struct PageContext {
    dom: Arc<SnapshotDom>,
    resources: ResourceLog,
    classifier: ManifestClassifier,
    extractor: SelectorExtractor,
    probe: AutoplayProbe,
    bg_tx: Outbox<BackgroundMsg>,
    popup_tx: Outbox<PopupMsg>,
    clock: Clock,
}

impl PageContext {
    fn run(&mut self, inbox: Inbox<PageMsg>, host_rx: mpsc::Receiver<HostEvent>) {
        loop {
            let mut worked = false;
            match inbox.try_recv() {
                Ok(envelope) => {
                    self.handle_relay(envelope);
                    worked = true;
                }
                Err(mpsc::TryRecvError::Empty) => {}
                Err(mpsc::TryRecvError::Disconnected) => break,
            }
            match host_rx.try_recv() {
                Ok(event) => {
                    self.handle_host(event);
                    worked = true;
                }
                Err(mpsc::TryRecvError::Empty) => {}
                Err(mpsc::TryRecvError::Disconnected) => break,
            }
            if !worked {
                thread::sleep(IDLE_POLL);
            }
        }
    }

    fn handle_relay(&mut self, envelope: Envelope<PageMsg>) {
        let Envelope { msg, reply } = envelope;
        match msg {
            PageMsg::PageInfoRequested => {
                let info = self.extractor.page_info(self.dom.as_ref());
                if let Some(tx) = reply {
                    let _ = tx.send(Reply::PageInfo {
                        title: info.title,
                        html: info.html,
                    });
                }
            }
            PageMsg::VideoInfoRequested { url } => {
                let info = self.extractor.page_info(self.dom.as_ref());
                relay::send(
                    &self.bg_tx,
                    BackgroundMsg::VideoInfoReceived {
                        url,
                        title: info.title,
                        html: info.html,
                    },
                );
            }
            PageMsg::SetBackground { color } => {
                sniffer_debug!("page background set to {color}");
                self.dom.set_background(&color);
            }
        }
    }

    fn handle_host(&mut self, event: HostEvent) {
        match event {
            HostEvent::RequestObserved { url, source } => self.observe(url, source),
            HostEvent::MediaElementAdded => {
                sniffer_debug!("media element added, rescanning resource log");
                self.rescan();
            }
            HostEvent::Navigated { url, html } => {
                sniffer_info!("navigated to {url}");
                self.dom.navigate(url, html);
                self.resources.clear();
            }
            HostEvent::FragmentClicked { html } => {
                relay::send(&self.popup_tx, PopupMsg::PanelHtml { html });
            }
            HostEvent::ProbeTick => {
                if self.probe.tick(self.dom.as_ref()) {
                    sniffer_info!("autoplay activated on {}", self.dom.current_url());
                }
            }
        }
    }

    fn observe(&mut self, url: String, source: TapKind) {
        self.resources.push(url.clone());
        self.forward(url, source);
    }

    /// Every candidate goes to the background's shared detector; fully
    /// signed URLs additionally raise the log-only found notification.
    fn forward(&self, url: String, source: TapKind) {
        if self.classifier.is_signed(&url) {
            relay::send(&self.bg_tx, BackgroundMsg::UrlFound { url: url.clone() });
        }
        if self.classifier.is_candidate(&url) {
            relay::send(
                &self.bg_tx,
                BackgroundMsg::RequestObserved {
                    url,
                    source,
                    observed_at: (self.clock)(),
                },
            );
        }
    }

    fn rescan(&self) {
        for url in self.resources.entries() {
            if self.classifier.is_candidate(url) {
                self.forward(url.to_string(), TapKind::ResourceTiming);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNED: &str = "https://x/playlist.json?exp=1&hmac=abc";
    const LESSON_PAGE: &str = r#"<html><body>
        <div class="education-name">Lesson 1</div>
    </body></html>"#;

    struct Harness {
        host_tx: mpsc::Sender<HostEvent>,
        page_tx: Outbox<PageMsg>,
        bg_rx: Inbox<BackgroundMsg>,
        _popup_rx: Inbox<PopupMsg>,
    }

    fn start(url: &str, html: &str) -> Harness {
        let (bg_tx, bg_rx) = relay::channel();
        let (page_tx, page_rx) = relay::channel();
        let (popup_tx, popup_rx) = relay::channel();
        let (host_tx, host_rx) = mpsc::channel();
        let dom = Arc::new(SnapshotDom::new(url, html));
        let clock: Clock = Arc::new(|| "2026-01-01T00:00:00Z".to_string());
        spawn(page_rx, host_rx, dom, bg_tx, popup_tx, clock);
        Harness {
            host_tx,
            page_tx,
            bg_rx,
            _popup_rx: popup_rx,
        }
    }

    fn next_background_msg(harness: &Harness) -> BackgroundMsg {
        harness
            .bg_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("background message")
            .msg
    }

    #[test]
    fn signed_observation_raises_found_then_detection() {
        let harness = start("https://page", "<html/>");
        harness
            .host_tx
            .send(HostEvent::RequestObserved {
                url: SIGNED.to_string(),
                source: TapKind::RequestPrimitive,
            })
            .unwrap();

        assert_eq!(
            next_background_msg(&harness),
            BackgroundMsg::UrlFound {
                url: SIGNED.to_string(),
            }
        );
        assert_eq!(
            next_background_msg(&harness),
            BackgroundMsg::RequestObserved {
                url: SIGNED.to_string(),
                source: TapKind::RequestPrimitive,
                observed_at: "2026-01-01T00:00:00Z".to_string(),
            }
        );
    }

    #[test]
    fn non_candidate_traffic_is_not_forwarded() {
        let harness = start("https://page", "<html/>");
        harness
            .host_tx
            .send(HostEvent::RequestObserved {
                url: "https://x/app.css".to_string(),
                source: TapKind::ResourceTiming,
            })
            .unwrap();

        assert!(harness
            .bg_rx
            .recv_timeout(Duration::from_millis(300))
            .is_err());
    }

    #[test]
    fn media_insert_rescans_the_resource_log() {
        let harness = start("https://page", "<html/>");
        // Unsigned candidate: logged in the timing list, forwarded once on
        // observation and once more on rescan.
        let candidate = "https://x/playlist.json";
        harness
            .host_tx
            .send(HostEvent::RequestObserved {
                url: candidate.to_string(),
                source: TapKind::ResourceTiming,
            })
            .unwrap();
        harness.host_tx.send(HostEvent::MediaElementAdded).unwrap();

        let first = next_background_msg(&harness);
        let second = next_background_msg(&harness);
        for msg in [first, second] {
            assert_eq!(
                msg,
                BackgroundMsg::RequestObserved {
                    url: candidate.to_string(),
                    source: TapKind::ResourceTiming,
                    observed_at: "2026-01-01T00:00:00Z".to_string(),
                }
            );
        }
    }

    #[test]
    fn page_info_request_returns_extracted_metadata() {
        let harness = start("https://page", LESSON_PAGE);
        let reply = relay::request(
            &harness.page_tx,
            PageMsg::PageInfoRequested,
            Duration::from_secs(5),
        );
        assert_eq!(
            reply,
            Some(Reply::PageInfo {
                title: "Lesson 1".to_string(),
                html: LESSON_PAGE.to_string(),
            })
        );
    }

    #[test]
    fn video_info_request_sends_metadata_to_background() {
        let harness = start("https://page", LESSON_PAGE);
        relay::send(
            &harness.page_tx,
            PageMsg::VideoInfoRequested {
                url: SIGNED.to_string(),
            },
        );

        assert_eq!(
            next_background_msg(&harness),
            BackgroundMsg::VideoInfoReceived {
                url: SIGNED.to_string(),
                title: "Lesson 1".to_string(),
                html: LESSON_PAGE.to_string(),
            }
        );
    }

    #[test]
    fn fragment_click_lands_in_the_popup_panel() {
        let harness = start("https://page", "<html/>");
        harness
            .host_tx
            .send(HostEvent::FragmentClicked {
                html: "<b>clip</b>".to_string(),
            })
            .unwrap();

        let envelope = harness
            ._popup_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("panel message");
        assert_eq!(
            envelope.msg,
            PopupMsg::PanelHtml {
                html: "<b>clip</b>".to_string(),
            }
        );
    }
}
