use std::fs;
use std::io::{self, BufRead};
use std::sync::{mpsc, Arc};
use std::thread;

use chrono::Utc;
use sniffer_core::{BackgroundMsg, TapKind};
use sniffer_engine::{AutoplaySettings, EngineHandle, SnapshotDom, UploaderSettings};
use sniffer_logging::{sniffer_info, sniffer_warn};

use super::background::{self, Badge};
use super::logging::{self, LogDestination};
use super::page::{self, Clock, HostEvent};
use super::popup::Popup;
use super::relay;

const START_URL: &str = "about:blank";
const EMPTY_PAGE: &str = "<html><head></head><body></body></html>";

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::Both);
    sniffer_info!("manifest sniffer starting");

    let engine = EngineHandle::new(UploaderSettings::default());
    let dom = Arc::new(SnapshotDom::new(START_URL, EMPTY_PAGE));
    let clock: Clock = Arc::new(|| Utc::now().to_rfc3339());

    let (bg_tx, bg_rx) = relay::channel();
    let (page_tx, page_rx) = relay::channel();
    let (popup_tx, popup_rx) = relay::channel();
    let (host_tx, host_rx) = mpsc::channel();

    let badge = Arc::new(Badge::new());
    background::spawn(bg_rx, bg_tx.clone(), page_tx.clone(), engine, badge.clone());
    page::spawn(page_rx, host_rx, dom, bg_tx.clone(), popup_tx, clock.clone());

    // Fixed-interval driver for the autoplay probe.
    let tick_tx = host_tx.clone();
    let interval = AutoplaySettings::default().probe_interval;
    thread::spawn(move || {
        while tick_tx.send(HostEvent::ProbeTick).is_ok() {
            thread::sleep(interval);
        }
    });

    let mut popup = Popup::new(bg_tx.clone(), page_tx, popup_rx);
    print_help();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            // Network taps feeding the page context.
            "req" if !rest.is_empty() => {
                let _ = host_tx.send(HostEvent::RequestObserved {
                    url: rest.to_string(),
                    source: TapKind::RequestPrimitive,
                });
            }
            "timing" if !rest.is_empty() => {
                let _ = host_tx.send(HostEvent::RequestObserved {
                    url: rest.to_string(),
                    source: TapKind::ResourceTiming,
                });
            }
            // The privileged interception point reports straight to the hub.
            "webreq" if !rest.is_empty() => {
                relay::send(
                    &bg_tx,
                    BackgroundMsg::RequestObserved {
                        url: rest.to_string(),
                        source: TapKind::WebRequest,
                        observed_at: clock(),
                    },
                );
            }
            "media" => {
                let _ = host_tx.send(HostEvent::MediaElementAdded);
            }
            "nav" if !rest.is_empty() => {
                let (url, html_file) = match rest.split_once(' ') {
                    Some((url, file)) => (url, Some(file.trim())),
                    None => (rest, None),
                };
                let html = match html_file {
                    Some(file) => match fs::read_to_string(file) {
                        Ok(html) => html,
                        Err(err) => {
                            sniffer_warn!("could not read {file}: {err}");
                            continue;
                        }
                    },
                    None => EMPTY_PAGE.to_string(),
                };
                let _ = host_tx.send(HostEvent::Navigated {
                    url: url.to_string(),
                    html,
                });
            }
            "frag" if !rest.is_empty() => {
                let _ = host_tx.send(HostEvent::FragmentClicked {
                    html: rest.to_string(),
                });
            }
            "color" if !rest.is_empty() => popup.pick_color(rest),
            "save" => popup.save(),
            "clear" => popup.clear(),
            "status" => {
                println!("[badge] {}", badge.text());
                if !popup.status().is_empty() {
                    println!("[popup] {}", popup.status());
                }
            }
            "help" => print_help(),
            "quit" | "exit" => break,
            _ => println!("unknown command: {line} (try `help`)"),
        }

        popup.drain_panel();
    }

    sniffer_info!("manifest sniffer exiting");
    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  req <url>         request seen through the wrapped primitive");
    println!("  timing <url>      resource-timing entry");
    println!("  webreq <url>      privileged web-request interception");
    println!("  media             playable-media element inserted");
    println!("  nav <url> [file]  navigate; page HTML read from file if given");
    println!("  frag <html>       clicked fragment, published to the panel");
    println!("  color <color>     set page background from the popup");
    println!("  save              flush captured videos to the server");
    println!("  clear             drop captured videos");
    println!("  status            badge and last popup status");
    println!("  quit");
}
