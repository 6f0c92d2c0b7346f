use std::time::Duration;

use sniffer_core::{BackgroundMsg, PageMsg, PopupMsg, Reply};

use super::relay::{self, Inbox, Outbox};

// A save rides the flush's own transport timeouts, so give it room.
const SAVE_TIMEOUT: Duration = Duration::from_secs(120);
const CLEAR_TIMEOUT: Duration = Duration::from_secs(5);

/// The manual-trigger surface: save/clear buttons, status line, panel.
pub(crate) struct Popup {
    bg_tx: Outbox<BackgroundMsg>,
    page_tx: Outbox<PageMsg>,
    inbox: Inbox<PopupMsg>,
    status: String,
}

impl Popup {
    pub fn new(
        bg_tx: Outbox<BackgroundMsg>,
        page_tx: Outbox<PageMsg>,
        inbox: Inbox<PopupMsg>,
    ) -> Self {
        Self {
            bg_tx,
            page_tx,
            inbox,
            status: String::new(),
        }
    }

    pub fn save(&mut self) {
        self.set_status("Saving videos...", false);
        match relay::request(&self.bg_tx, BackgroundMsg::SaveRequested, SAVE_TIMEOUT) {
            Some(Reply::SaveOutcome { success: true, .. }) => {
                self.set_status("Videos saved successfully!", false);
            }
            Some(Reply::SaveOutcome {
                success: false,
                error,
                ..
            }) => {
                let text = error.unwrap_or_else(|| "Failed to save videos".to_string());
                self.set_status(text, true);
            }
            _ => self.set_status("Failed to save videos", true),
        }
    }

    pub fn clear(&mut self) {
        match relay::request(&self.bg_tx, BackgroundMsg::ClearRequested, CLEAR_TIMEOUT) {
            Some(Reply::Ack { success: true }) => self.set_status("All links cleared", false),
            _ => self.set_status("Failed to clear links", true),
        }
    }

    pub fn pick_color(&self, color: &str) {
        relay::send(
            &self.page_tx,
            PageMsg::SetBackground {
                color: color.to_string(),
            },
        );
    }

    /// Render any page fragments published since the last drain.
    pub fn drain_panel(&mut self) {
        while let Ok(envelope) = self.inbox.try_recv() {
            let PopupMsg::PanelHtml { html } = envelope.msg;
            println!("[panel] {html}");
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = text.into();
        if is_error {
            println!("[popup:error] {}", self.status);
        } else {
            println!("[popup] {}", self.status);
        }
    }
}
