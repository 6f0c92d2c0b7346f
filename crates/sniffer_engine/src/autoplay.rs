use std::time::Duration;

use sniffer_logging::sniffer_debug;

use crate::dom::PageDom;

/// Probe bounds for the play control.
#[derive(Debug, Clone)]
pub struct AutoplaySettings {
    pub control_selector: String,
    pub max_attempts: u32,
    pub probe_interval: Duration,
}

impl Default for AutoplaySettings {
    fn default() -> Self {
        Self {
            control_selector: "button.plyr__control--overlaid".to_string(),
            max_attempts: 10,
            probe_interval: Duration::from_secs(1),
        }
    }
}

/// Bounded-retry probe that activates the play control on first sighting.
///
/// Armed at page load, re-armed when the visible URL changes (client-side
/// navigation), disarmed after activation or once the attempt budget is
/// spent. Ticks are driven externally at `probe_interval`.
#[derive(Debug)]
pub struct AutoplayProbe {
    settings: AutoplaySettings,
    attempts_left: u32,
    last_url: String,
}

impl AutoplayProbe {
    pub fn new(settings: AutoplaySettings, initial_url: &str) -> Self {
        let attempts = settings.max_attempts;
        Self {
            settings,
            attempts_left: attempts,
            last_url: initial_url.to_string(),
        }
    }

    pub fn probe_interval(&self) -> Duration {
        self.settings.probe_interval
    }

    pub fn is_armed(&self) -> bool {
        self.attempts_left > 0
    }

    pub fn rearm(&mut self) {
        self.attempts_left = self.settings.max_attempts;
    }

    /// One probe tick. Returns true when the play control was activated.
    pub fn tick(&mut self, dom: &dyn PageDom) -> bool {
        let url = dom.current_url();
        if url != self.last_url {
            self.last_url = url;
            self.rearm();
        }

        if self.attempts_left == 0 {
            return false;
        }
        self.attempts_left -= 1;

        if dom.activate_play_control(&self.settings.control_selector) {
            sniffer_debug!("Video autoplay triggered");
            self.attempts_left = 0;
            return true;
        }
        if self.attempts_left == 0 {
            sniffer_debug!("Max attempts reached, stopping play-control probe");
        }
        false
    }
}
