//! Timed display rotator
//!
//! Cycles through a list of display items (the contact-email scroller on the
//! site header). Modeled as an explicit state machine: each phase reports its
//! own duration, so whatever drives it owns exactly one timer and can never
//! stack timeouts.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How long an item stays fully visible
pub const DWELL: Duration = Duration::from_secs(6);

/// How long the slide to the next item takes
pub const SLIDE: Duration = Duration::from_secs(2);

/// Current phase of the rotation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotatorPhase {
    /// Item held in place
    Dwell,
    /// Sliding toward the next item
    Slide,
}

/// Rotates through display items on a fixed dwell/slide cycle
#[derive(Debug)]
pub struct Rotator {
    items: Vec<String>,
    index: usize,
    phase: RotatorPhase,
}

impl Rotator {
    /// Create a rotator over the given items
    #[must_use]
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            index: 0,
            phase: RotatorPhase::Dwell,
        }
    }

    /// The item currently shown, or `None` when the list is empty
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.items.get(self.index).map(String::as_str)
    }

    #[must_use]
    pub fn phase(&self) -> RotatorPhase {
        self.phase
    }

    /// Duration of the current phase
    #[must_use]
    pub fn phase_duration(&self) -> Duration {
        match self.phase {
            RotatorPhase::Dwell => DWELL,
            RotatorPhase::Slide => SLIDE,
        }
    }

    /// Move to the next phase, returning the new phase's duration
    ///
    /// Dwell becomes slide; slide lands on the next item's dwell.
    pub fn advance(&mut self) -> Duration {
        match self.phase {
            RotatorPhase::Dwell => {
                self.phase = RotatorPhase::Slide;
            }
            RotatorPhase::Slide => {
                if !self.items.is_empty() {
                    self.index = (self.index + 1) % self.items.len();
                }
                self.phase = RotatorPhase::Dwell;
            }
        }
        self.phase_duration()
    }

    /// Run the rotator, publishing the visible item at the start of each
    /// dwell phase
    ///
    /// Abort the returned handle (or drop the receiver and let the send
    /// fail) to stop the cycle; the single sleep below is the only timer.
    #[must_use]
    pub fn spawn(mut self) -> (watch::Receiver<Option<String>>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(self.current().map(str::to_string));
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(self.phase_duration()).await;
                self.advance();
                if self.phase() == RotatorPhase::Dwell
                    && tx.send(self.current().map(str::to_string)).is_err()
                {
                    break;
                }
            }
        });
        (rx, handle)
    }
}
