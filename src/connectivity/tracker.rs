//! Online/offline state tracking

use tokio::sync::watch;

/// Connectivity snapshot for one page session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityState {
    /// Whether the device currently reports a connection
    pub is_online: bool,
    /// Whether the device has been offline since the last online signal
    pub was_offline: bool,
}

/// Tracks connectivity transitions
///
/// Driven solely by the two external signals; never makes a network call to
/// verify reachability.
#[derive(Debug, Clone, Copy)]
pub struct ConnectivityTracker {
    state: ConnectivityState,
}

impl ConnectivityTracker {
    /// Create a tracker from the current device connectivity
    ///
    /// `was_offline` starts as the negation of the initial signal, so a page
    /// opened offline already knows it has been offline.
    #[must_use]
    pub fn new(initially_online: bool) -> Self {
        Self {
            state: ConnectivityState {
                is_online: initially_online,
                was_offline: !initially_online,
            },
        }
    }

    /// Handle the "became reachable" signal
    pub fn signal_online(&mut self) {
        self.state = ConnectivityState {
            is_online: true,
            was_offline: false,
        };
    }

    /// Handle the "became unreachable" signal
    pub fn signal_offline(&mut self) {
        self.state = ConnectivityState {
            is_online: false,
            was_offline: true,
        };
    }

    /// Current snapshot
    #[must_use]
    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.state.is_online
    }

    #[must_use]
    pub fn was_offline(&self) -> bool {
        self.state.was_offline
    }
}

/// Broadcasts tracker state to any number of subscribers
///
/// Subscribers hold a [`watch::Receiver`]; dropping it is their
/// deregistration, so nothing leaks when a component tears down.
#[derive(Debug)]
pub struct ConnectivityFeed {
    tracker: ConnectivityTracker,
    tx: watch::Sender<ConnectivityState>,
}

impl ConnectivityFeed {
    /// Create a feed seeded from the current device connectivity
    #[must_use]
    pub fn new(initially_online: bool) -> Self {
        let tracker = ConnectivityTracker::new(initially_online);
        let (tx, _) = watch::channel(tracker.state());
        Self { tracker, tx }
    }

    /// Subscribe to state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.tx.subscribe()
    }

    /// Publish the "became reachable" signal
    pub fn set_online(&mut self) {
        self.tracker.signal_online();
        // send_replace: deliver even when nobody is subscribed yet
        self.tx.send_replace(self.tracker.state());
    }

    /// Publish the "became unreachable" signal
    pub fn set_offline(&mut self) {
        self.tracker.signal_offline();
        self.tx.send_replace(self.tracker.state());
    }

    /// Current snapshot
    #[must_use]
    pub fn state(&self) -> ConnectivityState {
        self.tracker.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_mirrors_signal() {
        let online = ConnectivityTracker::new(true);
        assert!(online.is_online());
        assert!(!online.was_offline());

        let offline = ConnectivityTracker::new(false);
        assert!(!offline.is_online());
        assert!(offline.was_offline());
    }

    #[test]
    fn was_offline_holds_until_online() {
        let mut tracker = ConnectivityTracker::new(true);

        tracker.signal_offline();
        assert!(tracker.was_offline());

        // repeated offline signals keep it set
        tracker.signal_offline();
        assert!(tracker.was_offline());

        tracker.signal_online();
        assert!(!tracker.was_offline());
        assert!(tracker.is_online());
    }

    #[test]
    fn arbitrary_flap_sequence() {
        let mut tracker = ConnectivityTracker::new(true);
        let signals = [false, true, false, false, true, true, false];

        for online in signals {
            if online {
                tracker.signal_online();
                assert!(!tracker.was_offline());
            } else {
                tracker.signal_offline();
                assert!(tracker.was_offline());
            }
            assert_eq!(tracker.is_online(), online);
        }
    }

    #[tokio::test]
    async fn feed_broadcasts_transitions() {
        let mut feed = ConnectivityFeed::new(true);
        let mut rx = feed.subscribe();

        feed.set_offline();
        rx.changed().await.unwrap();
        let state = *rx.borrow_and_update();
        assert!(!state.is_online);
        assert!(state.was_offline);

        feed.set_online();
        rx.changed().await.unwrap();
        let state = *rx.borrow_and_update();
        assert!(state.is_online);
        assert!(!state.was_offline);
    }
}
