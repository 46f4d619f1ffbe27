//! Reconnect banner state machine
//!
//! Derived presentation state over the connectivity tracker:
//!
//! ```text
//! hidden ──offline──▶ visible-offline ──online──▶ visible-reconnected
//!    ▲                      │                           │
//!    └──────dismiss─────────┴───────dismiss / 3s────────┘
//! ```
//!
//! Every transition invalidates the pending auto-hide timer, so rapid
//! online/offline flaps can never leave two timers racing or let a stale
//! timer fire against newer state.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::tracker::ConnectivityState;

/// How long the "back online" notice stays up before hiding itself
pub const AUTO_HIDE: Duration = Duration::from_secs(3);

/// Banner visibility state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerState {
    /// Nothing shown
    Hidden,
    /// "You are offline" notice
    VisibleOffline,
    /// "Back online" notice, counting down to auto-hide
    VisibleReconnected,
}

struct Cell {
    state: BannerState,
    /// Bumped on every transition; a timer only fires if its generation
    /// still matches
    generation: u64,
    auto_hide: Option<JoinHandle<()>>,
}

/// Offline/reconnect banner for a mini-app shell
pub struct OfflineBanner {
    cell: Arc<Mutex<Cell>>,
    driver: Option<JoinHandle<()>>,
}

impl OfflineBanner {
    /// Create a hidden banner
    #[must_use]
    pub fn new() -> Self {
        Self {
            cell: Arc::new(Mutex::new(Cell {
                state: BannerState::Hidden,
                generation: 0,
                auto_hide: None,
            })),
            driver: None,
        }
    }

    /// Current visibility state
    #[must_use]
    pub fn state(&self) -> BannerState {
        lock(&self.cell).state
    }

    /// Handle the offline signal
    pub fn on_offline(&self) {
        apply_offline(&self.cell);
    }

    /// Handle the online signal
    pub fn on_online(&self) {
        apply_online(&self.cell);
    }

    /// Manually dismiss the banner
    ///
    /// Only meaningful while visible; a hidden banner ignores it.
    pub fn dismiss(&self) {
        let mut cell = lock(&self.cell);
        if cell.state == BannerState::Hidden {
            return;
        }
        supersede(&mut cell);
        cell.state = BannerState::Hidden;
    }

    /// Follow a connectivity feed for the rest of this banner's lifetime
    ///
    /// The current signal is applied immediately, then every change. The
    /// subscription ends when the banner is dropped.
    pub fn watch(&mut self, mut rx: watch::Receiver<ConnectivityState>) {
        if let Some(old) = self.driver.take() {
            old.abort();
        }
        let cell = Arc::clone(&self.cell);
        self.driver = Some(tokio::spawn(async move {
            loop {
                let online = rx.borrow_and_update().is_online;
                if online {
                    apply_online(&cell);
                } else {
                    apply_offline(&cell);
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }));
    }
}

impl Default for OfflineBanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for OfflineBanner {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
        if let Ok(mut cell) = self.cell.lock() {
            if let Some(timer) = cell.auto_hide.take() {
                timer.abort();
            }
        }
    }
}

fn lock(cell: &Arc<Mutex<Cell>>) -> MutexGuard<'_, Cell> {
    // lock() only fails if a holder panicked; the cell is still usable
    cell.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Invalidate the pending timer before a state change
fn supersede(cell: &mut Cell) {
    cell.generation += 1;
    if let Some(timer) = cell.auto_hide.take() {
        timer.abort();
    }
}

fn apply_offline(cell: &Arc<Mutex<Cell>>) {
    let mut guard = lock(cell);
    supersede(&mut guard);
    guard.state = BannerState::VisibleOffline;
}

fn apply_online(cell: &Arc<Mutex<Cell>>) {
    let mut guard = lock(cell);
    match guard.state {
        // never shown while this session was offline; stay hidden
        BannerState::Hidden => {}
        BannerState::VisibleOffline | BannerState::VisibleReconnected => {
            supersede(&mut guard);
            guard.state = BannerState::VisibleReconnected;
            let generation = guard.generation;
            let cell = Arc::clone(cell);
            guard.auto_hide = Some(tokio::spawn(async move {
                tokio::time::sleep(AUTO_HIDE).await;
                let mut guard = lock(&cell);
                if guard.generation == generation {
                    guard.state = BannerState::Hidden;
                    guard.auto_hide = None;
                }
            }));
        }
    }
}
