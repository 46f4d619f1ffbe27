//! Connectivity tracking and the reconnect banner
//!
//! The tracker turns raw online/offline signals into `{is_online,
//! was_offline}` state; the banner derives its visibility from those
//! transitions. Neither probes the network - they trust the platform's own
//! connectivity signal.

pub mod banner;
pub mod tracker;

pub use banner::{BannerState, OfflineBanner, AUTO_HIDE};
pub use tracker::{ConnectivityFeed, ConnectivityState, ConnectivityTracker};
