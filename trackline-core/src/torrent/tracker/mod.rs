//! BitTorrent HTTP tracker announce and peer list decoding.
//!
//! One-shot announce following BEP 3: build the GET request, send it through
//! a [`TrackerTransport`], and normalize compact or dictionary peer lists
//! into [`PeerEndpoint`] values.

pub mod client;
pub mod protocol;
pub mod request;
pub mod response;
pub mod simulated;
pub mod types;

// Re-export public API
pub use client::{HttpTrackerTransport, TrackerClient, TrackerTransport};
pub use request::build_announce_request;
pub use response::{PeerListEncoding, decode_announce_response, decode_tracker_response};
pub use simulated::SimulatedTrackerTransport;
pub use types::{AnnounceRequest, AnnounceResponse, PeerEndpoint, PeerList};
