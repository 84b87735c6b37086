//! Core types for BitTorrent tracker communication

use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Peer address returned by a tracker.
///
/// Compact and dictionary peer lists both decode into this type; nothing
/// about the source encoding is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerEndpoint {
    /// Peer IP address
    pub address: IpAddr,
    /// Peer listening port
    pub port: u16,
}

impl PeerEndpoint {
    /// Creates endpoint from address and port.
    pub fn new(address: IpAddr, port: u16) -> Self {
        Self { address, port }
    }

    /// Returns the endpoint as a connectable socket address.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

impl From<SocketAddr> for PeerEndpoint {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip(), addr.port())
    }
}

impl fmt::Display for PeerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.socket_addr())
    }
}

/// Peers in the order the tracker listed them.
pub type PeerList = Vec<PeerEndpoint>;

/// Tracker announce request.
///
/// Fully formed GET request; the query already carries every announce
/// parameter with `info_hash` and `peer_id` percent-encoded as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceRequest {
    /// HTTP method, always GET for announces
    pub method: reqwest::Method,
    /// Tracker URL including the announce query
    pub url: url::Url,
}

impl AnnounceRequest {
    /// Returns query pairs without percent-decoding the values.
    ///
    /// `Url::query_pairs` decodes into UTF-8 and would mangle the raw-byte
    /// fields, so this splits the query text directly.
    pub fn query_pairs_raw(&self) -> Vec<(&str, &str)> {
        self.url
            .query()
            .unwrap_or_default()
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .collect()
    }
}

/// Tracker announce response.
///
/// `peers` is always decoded strictly. The remaining fields are read when
/// present and well-typed, and are `None` otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnounceResponse {
    /// Peer addresses for connection attempts
    pub peers: PeerList,
    /// Seconds until next announce request should be sent
    pub interval: Option<u32>,
    /// Minimum allowed interval between announces
    pub min_interval: Option<u32>,
    /// Tracker-specific identifier for subsequent requests
    pub tracker_id: Option<String>,
    /// Number of seeders in the swarm
    pub complete: Option<u32>,
    /// Number of leechers in the swarm
    pub incomplete: Option<u32>,
    /// Non-fatal warning text sent by the tracker
    pub warning: Option<String>,
}
