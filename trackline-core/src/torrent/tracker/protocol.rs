//! BitTorrent tracker protocol constants

/// Size of one compact peer record: 4 IPv4 octets plus a big-endian port
pub const COMPACT_PEER_SIZE: usize = 6;

/// Announce query parameter names in the order they are sent
pub const ANNOUNCE_PARAMS: [&str; 7] = [
    "info_hash",
    "peer_id",
    "port",
    "uploaded",
    "downloaded",
    "left",
    "compact",
];

/// Response dictionary keys read by the decoder
pub mod keys {
    pub const PEERS: &[u8] = b"peers";
    pub const PEER_IP: &[u8] = b"ip";
    pub const PEER_PORT: &[u8] = b"port";
    pub const FAILURE_REASON: &[u8] = b"failure reason";
    pub const WARNING_MESSAGE: &[u8] = b"warning message";
    pub const INTERVAL: &[u8] = b"interval";
    pub const MIN_INTERVAL: &[u8] = b"min interval";
    pub const TRACKER_ID: &[u8] = b"tracker id";
    pub const COMPLETE: &[u8] = b"complete";
    pub const INCOMPLETE: &[u8] = b"incomplete";
}
