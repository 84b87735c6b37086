//! BitTorrent identity types and tracker peer discovery

pub mod tracker;

use std::fmt;

pub use tracker::{
    AnnounceRequest, AnnounceResponse, HttpTrackerTransport, PeerEndpoint, PeerList,
    SimulatedTrackerTransport, TrackerClient, TrackerTransport, build_announce_request,
    decode_announce_response, decode_tracker_response,
};

use crate::TracklineError;

/// SHA-1 hash identifying a unique torrent.
///
/// 20-byte SHA-1 hash of the info dictionary from a torrent file.
/// Used to uniquely identify torrents across the BitTorrent network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHash([u8; 20]);

impl InfoHash {
    /// Creates InfoHash from 20-byte SHA-1 hash.
    pub fn new(hash: [u8; 20]) -> Self {
        Self(hash)
    }

    /// Returns reference to underlying 20-byte hash.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parses a 40 character hex string.
    ///
    /// # Errors
    ///
    /// - `TracklineError::Configuration` - If the input is not 20 hex-encoded bytes
    pub fn from_hex(hex_str: &str) -> Result<Self, TracklineError> {
        decode_hex_id(hex_str, "info hash").map(Self)
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// 20-byte identifier this client presents to trackers and peers.
///
/// Created once per session by the caller and passed by reference
/// into every announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId([u8; 20]);

impl PeerId {
    /// Creates peer ID from 20-byte array.
    pub fn new(id: [u8; 20]) -> Self {
        Self(id)
    }

    /// Returns peer ID as byte array reference.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Generate random peer ID behind an Azureus-style client prefix.
    pub fn generate(prefix: &[u8; 8]) -> Self {
        let mut id = [0u8; 20];
        id[..8].copy_from_slice(prefix);
        for byte in &mut id[8..] {
            *byte = rand::random();
        }
        Self(id)
    }

    /// Parses a 40 character hex string.
    ///
    /// # Errors
    ///
    /// - `TracklineError::Configuration` - If the input is not 20 hex-encoded bytes
    pub fn from_hex(hex_str: &str) -> Result<Self, TracklineError> {
        decode_hex_id(hex_str, "peer id").map(Self)
    }
}

fn decode_hex_id(hex_str: &str, what: &str) -> Result<[u8; 20], TracklineError> {
    let bytes = hex::decode(hex_str.trim()).map_err(|e| TracklineError::Configuration {
        reason: format!("{what} is not valid hex: {e}"),
    })?;

    <[u8; 20]>::try_from(bytes.as_slice()).map_err(|_| TracklineError::Configuration {
        reason: format!("{what} must be 20 bytes, got {}", bytes.len()),
    })
}

/// Torrent fields needed to announce.
///
/// Supplied by whatever parsed the metainfo; the info hash length is
/// enforced by its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDescriptor {
    /// Torrent the announce is for
    pub info_hash: InfoHash,
    /// Absolute HTTP(S) announce URL
    pub tracker_url: url::Url,
    /// Bytes still needed, reported as `left`
    pub total_length: u64,
}

impl ContentDescriptor {
    /// Creates a descriptor from already-validated metainfo fields.
    pub fn new(info_hash: InfoHash, tracker_url: url::Url, total_length: u64) -> Self {
        Self {
            info_hash,
            tracker_url,
            total_length,
        }
    }
}

/// Why the HTTP exchange with the tracker failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    /// Request exceeded the configured tracker timeout
    Timeout,
    /// Connection could not be established or was reset
    Connection,
    /// Tracker answered with a non-2xx status
    Status(u16),
    /// Response body could not be read
    Body,
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Timeout => write!(f, "timed out"),
            TransportFailure::Connection => write!(f, "connection failed"),
            TransportFailure::Status(code) => write!(f, "HTTP status {code}"),
            TransportFailure::Body => write!(f, "failed to read response body"),
        }
    }
}

/// Errors that can occur during a single announce exchange.
///
/// All variants are terminal for the announce attempt. Retrying is
/// left to the caller.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Tracker request to {url} failed: {failure}")]
    Transport {
        url: String,
        failure: TransportFailure,
    },

    #[error("Malformed tracker response: {reason}")]
    Decode { reason: String },

    #[error("Tracker response root must be a dictionary, found {found}")]
    UnexpectedResponseShape { found: &'static str },

    #[error("Unsupported peer list encoding: {found}")]
    UnsupportedPeerListEncoding { found: &'static str },

    #[error("Compact peer list length {length} is not a multiple of 6")]
    TruncatedPeerList { length: usize },

    #[error("Invalid peer record at index {index}: {reason}")]
    InvalidPeerRecord { index: usize, reason: String },

    #[error("Tracker rejected announce: {reason}")]
    TrackerRejected { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_hash_display() {
        let hash = [
            0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0x01, 0x23, 0x45, 0x67, 0x89, 0xab,
            0xcd, 0xef, 0x01, 0x23, 0x45, 0x67,
        ];
        let info_hash = InfoHash::new(hash);
        assert_eq!(
            info_hash.to_string(),
            "0123456789abcdef0123456789abcdef01234567"
        );
    }

    #[test]
    fn test_info_hash_from_hex() {
        let info_hash = InfoHash::from_hex("0123456789abcdef0123456789abcdef01234567").unwrap();
        assert_eq!(info_hash.as_bytes()[0], 0x01);
        assert_eq!(info_hash.as_bytes()[19], 0x67);

        assert!(matches!(
            InfoHash::from_hex("0123"),
            Err(TracklineError::Configuration { reason }) if reason.contains("20 bytes")
        ));
        assert!(InfoHash::from_hex("zz23456789abcdef0123456789abcdef01234567").is_err());
    }

    #[test]
    fn test_peer_id_generate_keeps_prefix() {
        let peer_id = PeerId::generate(b"-TL0001-");
        assert_eq!(&peer_id.as_bytes()[..8], b"-TL0001-");
        assert_eq!(peer_id.as_bytes().len(), 20);
    }

    #[test]
    fn test_transport_error_display() {
        let error = TrackerError::Transport {
            url: "http://tracker.example.com/announce".to_string(),
            failure: TransportFailure::Status(503),
        };
        assert_eq!(
            error.to_string(),
            "Tracker request to http://tracker.example.com/announce failed: HTTP status 503"
        );
    }
}
