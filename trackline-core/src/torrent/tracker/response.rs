//! Tracker response decoding and peer list normalization

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};

use bencode_rs::Value;

use super::protocol::{COMPACT_PEER_SIZE, keys};
use super::types::{AnnounceResponse, PeerEndpoint, PeerList};
use crate::torrent::TrackerError;

type BencodeDict<'a> = HashMap<&'a [u8], Value<'a>>;

/// How the tracker encoded its `peers` entry.
///
/// Decided purely from the runtime type of the value, never from what
/// the request asked for.
pub enum PeerListEncoding<'a> {
    /// BEP 23 compact string of 6-byte records
    Packed(&'a [u8]),
    /// BEP 3 list of `{ip, port}` dictionaries
    Records(&'a [Value<'a>]),
    /// Missing or of any other type
    Unsupported { found: &'static str },
}

impl<'a> PeerListEncoding<'a> {
    /// Classifies the `peers` entry of a response dictionary.
    pub fn classify(peers: Option<&'a Value<'a>>) -> Self {
        match peers {
            Some(Value::Bytes(packed)) => PeerListEncoding::Packed(packed),
            Some(Value::List(records)) => PeerListEncoding::Records(records),
            Some(other) => PeerListEncoding::Unsupported {
                found: value_kind(other),
            },
            None => PeerListEncoding::Unsupported { found: "missing" },
        }
    }

    /// Decodes the classified value into peers.
    ///
    /// # Errors
    ///
    /// - `TrackerError::TruncatedPeerList` - Packed length not a multiple of 6
    /// - `TrackerError::InvalidPeerRecord` - A dictionary entry is malformed
    /// - `TrackerError::UnsupportedPeerListEncoding` - Neither encoding matched
    pub fn decode(self) -> Result<PeerList, TrackerError> {
        match self {
            PeerListEncoding::Packed(packed) => parse_compact_peers(packed),
            PeerListEncoding::Records(records) => parse_peer_records(records),
            PeerListEncoding::Unsupported { found } => {
                Err(TrackerError::UnsupportedPeerListEncoding { found })
            }
        }
    }
}

fn value_kind(value: &Value<'_>) -> &'static str {
    match value {
        Value::Bytes(_) => "byte string",
        Value::Integer(_) => "integer",
        Value::List(_) => "list",
        Value::Dictionary(_) => "dictionary",
    }
}

/// Decodes a raw announce response body into its peer list.
///
/// # Errors
///
/// See [`decode_announce_response`].
pub fn decode_tracker_response(response_bytes: &[u8]) -> Result<PeerList, TrackerError> {
    decode_announce_response(response_bytes).map(|response| response.peers)
}

/// Decodes a raw announce response body.
///
/// Fails as a whole on any problem with `peers`; no partial list is ever
/// returned. Optional swarm fields never cause a failure.
///
/// # Errors
///
/// - `TrackerError::Decode` - Body is not a single valid bencode value
/// - `TrackerError::UnexpectedResponseShape` - Root is not a dictionary
/// - `TrackerError::TrackerRejected` - Tracker sent a `failure reason`
/// - `TrackerError::UnsupportedPeerListEncoding` - `peers` missing or of another type
/// - `TrackerError::TruncatedPeerList` - Compact `peers` length not a multiple of 6
/// - `TrackerError::InvalidPeerRecord` - Dictionary entry with bad `ip` or `port`
pub fn decode_announce_response(response_bytes: &[u8]) -> Result<AnnounceResponse, TrackerError> {
    let parsed = Value::parse(response_bytes).map_err(|e| TrackerError::Decode {
        reason: format!("Failed to parse tracker response: {e:?}"),
    })?;

    let root = match parsed.as_slice() {
        [root] => root,
        [] => {
            return Err(TrackerError::Decode {
                reason: "Empty tracker response".to_string(),
            });
        }
        [_, rest @ ..] => {
            return Err(TrackerError::Decode {
                reason: format!("{} trailing values after response", rest.len()),
            });
        }
    };

    let Value::Dictionary(dict) = root else {
        return Err(TrackerError::UnexpectedResponseShape {
            found: value_kind(root),
        });
    };

    if let Some(Value::Bytes(failure_reason)) = dict.get(keys::FAILURE_REASON) {
        let reason = String::from_utf8_lossy(failure_reason).into_owned();
        tracing::warn!("Tracker rejected announce: {}", reason);
        return Err(TrackerError::TrackerRejected { reason });
    }

    let warning = string_field(dict, keys::WARNING_MESSAGE);
    if let Some(warning) = &warning {
        tracing::warn!("Tracker warning: {}", warning);
    }

    let encoding = PeerListEncoding::classify(dict.get(keys::PEERS));
    let encoding_name = match &encoding {
        PeerListEncoding::Packed(_) => "compact",
        PeerListEncoding::Records(_) => "dictionary",
        PeerListEncoding::Unsupported { .. } => "unsupported",
    };
    let peers = encoding.decode()?;

    tracing::debug!(
        "Decoded {} peers from {} peer list",
        peers.len(),
        encoding_name
    );

    Ok(AnnounceResponse {
        peers,
        interval: u32_field(dict, keys::INTERVAL),
        min_interval: u32_field(dict, keys::MIN_INTERVAL),
        tracker_id: string_field(dict, keys::TRACKER_ID),
        complete: u32_field(dict, keys::COMPLETE),
        incomplete: u32_field(dict, keys::INCOMPLETE),
        warning,
    })
}

fn u32_field(dict: &BencodeDict<'_>, key: &[u8]) -> Option<u32> {
    match dict.get(key) {
        Some(Value::Integer(val)) => u32::try_from(*val).ok(),
        _ => None,
    }
}

fn string_field(dict: &BencodeDict<'_>, key: &[u8]) -> Option<String> {
    match dict.get(key) {
        Some(Value::Bytes(bytes)) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

/// Parse compact peer list from tracker response
///
/// # Errors
/// - `TrackerError::TruncatedPeerList` - Length is not a multiple of 6 bytes
pub fn parse_compact_peers(peer_bytes: &[u8]) -> Result<PeerList, TrackerError> {
    if !peer_bytes.len().is_multiple_of(COMPACT_PEER_SIZE) {
        return Err(TrackerError::TruncatedPeerList {
            length: peer_bytes.len(),
        });
    }

    let peers = peer_bytes
        .chunks_exact(COMPACT_PEER_SIZE)
        .map(|chunk| {
            let ip = Ipv4Addr::new(chunk[0], chunk[1], chunk[2], chunk[3]);
            let port = u16::from_be_bytes([chunk[4], chunk[5]]);
            PeerEndpoint::new(IpAddr::V4(ip), port)
        })
        .collect();

    Ok(peers)
}

/// Parse dictionary peer list from tracker response
///
/// Stops at the first bad entry.
///
/// # Errors
/// - `TrackerError::InvalidPeerRecord` - Entry is not a dictionary or has a bad `ip`/`port`
pub fn parse_peer_records(records: &[Value<'_>]) -> Result<PeerList, TrackerError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            parse_peer_record(record)
                .map_err(|reason| TrackerError::InvalidPeerRecord { index, reason })
        })
        .collect()
}

fn parse_peer_record(record: &Value<'_>) -> Result<PeerEndpoint, String> {
    let Value::Dictionary(fields) = record else {
        return Err(format!("expected dictionary, found {}", value_kind(record)));
    };

    let address = match fields.get(keys::PEER_IP) {
        Some(Value::Bytes(ip_bytes)) => {
            let text = std::str::from_utf8(ip_bytes)
                .map_err(|_| "ip is not valid UTF-8".to_string())?;
            text.parse::<IpAddr>()
                .map_err(|_| format!("ip {text:?} is not an IP address"))?
        }
        Some(other) => return Err(format!("ip must be a string, found {}", value_kind(other))),
        None => return Err("missing ip".to_string()),
    };

    let port = match fields.get(keys::PEER_PORT) {
        Some(Value::Integer(port)) => {
            u16::try_from(*port).map_err(|_| format!("port {port} out of range"))?
        }
        Some(other) => {
            return Err(format!(
                "port must be an integer, found {}",
                value_kind(other)
            ));
        }
        None => return Err("missing port".to_string()),
    };

    Ok(PeerEndpoint::new(address, port))
}
