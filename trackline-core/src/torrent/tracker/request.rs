//! Announce request construction

use super::types::AnnounceRequest;
use crate::config::AnnounceConfig;
use crate::torrent::{ContentDescriptor, PeerId};

/// Builds the announce GET request for a torrent.
///
/// `info_hash` and `peer_id` are percent-encoded byte for byte, never as
/// hex or any other text form. `compact=1` is always requested, although
/// trackers are free to ignore it. A query already present on the tracker
/// URL is kept in front of the announce parameters.
pub fn build_announce_request(
    descriptor: &ContentDescriptor,
    peer_id: &PeerId,
    params: &AnnounceConfig,
) -> AnnounceRequest {
    let announce_query = format!(
        "info_hash={}&peer_id={}&port={}&uploaded={}&downloaded={}&left={}&compact=1",
        urlencoding::encode_binary(descriptor.info_hash.as_bytes()),
        urlencoding::encode_binary(peer_id.as_bytes()),
        params.port,
        params.uploaded,
        params.downloaded,
        descriptor.total_length,
    );

    let mut url = descriptor.tracker_url.clone();
    url.set_fragment(None);
    let query = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{existing}&{announce_query}"),
        _ => announce_query,
    };
    url.set_query(Some(&query));

    tracing::debug!(
        "Built announce for {} to {}",
        descriptor.info_hash,
        descriptor.tracker_url
    );

    AnnounceRequest {
        method: reqwest::Method::GET,
        url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::torrent::InfoHash;
    use crate::torrent::tracker::protocol::ANNOUNCE_PARAMS;

    fn descriptor(url: &str) -> ContentDescriptor {
        ContentDescriptor::new(
            InfoHash::new([0x11; 20]),
            url::Url::parse(url).unwrap(),
            2000,
        )
    }

    #[test]
    fn test_build_announce_request() {
        let request = build_announce_request(
            &descriptor("http://tracker.example.com/announce"),
            &PeerId::new([0x22; 20]),
            &AnnounceConfig::default(),
        );

        assert_eq!(request.method, reqwest::Method::GET);
        assert_eq!(request.url.path(), "/announce");

        let url = request.url.as_str();
        assert!(
            url.contains("info_hash=%11%11%11%11%11%11%11%11%11%11%11%11%11%11%11%11%11%11%11%11")
        );
        assert!(
            url.contains("peer_id=%22%22%22%22%22%22%22%22%22%22%22%22%22%22%22%22%22%22%22%22")
        );
        assert!(url.contains("port=6881"));
        assert!(url.contains("uploaded=0"));
        assert!(url.contains("downloaded=0"));
        assert!(url.contains("left=2000"));
        assert!(url.contains("compact=1"));
    }

    #[test]
    fn test_query_has_exactly_announce_params() {
        let request = build_announce_request(
            &descriptor("http://tracker.example.com/announce"),
            &PeerId::new(*b"-TL0001-abcdefghijkl"),
            &AnnounceConfig::default(),
        );

        let keys: Vec<&str> = request.query_pairs_raw().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ANNOUNCE_PARAMS);
    }

    #[test]
    fn test_raw_byte_fields_decode_to_twenty_bytes() {
        let mut hash = [0u8; 20];
        for (i, byte) in hash.iter_mut().enumerate() {
            *byte = (i as u8).wrapping_mul(37).wrapping_add(0xF0);
        }
        let descriptor = ContentDescriptor::new(
            InfoHash::new(hash),
            url::Url::parse("https://tracker.example.com/announce").unwrap(),
            0,
        );
        let peer_id = PeerId::new(*b"-TL0001-\x00\x7f\x80\xff abc&=%+");

        let request = build_announce_request(&descriptor, &peer_id, &AnnounceConfig::default());
        let pairs = request.query_pairs_raw();

        let info_hash = urlencoding::decode_binary(pairs[0].1.as_bytes());
        assert_eq!(&*info_hash, &hash[..]);

        let decoded_peer_id = urlencoding::decode_binary(pairs[1].1.as_bytes());
        assert_eq!(&*decoded_peer_id, &peer_id.as_bytes()[..]);
    }

    #[test]
    fn test_custom_session_params() {
        let params = AnnounceConfig {
            port: 51413,
            uploaded: 1000,
            downloaded: 500,
        };
        let request = build_announce_request(
            &descriptor("http://tracker.example.com/announce"),
            &PeerId::new([0x22; 20]),
            &params,
        );

        let pairs = request.query_pairs_raw();
        assert!(pairs.contains(&("port", "51413")));
        assert!(pairs.contains(&("uploaded", "1000")));
        assert!(pairs.contains(&("downloaded", "500")));
    }

    #[test]
    fn test_existing_query_is_preserved() {
        let request = build_announce_request(
            &descriptor("http://tracker.example.com/announce?passkey=abc123#frag"),
            &PeerId::new([0x22; 20]),
            &AnnounceConfig::default(),
        );

        let pairs = request.query_pairs_raw();
        assert_eq!(pairs[0], ("passkey", "abc123"));
        assert_eq!(pairs[1].0, "info_hash");
        assert_eq!(pairs.len(), 8);
        assert_eq!(request.url.fragment(), None);
    }
}
