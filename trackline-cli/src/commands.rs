//! CLI command implementations

use std::path::PathBuf;

use clap::Subcommand;
use tokio::fs;
use trackline_core::config::TracklineConfig;
use trackline_core::torrent::tracker::{
    AnnounceResponse, HttpTrackerTransport, TrackerClient, decode_announce_response,
};
use trackline_core::torrent::{ContentDescriptor, InfoHash, PeerId};
use trackline_core::{Result, TracklineError};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Announce to a tracker and print the returned peers
    Announce {
        /// Tracker announce URL
        #[arg(long)]
        tracker: String,
        /// Torrent info hash as 40 hex characters
        #[arg(long)]
        info_hash: String,
        /// Bytes still needed
        #[arg(long, default_value = "0")]
        left: u64,
        /// Listening port reported to the tracker
        #[arg(short, long)]
        port: Option<u16>,
        /// Peer ID as 40 hex characters (random if omitted)
        #[arg(long)]
        peer_id: Option<String>,
    },
    /// Decode a saved tracker response body
    Decode {
        /// File holding the raw bencoded response
        file: PathBuf,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Announce {
            tracker,
            info_hash,
            left,
            port,
            peer_id,
        } => announce(tracker, info_hash, left, port, peer_id).await,
        Commands::Decode { file } => decode_file(file).await,
    }
}

/// Announce once and print each peer
///
/// # Errors
/// - `TracklineError::Configuration` - Invalid tracker URL, info hash, or peer ID
/// - `TracklineError::Tracker` - Announce failed
pub async fn announce(
    tracker: String,
    info_hash: String,
    left: u64,
    port: Option<u16>,
    peer_id: Option<String>,
) -> Result<()> {
    let config = session_config(TracklineConfig::from_env(), port);
    let tracker_url = parse_tracker_url(&tracker)?;

    let descriptor = ContentDescriptor::new(InfoHash::from_hex(&info_hash)?, tracker_url, left);
    let peer_id = match peer_id {
        Some(hex_id) => PeerId::from_hex(&hex_id)?,
        None => PeerId::generate(&config.client_id_prefix),
    };

    let transport = HttpTrackerTransport::new(&config.network)?;
    let client = TrackerClient::new(transport, peer_id, config.announce);

    let response = client.announce(&descriptor).await?;
    print_response(&response);

    Ok(())
}

/// Apply command-line overrides on top of the environment configuration
fn session_config(mut config: TracklineConfig, port: Option<u16>) -> TracklineConfig {
    if let Some(port) = port {
        config.announce.port = port;
    }
    config
}

fn parse_tracker_url(tracker: &str) -> Result<url::Url> {
    let tracker_url = url::Url::parse(tracker).map_err(|e| TracklineError::Configuration {
        reason: format!("invalid tracker URL {tracker}: {e}"),
    })?;
    if !matches!(tracker_url.scheme(), "http" | "https") {
        return Err(TracklineError::Configuration {
            reason: format!("only HTTP(S) trackers are supported, got {tracker}"),
        });
    }
    Ok(tracker_url)
}

/// Decode a response body from disk and print it
///
/// # Errors
/// - `TracklineError::Io` - File could not be read
/// - `TracklineError::Tracker` - Body is not a valid announce response
pub async fn decode_file(file: PathBuf) -> Result<()> {
    let body = fs::read(&file).await?;
    let response = decode_announce_response(&body)?;
    print_response(&response);

    Ok(())
}

fn print_response(response: &AnnounceResponse) {
    for peer in &response.peers {
        println!("{peer}");
    }

    if let Some(interval) = response.interval {
        eprintln!("interval: {interval}s");
    }
    if let (Some(complete), Some(incomplete)) = (response.complete, response.incomplete) {
        eprintln!("seeders: {complete}, leechers: {incomplete}");
    }
    eprintln!("{} peers", response.peers.len());
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const INFO_HASH: &str = "abababababababababababababababababababab";

    #[test]
    fn test_parse_tracker_url() {
        let url = parse_tracker_url("https://tracker.example.com/announce?key=1").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.query(), Some("key=1"));

        assert!(matches!(
            parse_tracker_url("udp://tracker.example.com:6969/announce"),
            Err(TracklineError::Configuration { reason }) if reason.contains("HTTP(S)")
        ));
        assert!(matches!(
            parse_tracker_url("not a url"),
            Err(TracklineError::Configuration { reason }) if reason.contains("invalid tracker URL")
        ));
    }

    #[test]
    fn test_port_override() {
        let config = session_config(TracklineConfig::for_testing(), Some(51413));
        assert_eq!(config.announce.port, 51413);

        let config = session_config(TracklineConfig::for_testing(), None);
        assert_eq!(config.announce.port, 6881);
    }

    #[tokio::test]
    async fn test_announce_rejects_input_before_network() {
        let result = announce(
            "udp://tracker.example.com:6969/announce".to_string(),
            INFO_HASH.to_string(),
            0,
            None,
            None,
        )
        .await;
        assert!(matches!(result, Err(ref e) if e.is_user_error()));

        let result = announce(
            "http://tracker.example.com/announce".to_string(),
            "abcd".to_string(),
            0,
            None,
            None,
        )
        .await;
        assert!(matches!(result, Err(TracklineError::Configuration { .. })));

        let result = announce(
            "http://tracker.example.com/announce".to_string(),
            INFO_HASH.to_string(),
            0,
            Some(6881),
            Some("zz".to_string()),
        )
        .await;
        assert!(matches!(result, Err(TracklineError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_decode_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"d8:intervali900e5:peers6:\x7f\x00\x00\x01\x1a\xe1e")
            .unwrap();

        assert!(decode_file(file.path().to_path_buf()).await.is_ok());
    }

    #[tokio::test]
    async fn test_decode_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = decode_file(dir.path().join("missing.bencode")).await;
        assert!(matches!(result, Err(TracklineError::Io(_))));

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"d5:peersi5ee").unwrap();
        let result = decode_file(file.path().to_path_buf()).await;
        assert!(matches!(result, Err(TracklineError::Tracker(_))));
    }
}
