//! Centralized configuration for Trackline.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

/// Central configuration for all Trackline components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone)]
pub struct TracklineConfig {
    /// Azureus-style prefix for generated peer IDs
    pub client_id_prefix: [u8; 8],
    pub network: NetworkConfig,
    pub announce: AnnounceConfig,
}

impl Default for TracklineConfig {
    fn default() -> Self {
        Self {
            client_id_prefix: *b"-TL0001-",
            network: NetworkConfig::default(),
            announce: AnnounceConfig::default(),
        }
    }
}

/// HTTP transport configuration for tracker communication.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// HTTP request timeout for tracker communication
    pub tracker_timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: String,
    /// Maximum number of redirects followed per announce
    pub max_redirects: usize,
    /// Honor HTTP(S)_PROXY environment variables
    pub use_system_proxy: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            tracker_timeout: Duration::from_secs(30),
            user_agent: "trackline/0.1.0".to_string(),
            max_redirects: 3,
            use_system_proxy: true,
        }
    }
}

/// Session parameters reported in every announce.
///
/// At session start nothing has been transferred yet, so both counters
/// default to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnounceConfig {
    /// TCP port the client claims to listen on for peer connections
    pub port: u16,
    /// Total bytes uploaded to other peers
    pub uploaded: u64,
    /// Total bytes downloaded from other peers
    pub downloaded: u64,
}

impl Default for AnnounceConfig {
    fn default() -> Self {
        Self {
            port: 6881,
            uploaded: 0,
            downloaded: 0,
        }
    }
}

impl TracklineConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Unparsable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(timeout) = std::env::var("TRACKLINE_TRACKER_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.network.tracker_timeout = Duration::from_secs(seconds);
            }
        }

        if let Ok(port) = std::env::var("TRACKLINE_LISTEN_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.announce.port = port;
            }
        }

        if let Ok(user_agent) = std::env::var("TRACKLINE_USER_AGENT") {
            if !user_agent.is_empty() {
                config.network.user_agent = user_agent;
            }
        }

        config
    }

    /// Creates a configuration optimized for testing.
    pub fn for_testing() -> Self {
        Self {
            network: NetworkConfig {
                tracker_timeout: Duration::from_secs(5),
                user_agent: "trackline/test".to_string(),
                use_system_proxy: false,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
