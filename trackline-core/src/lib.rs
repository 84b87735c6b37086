//! Trackline Core - BitTorrent tracker announce and peer discovery
//!
//! This crate builds HTTP tracker announce requests, runs the one-shot
//! announce exchange through a pluggable transport, and normalizes the
//! tracker's compact and dictionary peer lists into a single peer type.

pub mod config;
pub mod torrent;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::TracklineConfig;
pub use torrent::{ContentDescriptor, InfoHash, PeerId, TrackerError};

/// Core errors that can bubble up from any Trackline subsystem.
///
/// High-level error types representing failures in core functionality.
#[derive(Debug, thiserror::Error)]
pub enum TracklineError {
    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TracklineError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            TracklineError::Tracker(e) => match e {
                TrackerError::Transport { url, .. } => {
                    format!("Could not reach tracker: {url}")
                }
                TrackerError::TrackerRejected { reason } => {
                    format!("Tracker refused the announce: {reason}")
                }
                TrackerError::Decode { .. } | TrackerError::UnexpectedResponseShape { .. } => {
                    "Tracker sent an unreadable response".to_string()
                }
                _ => "Tracker sent an invalid peer list".to_string(),
            },
            TracklineError::Configuration { reason } => format!("Invalid input: {reason}"),
            TracklineError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(self, TracklineError::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, TracklineError>;
