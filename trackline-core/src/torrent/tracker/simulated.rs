//! In-memory tracker transport for tests and offline decoding

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use super::client::TrackerTransport;
use super::types::AnnounceRequest;
use crate::torrent::{TrackerError, TransportFailure};

enum CannedReply {
    Body(Bytes),
    Failure(TransportFailure),
}

/// Transport that answers every request with the same canned reply.
///
/// Records each request so callers can inspect what would have been sent.
pub struct SimulatedTrackerTransport {
    reply: CannedReply,
    requests: Mutex<Vec<AnnounceRequest>>,
}

impl SimulatedTrackerTransport {
    /// Creates transport that returns `body` as a successful response.
    pub fn with_body(body: impl Into<Bytes>) -> Self {
        Self {
            reply: CannedReply::Body(body.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Creates transport whose exchanges always fail with `failure`.
    pub fn with_failure(failure: TransportFailure) -> Self {
        Self {
            reply: CannedReply::Failure(failure),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<AnnounceRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl TrackerTransport for SimulatedTrackerTransport {
    async fn send(&self, request: &AnnounceRequest) -> Result<Bytes, TrackerError> {
        self.requests.lock().push(request.clone());

        match &self.reply {
            CannedReply::Body(body) => Ok(body.clone()),
            CannedReply::Failure(failure) => Err(TrackerError::Transport {
                url: request.url.to_string(),
                failure: *failure,
            }),
        }
    }
}
