//! HTTP tracker transport and one-shot announce client

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use super::request::build_announce_request;
use super::response::decode_announce_response;
use super::types::{AnnounceRequest, AnnounceResponse, PeerList};
use crate::config::{AnnounceConfig, NetworkConfig};
use crate::TracklineError;
use crate::torrent::{ContentDescriptor, PeerId, TrackerError, TransportFailure};

/// Executes an announce request and hands back the raw response body.
///
/// Implementations own timeouts and cancellation. A failed exchange must
/// surface as `TrackerError::Transport`, never as an empty body.
#[async_trait]
pub trait TrackerTransport: Send + Sync {
    /// Sends the request and returns the body of a successful response.
    ///
    /// # Errors
    ///
    /// - `TrackerError::Transport` - Network failure, timeout, or non-2xx status
    async fn send(&self, request: &AnnounceRequest) -> Result<Bytes, TrackerError>;
}

#[async_trait]
impl<T: TrackerTransport + ?Sized> TrackerTransport for Arc<T> {
    async fn send(&self, request: &AnnounceRequest) -> Result<Bytes, TrackerError> {
        (**self).send(request).await
    }
}

/// HTTP(S) transport backed by `reqwest`.
pub struct HttpTrackerTransport {
    client: reqwest::Client,
}

impl HttpTrackerTransport {
    /// Creates HTTP transport from network configuration.
    ///
    /// # Errors
    ///
    /// - `TracklineError::Configuration` - If the settings are rejected by the HTTP client,
    ///   e.g. a user agent that is not a valid header value
    pub fn new(config: &NetworkConfig) -> Result<Self, TracklineError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.tracker_timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build().map_err(|e| {
            tracing::warn!("Failed to build HTTP client: {}", e);
            TracklineError::Configuration {
                reason: format!("invalid HTTP client settings: {e}"),
            }
        })?;

        Ok(Self { client })
    }

    fn display_url(request: &AnnounceRequest) -> String {
        let mut url = request.url.clone();
        url.set_query(None);
        url.to_string()
    }
}

#[async_trait]
impl TrackerTransport for HttpTrackerTransport {
    async fn send(&self, request: &AnnounceRequest) -> Result<Bytes, TrackerError> {
        let tracker_url = Self::display_url(request);
        tracing::debug!("Announcing to tracker: {}", tracker_url);

        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("HTTP request to {} failed: {}", tracker_url, e);
                let failure = if e.is_timeout() {
                    TransportFailure::Timeout
                } else {
                    TransportFailure::Connection
                };
                TrackerError::Transport {
                    url: tracker_url.clone(),
                    failure,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Tracker {} returned error status: {}", tracker_url, status);
            return Err(TrackerError::Transport {
                url: tracker_url,
                failure: TransportFailure::Status(status.as_u16()),
            });
        }

        response.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read response body from {}: {}", tracker_url, e);
            let failure = if e.is_timeout() {
                TransportFailure::Timeout
            } else {
                TransportFailure::Body
            };
            TrackerError::Transport {
                url: tracker_url.clone(),
                failure,
            }
        })
    }
}

/// One-shot announce client.
///
/// Builds the request, sends it through the transport, and decodes the
/// reply. Holds no state between calls and never retries.
pub struct TrackerClient<T> {
    transport: T,
    peer_id: PeerId,
    params: AnnounceConfig,
}

impl<T: TrackerTransport> TrackerClient<T> {
    /// Creates client announcing as `peer_id` with the given session parameters.
    pub fn new(transport: T, peer_id: PeerId, params: AnnounceConfig) -> Self {
        Self {
            transport,
            peer_id,
            params,
        }
    }

    /// Announces to the descriptor's tracker and decodes the full response.
    ///
    /// # Errors
    ///
    /// - `TrackerError::Transport` - If the HTTP exchange failed
    /// - Any decoding error from [`decode_announce_response`]
    pub async fn announce(
        &self,
        descriptor: &ContentDescriptor,
    ) -> Result<AnnounceResponse, TrackerError> {
        let request = build_announce_request(descriptor, &self.peer_id, &self.params);
        let body = self.transport.send(&request).await?;

        decode_announce_response(&body).map_err(|e| {
            tracing::warn!(
                "Failed to decode response from {}: {}",
                descriptor.tracker_url,
                e
            );
            e
        })
    }

    /// Announces and returns only the peers, in tracker order.
    ///
    /// # Errors
    ///
    /// Same as [`TrackerClient::announce`].
    pub async fn discover_peers(
        &self,
        descriptor: &ContentDescriptor,
    ) -> Result<PeerList, TrackerError> {
        let response = self.announce(descriptor).await?;
        tracing::debug!(
            "Discovered {} peers for {}",
            response.peers.len(),
            descriptor.info_hash
        );
        Ok(response.peers)
    }
}
