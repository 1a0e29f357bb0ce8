//! Cluster Client
//!
//! Owns one transport connection at a time and performs reliable
//! request/response exchange on top of it.
//!
//! ## Responsibilities
//! - **Failover**: finding any reachable node, rotating through the registry.
//! - **Exchange**: writing one framed request and reading one framed response.
//! - **Leader Redirect**: resending to the next candidate when a follower refuses,
//!   visiting each refusing node at most once per call.

use super::config::ClientConfig;
use super::error::ClientError;
use super::protocol::{
    FRAME_DELIMITER, OperationKind, RequestEnvelope, ResponseEnvelope, decode_frame, encode_frame,
};
use super::session::ClientSession;
use crate::cluster::registry::NodeRegistry;
use crate::cluster::types::NodeDescriptor;

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

pub struct ClusterClient {
    registry: Arc<NodeRegistry>,
    config: ClientConfig,
    session: ClientSession,
}

impl ClusterClient {
    pub fn new(registry: Arc<NodeRegistry>, config: ClientConfig) -> Self {
        Self {
            registry,
            config,
            session: ClientSession::new(),
        }
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    /// Connects to the first reachable node, starting at the current rotation index.
    ///
    /// Every node is tried at most once. Each failure advances the rotation index,
    /// so after a fully failed call the index has gone around exactly once.
    pub async fn connect(&mut self) -> Result<NodeDescriptor, ClientError> {
        self.session.close();

        let total = self.registry.len();
        let mut attempted = Vec::with_capacity(total);

        for attempt in 0..total {
            let node = self.registry.get(self.session.rotation_index()).clone();
            tracing::debug!("Trying to connect to {}", node);

            match self.open(&node).await {
                Ok(stream) => {
                    tracing::info!("Connected to {}", node);
                    self.session.attach(stream, node.clone());
                    return Ok(node);
                }
                Err(e) => {
                    tracing::warn!("Connection to {} failed: {}", node, e);
                    attempted.push(node.name);
                    self.session.advance(&self.registry);

                    if attempt + 1 < total && !self.config.retry_pause.is_zero() {
                        tokio::time::sleep(self.config.retry_pause).await;
                    }
                }
            }
        }

        tracing::error!("Could not connect to any of {} node(s)", total);
        Err(ClientError::ClusterUnavailable { attempted })
    }

    async fn open(&self, node: &NodeDescriptor) -> std::io::Result<TcpStream> {
        let stream = tokio::time::timeout(self.config.connect_timeout, TcpStream::connect(node.address()))
            .await
            .map_err(|_| {
                std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!("connect timeout after {:?}", self.config.connect_timeout),
                )
            })??;

        stream.set_nodelay(true)?;
        Ok(stream)
    }

    /// Sends one request and returns the node's response unmodified.
    ///
    /// Leader redirects are followed transparently. Any other failure closes the
    /// connection, rotates the cursor for the next call, and is returned as is.
    pub async fn send_request(
        &mut self,
        kind: OperationKind,
        payload: Value,
    ) -> Result<ResponseEnvelope, ClientError> {
        let request = RequestEnvelope::new(kind, payload);
        let frame = encode_frame(&request).map_err(ClientError::Encode)?;
        let timeout = self.config.timeout_for(kind.category());

        let mut hops = 0;
        // Nodes that refused this request as followers
        let mut redirected = vec![false; self.registry.len()];

        loop {
            if !self.session.is_connected() {
                self.connect().await?;
            }

            match self.exchange(&frame, timeout).await {
                Ok(response) if response.is_leader_redirect() => {
                    hops += 1;

                    let current = self.session.rotation_index();
                    redirected[current] = true;
                    let refused_by = self.registry.get(current).name.clone();

                    self.session.close();

                    let candidate =
                        self.next_candidate(current, response.leader_hint(), &redirected);
                    let next = match candidate {
                        Some(next) if hops < self.registry.len() => next,
                        _ => {
                            self.session.advance(&self.registry);
                            tracing::error!(
                                "{} request: no leader after {} redirect(s)",
                                kind.tag(),
                                hops
                            );
                            return Err(ClientError::NoLeader { hops });
                        }
                    };
                    self.session.jump_to(next);

                    tracing::info!(
                        "{} is not the leader, retrying {} on {}",
                        refused_by,
                        kind.tag(),
                        self.registry.get(next).name
                    );
                }
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!("Communication error during {}: {}", kind.tag(), e);
                    self.session.close();
                    self.session.advance(&self.registry);
                    return Err(e);
                }
            }
        }
    }

    /// Picks the next candidate after a redirect from `current`.
    ///
    /// A hint wins over rotation order only if it names a node that has not
    /// redirected yet. Returns `None` once every node has redirected.
    fn next_candidate(
        &self,
        current: usize,
        hint: Option<&str>,
        redirected: &[bool],
    ) -> Option<usize> {
        if let Some(index) = hint.and_then(|name| self.registry.position_of(name))
            && !redirected[index]
        {
            tracing::debug!("Following leader hint to {}", self.registry.get(index).name);
            return Some(index);
        }

        (1..self.registry.len())
            .map(|offset| (current + offset) % self.registry.len())
            .find(|&index| !redirected[index])
    }

    /// Writes one frame and reads one response line on the live connection.
    async fn exchange(
        &mut self,
        frame: &[u8],
        timeout: Duration,
    ) -> Result<ResponseEnvelope, ClientError> {
        let node = self
            .session
            .connected_node()
            .map(|node| node.name.clone())
            .unwrap_or_default();

        let Some(connection) = self.session.connection_mut() else {
            return Err(ClientError::ConnectionClosed { node });
        };

        let limit = self.config.max_frame_bytes;
        let round_trip = async {
            connection.get_mut().write_all(frame).await?;

            let mut line = Vec::new();
            (&mut *connection)
                .take(limit as u64)
                .read_until(FRAME_DELIMITER, &mut line)
                .await?;
            Ok::<_, std::io::Error>(line)
        };

        let line = match tokio::time::timeout(timeout, round_trip).await {
            Err(_) => return Err(ClientError::Timeout { node, after: timeout }),
            Ok(Err(source)) => return Err(ClientError::Transport { node, source }),
            Ok(Ok(line)) => line,
        };
        let trailing = connection.buffer().len();

        // Without the delimiter the read hit either EOF or the frame limit
        if line.last() != Some(&FRAME_DELIMITER) {
            if line.len() >= limit {
                return Err(ClientError::MalformedResponse {
                    node,
                    source: serde::de::Error::custom(format!(
                        "response exceeds {} bytes without a frame delimiter",
                        limit
                    )),
                });
            }
            return Err(ClientError::ConnectionClosed { node });
        }

        let response = decode_frame(&line).map_err(|source| ClientError::MalformedResponse {
            node: node.clone(),
            source,
        })?;

        // Leftover bytes would be read as the answer to the next request
        if trailing > 0 {
            tracing::warn!(
                "{} sent {} unexpected byte(s) after its response, dropping connection",
                node,
                trailing
            );
            self.session.close();
        }

        Ok(response)
    }

    /// Releases the connection if held. Idempotent.
    pub fn close(&mut self) {
        self.session.close();
    }
}
