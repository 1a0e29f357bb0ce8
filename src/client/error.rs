//! Error types for the cluster client.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("No node reachable in the cluster (tried: {})", .attempted.join(", "))]
    ClusterUnavailable { attempted: Vec<String> },

    #[error("No leader found after {hops} redirect(s)")]
    NoLeader { hops: usize },

    #[error("Network error on {node}: {source}")]
    Transport {
        node: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection closed by {node}")]
    ConnectionClosed { node: String },

    #[error("Request to {node} timed out after {after:?}")]
    Timeout { node: String, after: Duration },

    #[error("Malformed response from {node}: {source}")]
    MalformedResponse {
        node: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("File not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// True for errors raised before any network interaction took place.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::Encode(_)
                | ClientError::FileNotFound { .. }
                | ClientError::Io { .. }
                | ClientError::InvalidInput(_)
        )
    }
}
