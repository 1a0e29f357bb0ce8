use super::protocol::TimeoutCategory;

use std::time::Duration;

/// Default connect timeout per node attempt
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default exchange timeout for predict-style operations
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 5;

/// Default exchange timeout for training, which runs synchronously on the leader
const DEFAULT_TRAINING_TIMEOUT_SECS: u64 = 30 * 60;

/// Pause between two failed connect attempts
const DEFAULT_RETRY_PAUSE_MS: u64 = 1000;

/// Longest response line accepted from a node
const DEFAULT_MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

/// Cluster client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Timeout for establishing a TCP connection to a single node
    pub connect_timeout: Duration,
    /// Round-trip timeout for query operations (predict, list, status)
    pub query_timeout: Duration,
    /// Round-trip timeout for training operations
    pub training_timeout: Duration,
    /// Pause after a failed connect attempt before trying the next node
    pub retry_pause: Duration,
    /// Upper bound on one response line, delimiter included
    pub max_frame_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
            training_timeout: Duration::from_secs(DEFAULT_TRAINING_TIMEOUT_SECS),
            retry_pause: Duration::from_millis(DEFAULT_RETRY_PAUSE_MS),
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CLUSTER_CONNECT_TIMEOUT")
            && let Ok(secs) = val.parse::<u64>()
        {
            config.connect_timeout = Duration::from_secs(secs);
        }

        if let Ok(val) = std::env::var("CLUSTER_QUERY_TIMEOUT")
            && let Ok(secs) = val.parse::<u64>()
        {
            config.query_timeout = Duration::from_secs(secs);
        }

        if let Ok(val) = std::env::var("CLUSTER_TRAINING_TIMEOUT")
            && let Ok(secs) = val.parse::<u64>()
        {
            config.training_timeout = Duration::from_secs(secs);
        }

        if let Ok(val) = std::env::var("CLUSTER_RETRY_PAUSE_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.retry_pause = Duration::from_millis(ms);
        }

        if let Ok(val) = std::env::var("CLUSTER_MAX_FRAME_BYTES")
            && let Ok(bytes) = val.parse::<usize>()
            && bytes > 0
        {
            config.max_frame_bytes = bytes;
        }

        config
    }

    pub fn timeout_for(&self, category: TimeoutCategory) -> Duration {
        match category {
            TimeoutCategory::Query => self.query_timeout,
            TimeoutCategory::Training => self.training_timeout,
        }
    }
}
