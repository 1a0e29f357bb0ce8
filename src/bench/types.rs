use serde::{Deserialize, Serialize};

/// Parameters of a sequential run.
#[derive(Debug, Clone)]
pub struct SequentialRun {
    pub requests: usize,
    pub model_id: String,
    /// Length of the random input vector sent with every predict call.
    pub input_size: usize,
}

/// Parameters of a concurrent run.
#[derive(Debug, Clone)]
pub struct ConcurrentRun {
    pub requests: usize,
    pub workers: usize,
    pub model_id: String,
    pub input_size: usize,
}

impl ConcurrentRun {
    /// Requests each worker issues. Integer division: the remainder is dropped.
    pub fn per_worker(&self) -> usize {
        self.requests.checked_div(self.workers).unwrap_or(0)
    }

    /// Requests actually issued across all workers.
    pub fn issued(&self) -> usize {
        self.per_worker() * self.workers
    }
}

/// Latency aggregates over successful requests, in milliseconds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct LatencyStats {
    pub avg: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// Outcome of one benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkRecord {
    pub total: usize,
    pub success: usize,
    pub errors: usize,
    /// Wall-clock seconds for the whole run.
    pub duration: f64,
    /// Requests per second.
    pub throughput: f64,
    pub latency: LatencyStats,
}

/// Persisted result of one benchmark invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    /// Generation time, milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub sequential: BenchmarkRecord,
    pub concurrent: BenchmarkRecord,
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
