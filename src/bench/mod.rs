//! Benchmark Harness Module
//!
//! Drives the cluster with predict load and produces comparable statistics for
//! two regimes.
//!
//! ## Regimes
//! - **Sequential**: one client, one request at a time.
//! - **Concurrent**: a fixed pool of workers, each with its own client. Workers push
//!   per-request samples over a channel to a single aggregator (fan-out / fan-in).
//!   The per-worker share is `requests / workers`; the remainder is dropped.
//!
//! A failed request never aborts a run: it is counted and the run moves on,
//! so `success + errors == total` holds for every finished record.
//!
//! ## Submodules
//! - **`types`**: Run parameters, `BenchmarkRecord` and the persisted `Report`.
//! - **`stats`**: Sample aggregation and latency statistics.
//! - **`runner`**: `BenchmarkHarness` with the two run modes and progress polling.
//! - **`report`**: Writing and reading report files.

pub mod report;
pub mod runner;
pub mod stats;
pub mod types;
