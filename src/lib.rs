//! Cluster Client Library
//!
//! Client-side access layer for a clustered training/inference service. Nodes
//! speak newline-delimited JSON over TCP; only the current leader accepts
//! training, and followers answer with a redirect sentinel.
//!
//! ## Architecture Modules
//! The crate is layered, leaves first:
//!
//! - **`cluster`**: The static node registry. An ordered list of `(host, port, name)`
//!   endpoints that defines the rotation order used for failover.
//! - **`client`**: The `ClusterClient`. Owns one connection at a time, fails over
//!   across nodes, frames requests, and follows leader redirects within a bounded
//!   number of hops.
//! - **`api`**: Typed operations (train from file/bytes/dataset, predict, list models,
//!   status, leader) that shape payloads and validate input locally.
//! - **`bench`**: The benchmark harness. Sequential and concurrent predict load,
//!   latency/throughput aggregation, and timestamped JSON reports.

pub mod api;
pub mod bench;
pub mod client;
pub mod cluster;

#[cfg(test)]
mod testing;
