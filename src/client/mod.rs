//! Cluster Client Module
//!
//! Maintains a single logical connection to "the cluster" even though individual
//! nodes come and go and leadership moves between them.
//!
//! ## Core Mechanisms
//! - **Failover**: `connect()` walks the node registry in rotation order, trying each
//!   node at most once per call.
//! - **Framing**: Every request and response is one JSON document on one line,
//!   terminated by `\n`. Partial reads are buffered until the delimiter arrives.
//! - **Leader Redirect**: A node that is not the leader answers with a sentinel error.
//!   The client closes, moves on, and resends the same request, bounded to one full
//!   cycle through the registry.
//! - **Failure Surfacing**: Transport failures close the connection and rotate the
//!   cursor for the *next* call, but are returned to the caller immediately.
//!
//! ## Submodules
//! - **`client`**: `ClusterClient` (connect / send_request / close).
//! - **`config`**: Per-category timeouts and retry pacing.
//! - **`error`**: The `ClientError` taxonomy.
//! - **`protocol`**: Envelopes, operation tags and line framing.
//! - **`session`**: Exclusively owned connection state of one client.

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod session;
