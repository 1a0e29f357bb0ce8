//! Node Registry Module
//!
//! The static view of the cluster as seen from the client side.
//!
//! Membership is configured out of band: an ordered list of `(host, port, name)`
//! triples that never changes while the process runs. The order defines the
//! rotation sequence a client walks through when a node is unreachable or is not
//! the current leader. It carries no priority.
//!
//! ## Submodules
//! - **`types`**: The `NodeDescriptor` value type.
//! - **`registry`**: The ordered `NodeRegistry` plus parsing from configuration strings.

pub mod registry;
pub mod types;
