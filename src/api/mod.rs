//! Semantic Request API
//!
//! Typed operations layered over `ClusterClient::send_request`. Their only job is
//! shaping payloads and applying the local encoding/validation rules; every
//! call is otherwise a pass-through to the client.
//!
//! ## Submodules
//! - **`types`**: Payload DTOs and the closed set of built-in datasets.
//! - **`operations`**: `train_*`, `predict`, `list_models`, `status`, `leader` on `ClusterClient`.
//! - **`validation`**: Local checks run before anything touches the network.

pub mod operations;
pub mod types;
pub mod validation;

#[cfg(test)]
mod tests;
