//! Client Wire Protocol
//!
//! Defines the request/response envelopes exchanged with cluster nodes and the
//! newline framing that carries them over TCP.
//!
//! Each message is exactly one UTF-8 JSON document followed by a single `\n`.
//! There is no length prefix; readers buffer until the delimiter shows up.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Byte terminating every frame on the wire.
pub const FRAME_DELIMITER: u8 = b'\n';

/// Error string a follower returns when it receives a request only the leader may serve.
pub const LEADER_REDIRECT: &str = "No soy el líder";

/// Operation tags understood by cluster nodes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OperationKind {
    #[serde(rename = "TRAIN_REQUEST")]
    Train,
    #[serde(rename = "PREDICT_REQUEST")]
    Predict,
    #[serde(rename = "LIST_MODELS")]
    ListModels,
    #[serde(rename = "GET_STATUS")]
    Status,
    #[serde(rename = "GET_LEADER")]
    Leader,
}

/// Which timeout applies to an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutCategory {
    /// Short round trips (seconds).
    Query,
    /// Synchronous training on the leader (tens of minutes).
    Training,
}

impl OperationKind {
    pub fn tag(&self) -> &'static str {
        match self {
            OperationKind::Train => "TRAIN_REQUEST",
            OperationKind::Predict => "PREDICT_REQUEST",
            OperationKind::ListModels => "LIST_MODELS",
            OperationKind::Status => "GET_STATUS",
            OperationKind::Leader => "GET_LEADER",
        }
    }

    pub fn category(&self) -> TimeoutCategory {
        match self {
            OperationKind::Train => TimeoutCategory::Training,
            _ => TimeoutCategory::Query,
        }
    }
}

/// One logical operation sent to the cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestEnvelope {
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub payload: Value,
}

impl RequestEnvelope {
    pub fn new(kind: OperationKind, payload: Value) -> Self {
        Self { kind, payload }
    }
}

/// A node's answer.
///
/// `success` and `error` are common to every operation; everything else
/// (`modelId`, `prediction`, `models`, `leader`, ...) is kept verbatim in `fields`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ResponseEnvelope {
    pub fn ok(fields: Map<String, Value>) -> Self {
        Self {
            success: true,
            error: None,
            fields,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            fields: Map::new(),
        }
    }

    pub fn is_leader_redirect(&self) -> bool {
        !self.success && self.error.as_deref() == Some(LEADER_REDIRECT)
    }

    /// Name of the leader, when the redirecting node knows it.
    pub fn leader_hint(&self) -> Option<&str> {
        self.fields.get("leader").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn model_id(&self) -> Option<&str> {
        self.fields.get("modelId").and_then(Value::as_str)
    }

    pub fn prediction(&self) -> Option<&Value> {
        self.fields.get("prediction")
    }

    pub fn models(&self) -> Vec<String> {
        self.fields
            .get("models")
            .and_then(Value::as_array)
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| m.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Serializes a message into a single newline-terminated frame.
pub fn encode_frame<T: Serialize>(message: &T) -> serde_json::Result<Vec<u8>> {
    // serde_json escapes control characters, so the output never contains a raw newline
    let mut frame = serde_json::to_vec(message)?;
    frame.push(FRAME_DELIMITER);
    Ok(frame)
}

/// Parses one frame, tolerating a trailing `\n` or `\r\n`.
pub fn decode_frame<T: DeserializeOwned>(line: &[u8]) -> serde_json::Result<T> {
    let mut end = line.len();
    while end > 0 && matches!(line[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    serde_json::from_slice(&line[..end])
}
