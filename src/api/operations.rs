//! Typed cluster operations.
//!
//! Implemented directly on `ClusterClient` so callers hold a single handle for
//! both raw requests and the semantic operations below.

use super::types::{Dataset, PredictPayload, TrainContentPayload, TrainDatasetPayload};
use super::validation::{validate_input_vector, validate_name};
use crate::client::client::ClusterClient;
use crate::client::error::ClientError;
use crate::client::protocol::{OperationKind, ResponseEnvelope};

use base64::Engine as _;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

impl ClusterClient {
    /// Reads a training file and submits its content.
    ///
    /// A missing file fails locally with `FileNotFound`; the cluster is never contacted.
    pub async fn train_from_file(
        &mut self,
        model_name: &str,
        path: impl AsRef<Path>,
    ) -> Result<ResponseEnvelope, ClientError> {
        let path = path.as_ref();

        let bytes = tokio::fs::read(path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ClientError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ClientError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        tracing::info!(
            "Training '{}' from {} ({} bytes)",
            model_name,
            path.display(),
            bytes.len()
        );

        self.train_from_bytes(model_name, &bytes).await
    }

    /// Submits in-memory training data (e.g. an upload).
    pub async fn train_from_bytes(
        &mut self,
        model_name: &str,
        bytes: &[u8],
    ) -> Result<ResponseEnvelope, ClientError> {
        validate_name("Model name", model_name)?;

        let payload = TrainContentPayload {
            model_name: model_name.to_string(),
            data_content: base64::engine::general_purpose::STANDARD.encode(bytes),
        };

        self.send_typed(OperationKind::Train, &payload).await
    }

    /// Asks the cluster to train on one of its built-in datasets.
    pub async fn train_with_dataset(
        &mut self,
        model_name: &str,
        dataset: Dataset,
    ) -> Result<ResponseEnvelope, ClientError> {
        validate_name("Model name", model_name)?;

        let payload = TrainDatasetPayload {
            model_name: model_name.to_string(),
            dataset,
        };

        tracing::info!("Training '{}' on dataset {}", model_name, dataset);
        self.send_typed(OperationKind::Train, &payload).await
    }

    pub async fn predict(
        &mut self,
        model_id: &str,
        input_vector: &[f64],
    ) -> Result<ResponseEnvelope, ClientError> {
        validate_name("Model id", model_id)?;
        validate_input_vector(input_vector)?;

        let payload = PredictPayload {
            model_id: model_id.to_string(),
            input_vector: input_vector.to_vec(),
        };

        self.send_typed(OperationKind::Predict, &payload).await
    }

    /// Known model identifiers are in the response's `models` field.
    pub async fn list_models(&mut self) -> Result<ResponseEnvelope, ClientError> {
        self.send_request(OperationKind::ListModels, empty_payload())
            .await
    }

    pub async fn status(&mut self) -> Result<ResponseEnvelope, ClientError> {
        self.send_request(OperationKind::Status, empty_payload())
            .await
    }

    pub async fn leader(&mut self) -> Result<ResponseEnvelope, ClientError> {
        self.send_request(OperationKind::Leader, empty_payload())
            .await
    }

    async fn send_typed<T: Serialize>(
        &mut self,
        kind: OperationKind,
        payload: &T,
    ) -> Result<ResponseEnvelope, ClientError> {
        let payload = serde_json::to_value(payload).map_err(ClientError::Encode)?;
        self.send_request(kind, payload).await
    }
}

fn empty_payload() -> Value {
    Value::Object(serde_json::Map::new())
}
