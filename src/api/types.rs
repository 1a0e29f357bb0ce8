use crate::client::error::ClientError;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Datasets the cluster knows how to resolve on its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Mnist,
    FashionMnist,
}

impl Dataset {
    pub const ALL: [Dataset; 2] = [Dataset::Mnist, Dataset::FashionMnist];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Mnist => "mnist",
            Dataset::FashionMnist => "fashionmnist",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], "");
        Dataset::ALL
            .into_iter()
            .find(|dataset| dataset.as_str() == normalized)
            .ok_or_else(|| ClientError::InvalidInput(format!("Unknown dataset '{}'", s)))
    }
}

/// TRAIN_REQUEST carrying the training data inline, base64-encoded.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainContentPayload {
    pub model_name: String,
    pub data_content: String,
}

/// TRAIN_REQUEST naming a dataset the cluster already holds.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainDatasetPayload {
    pub model_name: String,
    pub dataset: Dataset,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictPayload {
    pub model_id: String,
    pub input_vector: Vec<f64>,
}
