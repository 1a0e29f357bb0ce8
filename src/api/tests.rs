//! Semantic Request API Tests
//!
//! ## Test Scopes
//! - **Payload Shaping**: Each operation sends the expected tag and fields.
//! - **Encoding**: Training bytes travel base64-encoded.
//! - **Local Validation**: Bad input never reaches the cluster.

#[cfg(test)]
mod tests {
    use crate::api::types::Dataset;
    use crate::api::validation::parse_input_vector;
    use crate::client::client::ClusterClient;
    use crate::client::error::ClientError;
    use crate::client::protocol::{OperationKind, ResponseEnvelope};
    use crate::testing::{MockNode, Reply, fast_config, registry_of};
    use base64::Engine as _;
    use serde_json::{Map, json};
    use std::io::Write;

    async fn client_for(node: &MockNode) -> ClusterClient {
        ClusterClient::new(registry_of(vec![node.descriptor.clone()]), fast_config())
    }

    // ============================================================
    // VALIDATION TESTS
    // ============================================================

    #[test]
    fn test_parse_input_vector() {
        let vector = parse_input_vector("0.1, 0.2,0.3 , -4").unwrap();
        assert_eq!(vector, vec![0.1, 0.2, 0.3, -4.0]);
    }

    #[test]
    fn test_parse_input_vector_rejects_garbage() {
        let result = parse_input_vector("1.0, abc, 3.0");
        assert!(matches!(result, Err(ClientError::InvalidInput(msg)) if msg.contains("abc")));

        assert!(parse_input_vector("").is_err());
        assert!(parse_input_vector("1.0,,2.0").is_err());
        assert!(parse_input_vector("NaN").is_err());
    }

    #[test]
    fn test_dataset_parsing() {
        assert_eq!("mnist".parse::<Dataset>().unwrap(), Dataset::Mnist);
        assert_eq!("FashionMNIST".parse::<Dataset>().unwrap(), Dataset::FashionMnist);
        assert_eq!("fashion-mnist".parse::<Dataset>().unwrap(), Dataset::FashionMnist);
        assert!("cifar10".parse::<Dataset>().is_err());
    }

    #[test]
    fn test_dataset_wire_names() {
        assert_eq!(serde_json::to_value(Dataset::Mnist).unwrap(), json!("mnist"));
        assert_eq!(
            serde_json::to_value(Dataset::FashionMnist).unwrap(),
            json!("fashionmnist")
        );
    }

    // ============================================================
    // OPERATION TESTS
    // ============================================================

    #[tokio::test]
    async fn test_train_from_bytes_encodes_base64() {
        let node = MockNode::spawn("A", |_| {
            let mut fields = Map::new();
            fields.insert("modelId".into(), json!("digits"));
            Reply::Respond(ResponseEnvelope::ok(fields))
        })
        .await;
        let mut client = client_for(&node).await;
        let data = b"label,pixel0\n1,0.5\n";

        let response = client.train_from_bytes("digits", data).await.unwrap();

        assert_eq!(response.model_id(), Some("digits"));
        let request = &node.requests()[0];
        assert_eq!(request.kind, OperationKind::Train);
        assert_eq!(request.payload["model_name"], "digits");

        let encoded = request.payload["data_content"].as_str().unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        assert_eq!(decoded, data);
    }

    #[tokio::test]
    async fn test_train_from_file_sends_file_content() {
        let node = MockNode::leader("A").await;
        let mut client = client_for(&node).await;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0.1,0.2,0.3,0.4\n").unwrap();

        let response = client.train_from_file("m", file.path()).await.unwrap();

        assert!(response.success);
        let request = &node.requests()[0];
        assert_eq!(
            request.payload["data_content"],
            base64::engine::general_purpose::STANDARD.encode(b"0.1,0.2,0.3,0.4\n")
        );
    }

    #[tokio::test]
    async fn test_train_from_missing_file_is_local_failure() {
        // ARRANGE
        let node = MockNode::leader("A").await;
        let mut client = client_for(&node).await;

        // ACT
        let result = client
            .train_from_file("m", "/definitely/not/here/data.csv")
            .await;

        // ASSERT: FileNotFound, and no connection was ever attempted
        match result {
            Err(ClientError::FileNotFound { path }) => {
                assert!(path.ends_with("data.csv"));
            }
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
        assert_eq!(node.connections(), 0);
        assert!(!client.session().is_connected());
    }

    #[tokio::test]
    async fn test_train_with_dataset_payload() {
        let node = MockNode::leader("A").await;
        let mut client = client_for(&node).await;

        client
            .train_with_dataset("fashion", Dataset::FashionMnist)
            .await
            .unwrap();

        let request = &node.requests()[0];
        assert_eq!(request.kind, OperationKind::Train);
        assert_eq!(
            request.payload,
            json!({"model_name": "fashion", "dataset": "fashionmnist"})
        );
    }

    #[tokio::test]
    async fn test_predict_payload_and_result() {
        let node = MockNode::spawn("A", |_| {
            let mut fields = Map::new();
            fields.insert("prediction".into(), json!([0.9, 0.1]));
            Reply::Respond(ResponseEnvelope::ok(fields))
        })
        .await;
        let mut client = client_for(&node).await;

        let response = client.predict("m", &[1.0, 2.5, -3.0]).await.unwrap();

        assert_eq!(response.prediction(), Some(&json!([0.9, 0.1])));
        let request = &node.requests()[0];
        assert_eq!(request.kind, OperationKind::Predict);
        assert_eq!(
            request.payload,
            json!({"model_id": "m", "input_vector": [1.0, 2.5, -3.0]})
        );
    }

    #[tokio::test]
    async fn test_predict_rejects_empty_vector_locally() {
        let node = MockNode::leader("A").await;
        let mut client = client_for(&node).await;

        let result = client.predict("m", &[]).await;

        assert!(matches!(result, Err(ClientError::InvalidInput(_))));
        assert_eq!(node.connections(), 0);
    }

    #[tokio::test]
    async fn test_list_models_sends_empty_payload() {
        let node = MockNode::spawn("A", |_| {
            let mut fields = Map::new();
            fields.insert("models".into(), json!(["m1", "m2"]));
            Reply::Respond(ResponseEnvelope::ok(fields))
        })
        .await;
        let mut client = client_for(&node).await;

        let response = client.list_models().await.unwrap();

        assert_eq!(response.models(), vec!["m1", "m2"]);
        let request = &node.requests()[0];
        assert_eq!(request.kind, OperationKind::ListModels);
        assert_eq!(request.payload, json!({}));
    }

    #[tokio::test]
    async fn test_status_and_leader_tags() {
        let node = MockNode::leader("A").await;
        let mut client = client_for(&node).await;

        client.status().await.unwrap();
        client.leader().await.unwrap();

        let kinds: Vec<_> = node.requests().into_iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![OperationKind::Status, OperationKind::Leader]);
    }
}
