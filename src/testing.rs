//! In-process stand-ins for cluster nodes.
//!
//! A `MockNode` listens on an ephemeral localhost port and answers every
//! request line with whatever its responder closure decides. Tests use them to
//! play followers, leaders, flaky peers and dead nodes.

use crate::client::config::ClientConfig;
use crate::client::protocol::{
    LEADER_REDIRECT, RequestEnvelope, ResponseEnvelope, decode_frame, encode_frame,
};
use crate::cluster::registry::NodeRegistry;
use crate::cluster::types::NodeDescriptor;

use serde_json::{Map, Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// What a mock node does with one request.
pub enum Reply {
    /// Answer with a well-formed frame.
    Respond(ResponseEnvelope),
    /// Answer with a well-formed frame split into several small writes.
    Fragmented(ResponseEnvelope),
    /// Write these bytes verbatim.
    Raw(Vec<u8>),
    /// Close the connection without answering.
    Hangup,
    /// Never answer.
    Silence,
}

type Responder = Arc<dyn Fn(&RequestEnvelope) -> Reply + Send + Sync>;

pub struct MockNode {
    pub descriptor: NodeDescriptor,
    connections: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RequestEnvelope>>>,
    handle: JoinHandle<()>,
}

impl MockNode {
    pub async fn spawn<F>(name: &str, responder: F) -> Self
    where
        F: Fn(&RequestEnvelope) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let connections = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let responder: Responder = Arc::new(responder);

        let handle = {
            let connections = connections.clone();
            let requests = requests.clone();
            tokio::spawn(async move {
                while let Ok((socket, _)) = listener.accept().await {
                    connections.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(serve_connection(socket, responder.clone(), requests.clone()));
                }
            })
        };

        Self {
            descriptor: NodeDescriptor::new(name, "127.0.0.1", port),
            connections,
            requests,
            handle,
        }
    }

    /// A leader that answers every request successfully, tagging the reply with its name.
    pub async fn leader(name: &str) -> Self {
        let node = name.to_string();
        Self::spawn(name, move |_| Reply::Respond(ok_from(&node))).await
    }

    /// A follower that refuses every request with the redirect sentinel.
    pub async fn follower(name: &str) -> Self {
        Self::spawn(name, |_| Reply::Respond(ResponseEnvelope::failure(LEADER_REDIRECT))).await
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RequestEnvelope> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockNode {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve_connection(
    socket: TcpStream,
    responder: Responder,
    requests: Arc<Mutex<Vec<RequestEnvelope>>>,
) {
    let mut reader = BufReader::new(socket);

    loop {
        let mut line = Vec::new();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }

        let Ok(request) = decode_frame::<RequestEnvelope>(&line) else {
            return;
        };
        requests.lock().unwrap().push(request.clone());

        let socket = reader.get_mut();
        let written = match responder(&request) {
            Reply::Respond(response) => socket.write_all(&encode_frame(&response).unwrap()).await,
            Reply::Fragmented(response) => {
                let frame = encode_frame(&response).unwrap();
                let mut result = Ok(());
                for chunk in frame.chunks(3) {
                    result = socket.write_all(chunk).await;
                    if result.is_err() {
                        break;
                    }
                    let _ = socket.flush().await;
                    tokio::time::sleep(Duration::from_millis(2)).await;
                }
                result
            }
            Reply::Raw(bytes) => socket.write_all(&bytes).await,
            Reply::Hangup => return,
            Reply::Silence => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                return;
            }
        };

        if written.is_err() {
            return;
        }
    }
}

/// Successful response carrying the answering node's name.
pub fn ok_from(node: &str) -> ResponseEnvelope {
    let mut fields = Map::new();
    fields.insert("node".to_string(), json!(node));
    fields.insert("prediction".to_string(), json!(1));
    ResponseEnvelope::ok(fields)
}

/// Name of the node that produced a response built by `ok_from`.
pub fn answered_by(response: &ResponseEnvelope) -> Option<&str> {
    response.get("node").and_then(Value::as_str)
}

/// A descriptor pointing at a port nothing listens on.
pub async fn unreachable_node(name: &str) -> NodeDescriptor {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    NodeDescriptor::new(name, "127.0.0.1", port)
}

pub fn registry_of(nodes: Vec<NodeDescriptor>) -> Arc<NodeRegistry> {
    Arc::new(NodeRegistry::new(nodes).unwrap())
}

/// Client configuration with short timeouts and no pause between connect attempts.
pub fn fast_config() -> ClientConfig {
    ClientConfig {
        connect_timeout: Duration::from_millis(500),
        query_timeout: Duration::from_secs(2),
        training_timeout: Duration::from_secs(5),
        retry_pause: Duration::ZERO,
        ..ClientConfig::default()
    }
}
