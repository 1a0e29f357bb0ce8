//! Per-client connection state.
//!
//! A `ClientSession` groups everything that changes while a client talks to the
//! cluster: the live connection, the rotation cursor and the node currently
//! connected. It is owned by exactly one `ClusterClient` and never shared, so
//! concurrent workers each holding their own client are fully independent.

use crate::cluster::registry::NodeRegistry;
use crate::cluster::types::NodeDescriptor;

use tokio::io::BufReader;
use tokio::net::TcpStream;

#[derive(Debug, Default)]
pub struct ClientSession {
    connection: Option<BufReader<TcpStream>>,
    rotation_index: usize,
    connected_node: Option<NodeDescriptor>,
}

impl ClientSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn rotation_index(&self) -> usize {
        self.rotation_index
    }

    pub fn connected_node(&self) -> Option<&NodeDescriptor> {
        self.connected_node.as_ref()
    }

    /// Installs a fresh connection, dropping any previous one first.
    pub(crate) fn attach(&mut self, stream: TcpStream, node: NodeDescriptor) {
        self.close();
        self.connection = Some(BufReader::new(stream));
        self.connected_node = Some(node);
    }

    pub(crate) fn connection_mut(&mut self) -> Option<&mut BufReader<TcpStream>> {
        self.connection.as_mut()
    }

    pub(crate) fn advance(&mut self, registry: &NodeRegistry) {
        self.rotation_index = registry.next_index(self.rotation_index);
    }

    pub(crate) fn jump_to(&mut self, index: usize) {
        self.rotation_index = index;
    }

    /// Drops the connection if any. Safe to call repeatedly.
    pub fn close(&mut self) {
        if let Some(node) = self.connected_node.take() {
            tracing::debug!("Closing connection to {}", node);
        }
        self.connection = None;
    }
}
