//! Ordered Node Registry
//!
//! Holds the fixed list of candidate nodes. The registry itself is immutable and
//! cheap to share behind an `Arc`; the rotation cursor lives in each client's
//! session so that independent clients never influence each other.

use super::types::NodeDescriptor;

use anyhow::{Result, bail};
use std::str::FromStr;

/// Environment variable holding a comma-separated `name@host:port` list.
pub const NODES_ENV: &str = "CLUSTER_NODES";

/// Default local three-node deployment as `(name, host, port)`.
pub const DEFAULT_NODES: [(&str, &str, u16); 3] = [
    ("Node_A", "127.0.0.1", 5000),
    ("Node_B", "127.0.0.1", 5001),
    ("Node_C", "127.0.0.1", 5002),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRegistry {
    nodes: Vec<NodeDescriptor>,
}

impl NodeRegistry {
    /// Builds a registry from an ordered node list.
    ///
    /// An empty list is rejected: a client with nothing to rotate through
    /// can never make progress.
    pub fn new(nodes: Vec<NodeDescriptor>) -> Result<Self> {
        if nodes.is_empty() {
            bail!("Node registry must contain at least one node");
        }
        Ok(Self { nodes })
    }

    /// Reads `CLUSTER_NODES`, falling back to the local three-node default.
    pub fn from_env() -> Result<Self> {
        match std::env::var(NODES_ENV) {
            Ok(raw) => raw.parse(),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node at `index`, wrapping around the registry size.
    pub fn get(&self, index: usize) -> &NodeDescriptor {
        &self.nodes[index % self.nodes.len()]
    }

    /// Index following `index` in rotation order.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.nodes.len()
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.name == name)
    }

    pub fn nodes(&self) -> &[NodeDescriptor] {
        &self.nodes
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self {
            nodes: DEFAULT_NODES
                .iter()
                .map(|&(name, host, port)| NodeDescriptor::new(name, host, port))
                .collect(),
        }
    }
}

impl FromStr for NodeRegistry {
    type Err = anyhow::Error;

    /// Parses `name@host:port[,name@host:port...]`.
    ///
    /// The name part is optional; without it the node is named after its address.
    fn from_str(s: &str) -> Result<Self> {
        let mut nodes = Vec::new();

        for item in s.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let (name, addr) = match item.split_once('@') {
                Some((name, addr)) => (name.trim().to_string(), addr.trim()),
                None => (item.to_string(), item),
            };

            let (host, port) = addr
                .rsplit_once(':')
                .ok_or_else(|| anyhow::anyhow!("Missing port in node entry '{}'", item))?;

            if host.is_empty() || name.is_empty() {
                bail!("Invalid node entry '{}'", item);
            }

            let port: u16 = port
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid port in node entry '{}': {}", item, e))?;

            nodes.push(NodeDescriptor::new(name, host, port));
        }

        Self::new(nodes)
    }
}
