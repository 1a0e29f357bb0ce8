use serde::{Deserialize, Serialize};
use std::fmt;

/// A single addressable cluster member.
///
/// The `name` is the symbolic identifier the nodes themselves use
/// (e.g. in leader hints), `host`/`port` is where the client connects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NodeDescriptor {
    pub host: String,
    pub port: u16,
    pub name: String,
}

impl NodeDescriptor {
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            name: name.into(),
        }
    }

    /// `host:port` form accepted by `TcpStream::connect`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for NodeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.name, self.host, self.port)
    }
}
