//! Cluster node records and addressing

use serde::{Deserialize, Serialize};

/// Role of a server within the cluster
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerRole {
    /// Control-plane node participating in leader election
    Master,
    /// Regular workload node
    Node,
}

/// A single cluster node as reported by the cluster state store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// Hostname, unique within the cluster
    pub hostname: String,

    /// Address other nodes use to reach this node (e.g. "192.168.1.10")
    pub advertise_ip: String,

    /// Control-plane or workload role
    pub role: ServerRole,
}

impl Server {
    pub fn is_master(&self) -> bool {
        matches!(self.role, ServerRole::Master)
    }
}

/// Cluster DNS configuration carried into the operation plan
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DnsConfig {
    /// Addresses the cluster DNS listens on
    pub listen_addrs: Vec<String>,

    /// Port the cluster DNS listens on
    pub port: u16,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            listen_addrs: vec!["127.0.0.2".to_string()],
            port: 53,
        }
    }
}
