//! Topology partitioning

use super::Server;

/// Splits the given servers into masters and regular nodes, preserving the
/// input order within each group. Returned servers are copies; the plan never
/// aliases caller-owned state.
pub fn split_servers(servers: &[Server]) -> (Vec<Server>, Vec<Server>) {
    let mut masters = Vec::new();
    let mut nodes = Vec::new();
    for server in servers {
        if server.is_master() {
            masters.push(server.clone());
        } else {
            nodes.push(server.clone());
        }
    }
    (masters, nodes)
}
