//! Phase builder for cluster-configuration updates
//!
//! Decides which phases run on which node and in what relative order.
//! Master maintenance is fully serialized: the first master steps down as
//! Kubernetes leader before its own disruptive phases, then re-establishes
//! leadership once they complete; every other master re-enters the election
//! pool only after its own phases complete, so a node mid-update can never
//! become leader. All of this is encoded purely through `requires` edges:
//! the executor consuming the plan enforces the ordering, the builder only
//! produces the graph.

use crate::cluster::{split_servers, Locator, Server};
use crate::plan::{root, ElectionChange, ExecutorKind, Phase, PhaseData, PlanError};

/// Builds the phase trees of a cluster-configuration update plan
pub struct PhaseBuilder {
    app: Locator,
    servers: Vec<Server>,
}

impl PhaseBuilder {
    pub fn new(app: Locator, servers: Vec<Server>) -> Self {
        Self { app, servers }
    }

    /// The `/update-config` root phase distributing the new configuration
    /// package to the cluster.
    pub fn config(&self) -> Phase {
        root(Phase::leaf(
            "update-config",
            ExecutorKind::UpdateConfig,
            "Update runtime configuration",
            PhaseData {
                package: Some(self.app.clone()),
                ..Default::default()
            },
        ))
    }

    /// The `/masters` root phase: one node sequence per master, chained in
    /// input order so only one master is disrupted at a time.
    ///
    /// The first master of the input list is the pivot that absorbs the
    /// leadership step-down; the choice is positional, not a lookup of the
    /// actual current leader. Fails with a not-found error when the server
    /// list contains no masters.
    pub fn masters(&self) -> Result<Phase, PlanError> {
        let (masters, _nodes) = split_servers(&self.servers);
        let Some((first, others)) = masters.split_first() else {
            return Err(PlanError::NoMasters);
        };

        let mut masters_root = root(Phase::parent("masters", "Update cluster configuration"));

        let mut node = self.node(first);
        if !others.is_empty() {
            node.add_sequential(vec![set_leader_election(
                Vec::new(),
                vec![first.clone()],
                first,
                "stepdown",
                format!("Step down {} as Kubernetes leader", first.hostname),
            )]);
        }
        node.add_sequential(self.common(first, None));
        if !others.is_empty() {
            node.add_sequential(vec![set_leader_election(
                vec![first.clone()],
                others.to_vec(),
                first,
                "elect",
                format!("Make node {} Kubernetes leader", first.hostname),
            )]);
        }
        masters_root.add_sequential(vec![node]);

        for server in others {
            let mut node = self.node(server);
            node.add_sequential(self.common(server, Some(first)));
            node.add_sequential(vec![set_leader_election(
                vec![server.clone()],
                Vec::new(),
                server,
                "enable-elections",
                format!("Enable leader election on node {}", server.hostname),
            )]);
            masters_root.add_sequential(vec![node]);
        }

        Ok(masters_root)
    }

    /// Parent phase grouping all of one node's update phases
    fn node(&self, server: &Server) -> Phase {
        Phase::parent(
            &server.hostname,
            format!("Update configuration on node {}", server.hostname),
        )
    }

    /// The per-node phases every server runs, in execution order. Phases
    /// that go through kubectl accept an optional exec server to run from.
    fn common(&self, server: &Server, exec: Option<&Server>) -> Vec<Phase> {
        vec![
            self.drain(server, exec),
            self.restart(server),
            self.taint(server, exec),
            self.uncordon(server, exec),
            self.endpoints(server, exec),
            self.untaint(server, exec),
        ]
    }

    fn drain(&self, server: &Server, exec: Option<&Server>) -> Phase {
        Phase::leaf(
            "drain",
            ExecutorKind::Drain,
            format!("Drain node {}", server.hostname),
            node_data(server, exec),
        )
    }

    fn restart(&self, server: &Server) -> Phase {
        let mut data = node_data(server, None);
        data.package = Some(self.app.clone());
        Phase::leaf(
            "restart",
            ExecutorKind::RestartContainer,
            format!("Restart container on node {}", server.hostname),
            data,
        )
    }

    fn taint(&self, server: &Server, exec: Option<&Server>) -> Phase {
        Phase::leaf(
            "taint",
            ExecutorKind::Taint,
            format!("Taint node {}", server.hostname),
            node_data(server, exec),
        )
    }

    fn uncordon(&self, server: &Server, exec: Option<&Server>) -> Phase {
        Phase::leaf(
            "uncordon",
            ExecutorKind::Uncordon,
            format!("Uncordon node {}", server.hostname),
            node_data(server, exec),
        )
    }

    fn endpoints(&self, server: &Server, exec: Option<&Server>) -> Phase {
        Phase::leaf(
            "endpoints",
            ExecutorKind::Endpoints,
            format!("Wait for endpoints on node {}", server.hostname),
            node_data(server, exec),
        )
    }

    fn untaint(&self, server: &Server, exec: Option<&Server>) -> Phase {
        Phase::leaf(
            "untaint",
            ExecutorKind::Untaint,
            format!("Remove taint from node {}", server.hostname),
            node_data(server, exec),
        )
    }
}

fn node_data(server: &Server, exec: Option<&Server>) -> PhaseData {
    PhaseData {
        server: Some(server.clone()),
        exec_server: exec.cloned(),
        ..Default::default()
    }
}

/// Builds one leader-election phase carrying the enable/disable server sets
/// verbatim. No disjointness is enforced; applying the change must be safe
/// regardless of which node currently holds leadership.
fn set_leader_election(
    enable: Vec<Server>,
    disable: Vec<Server>,
    server: &Server,
    id: &str,
    description: String,
) -> Phase {
    Phase::leaf(
        id,
        ExecutorKind::Elections,
        description,
        PhaseData {
            server: Some(server.clone()),
            election_change: Some(ElectionChange {
                enable_servers: enable,
                disable_servers: disable,
            }),
            ..Default::default()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ServerRole;

    fn master(hostname: &str) -> Server {
        Server {
            hostname: hostname.to_string(),
            advertise_ip: "10.0.0.1".to_string(),
            role: ServerRole::Master,
        }
    }

    fn worker(hostname: &str) -> Server {
        Server {
            hostname: hostname.to_string(),
            advertise_ip: "10.0.0.2".to_string(),
            role: ServerRole::Node,
        }
    }

    fn builder(servers: Vec<Server>) -> PhaseBuilder {
        PhaseBuilder::new(Locator::new("app", "1.0.0"), servers)
    }

    fn child_ids(phase: &Phase) -> Vec<&str> {
        phase.phases.iter().map(|p| p.id.as_str()).collect()
    }

    fn last_segment(id: &str) -> &str {
        id.rsplit('/').next().unwrap()
    }

    fn hostnames(servers: &[Server]) -> Vec<&str> {
        servers.iter().map(|s| s.hostname.as_str()).collect()
    }

    fn election_change(phase: &Phase) -> &ElectionChange {
        phase
            .data
            .as_ref()
            .and_then(|data| data.election_change.as_ref())
            .expect("Should carry an election change")
    }

    // === Single master ===

    #[test]
    fn test_single_master_has_no_election_phases() {
        let masters = builder(vec![master("m1"), worker("n1")])
            .masters()
            .expect("Should build masters phase");

        assert_eq!(child_ids(&masters), vec!["/masters/m1"]);
        let sequence: Vec<_> = masters.phases[0]
            .phases
            .iter()
            .map(|p| last_segment(&p.id))
            .collect();
        assert_eq!(
            sequence,
            vec!["drain", "restart", "taint", "uncordon", "endpoints", "untaint"]
        );
    }

    #[test]
    fn test_single_master_sequence_is_chained() {
        let masters = builder(vec![master("m1")])
            .masters()
            .expect("Should build masters phase");

        let node = &masters.phases[0];
        assert!(node.phases[0].requires.is_empty());
        for pair in node.phases.windows(2) {
            assert_eq!(pair[1].requires, vec![pair[0].id.clone()]);
        }
    }

    // === Multiple masters ===

    #[test]
    fn test_multi_master_node_sequences_in_input_order() {
        let masters = builder(vec![master("m1"), master("m2"), master("m3")])
            .masters()
            .expect("Should build masters phase");

        assert_eq!(
            child_ids(&masters),
            vec!["/masters/m1", "/masters/m2", "/masters/m3"]
        );
        // Node sequences are serialized: each one waits for the previous
        assert!(masters.phases[0].requires.is_empty());
        assert_eq!(masters.phases[1].requires, vec!["/masters/m1".to_string()]);
        assert_eq!(masters.phases[2].requires, vec!["/masters/m2".to_string()]);
    }

    #[test]
    fn test_first_master_steps_down_then_reelects() {
        let masters = builder(vec![master("m1"), master("m2"), master("m3")])
            .masters()
            .expect("Should build masters phase");

        let first = &masters.phases[0];
        let sequence: Vec<_> = first.phases.iter().map(|p| last_segment(&p.id)).collect();
        assert_eq!(
            sequence,
            vec![
                "stepdown", "drain", "restart", "taint", "uncordon", "endpoints", "untaint",
                "elect"
            ]
        );

        let stepdown = election_change(&first.phases[0]);
        assert!(stepdown.enable_servers.is_empty());
        assert_eq!(hostnames(&stepdown.disable_servers), vec!["m1"]);

        let elect = election_change(first.phases.last().expect("Should have phases"));
        assert_eq!(hostnames(&elect.enable_servers), vec!["m1"]);
        assert_eq!(hostnames(&elect.disable_servers), vec!["m2", "m3"]);
    }

    #[test]
    fn test_other_masters_enable_only_themselves() {
        let masters = builder(vec![master("m1"), master("m2"), master("m3")])
            .masters()
            .expect("Should build masters phase");

        for (node, hostname) in masters.phases[1..].iter().zip(["m2", "m3"]) {
            let sequence: Vec<_> = node.phases.iter().map(|p| last_segment(&p.id)).collect();
            assert_eq!(
                sequence,
                vec![
                    "drain", "restart", "taint", "uncordon", "endpoints", "untaint",
                    "enable-elections"
                ]
            );
            let change = election_change(node.phases.last().expect("Should have phases"));
            assert_eq!(hostnames(&change.enable_servers), vec![hostname]);
            assert!(change.disable_servers.is_empty());
        }
    }

    #[test]
    fn test_other_masters_exec_through_first() {
        let masters = builder(vec![master("m1"), master("m2")])
            .masters()
            .expect("Should build masters phase");

        let drain = &masters.phases[1].phases[0];
        let data = drain.data.as_ref().expect("Should carry data");
        assert_eq!(
            data.exec_server.as_ref().map(|s| s.hostname.as_str()),
            Some("m1")
        );

        // the first master execs its own phases
        let first_drain = &masters.phases[0].phases[0];
        let data = first_drain.data.as_ref().expect("Should carry data");
        assert!(data.exec_server.is_none());
    }

    // === Error cases ===

    #[test]
    fn test_no_masters_is_an_error() {
        assert_eq!(
            builder(vec![worker("n1")]).masters().unwrap_err(),
            PlanError::NoMasters
        );
        assert_eq!(builder(Vec::new()).masters().unwrap_err(), PlanError::NoMasters);
    }

    // === Config phase ===

    #[test]
    fn test_config_phase_carries_package() {
        let config = builder(vec![master("m1")]).config();
        assert_eq!(config.id, "/update-config");
        assert_eq!(config.executor, Some(ExecutorKind::UpdateConfig));
        let data = config.data.as_ref().expect("Should carry data");
        assert_eq!(data.package, Some(Locator::new("app", "1.0.0")));
    }
}
