use std::collections::{BTreeMap, BTreeSet};

use ipnetwork::Ipv4Network;
use serde::{Serialize, ser::SerializeStruct};
use tracing::warn;

use crate::model::device::{Device, DeviceRole};

/// Unordered hostname pair identifying one inferred link. Endpoints are
/// stored sorted so both directions map to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey<'a> {
    a: &'a str,
    b: &'a str,
}

impl<'a> EdgeKey<'a> {
    pub fn new(a: &'a str, b: &'a str) -> Self {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        EdgeKey { a, b }
    }

    pub fn endpoints(&self) -> (&'a str, &'a str) {
        (self.a, self.b)
    }
}

/// Metadata attached to a link found by the subnet pass. Links from the
/// description pass carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkInfo {
    pub interface1: String,
    pub interface2: String,
    pub network: Ipv4Network,
}

/// A node of the inferred topology: the device role plus a borrow of the
/// extracted record. The graph never copies or mutates devices.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TopologyNode<'a> {
    pub role: DeviceRole,
    pub device: &'a Device,
}

/// Undirected graph of inferred links, keyed by hostname.
///
/// Deliberately small: inference needs insertion, an edge-existence check
/// and iteration, so the adjacency map and the edge side table are kept
/// directly instead of going through a graph library. No self-loops; at
/// most one edge per unordered pair.
#[derive(Debug, Default)]
pub struct TopologyGraph<'a> {
    nodes: BTreeMap<&'a str, TopologyNode<'a>>,
    adjacency: BTreeMap<&'a str, BTreeSet<&'a str>>,
    edges: BTreeMap<EdgeKey<'a>, Option<LinkInfo>>,
}

impl<'a> TopologyGraph<'a> {
    pub fn new() -> Self {
        TopologyGraph::default()
    }

    /// Adds a device node. The first device claiming a hostname keeps it;
    /// later claimants are dropped rather than silently merged.
    pub fn add_node(&mut self, device: &'a Device) -> bool {
        let hostname = device.hostname();
        if self.nodes.contains_key(hostname) {
            warn!(hostname, "duplicate hostname in input set, node dropped");
            return false;
        }
        self.nodes.insert(
            hostname,
            TopologyNode {
                role: device.role(),
                device,
            },
        );
        self.adjacency.entry(hostname).or_default();
        true
    }

    /// Inserts an undirected edge between two known nodes. Self-loops are
    /// rejected, and the first link recorded for a pair wins; later inserts
    /// for the same pair merge into it. Returns whether the edge is new.
    pub fn add_edge(&mut self, a: &'a str, b: &'a str, info: Option<LinkInfo>) -> bool {
        if a == b || !self.nodes.contains_key(a) || !self.nodes.contains_key(b) {
            return false;
        }
        let key = EdgeKey::new(a, b);
        if self.edges.contains_key(&key) {
            return false;
        }
        self.adjacency.entry(key.a).or_default().insert(key.b);
        self.adjacency.entry(key.b).or_default().insert(key.a);
        self.edges.insert(key, info);
        true
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.adjacency
            .get(a)
            .is_some_and(|neighbors| neighbors.contains(b))
    }

    pub fn node(&self, hostname: &str) -> Option<&TopologyNode<'a>> {
        self.nodes.get(hostname)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&'a str, &TopologyNode<'a>)> {
        self.nodes.iter().map(|(hostname, node)| (*hostname, node))
    }

    /// Every inferred link with its optional metadata, in key order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey<'a>, Option<&LinkInfo>)> {
        self.edges.iter().map(|(key, info)| (*key, info.as_ref()))
    }

    pub fn neighbors(&self, hostname: &str) -> Vec<&'a str> {
        self.adjacency
            .get(hostname)
            .map(|neighbors| neighbors.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

// Edges are keyed by a struct, which JSON maps cannot express, so the
// graph serializes them as a record list instead.
impl Serialize for TopologyGraph<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        struct EdgeRecord<'a> {
            device1: &'a str,
            device2: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            link: Option<&'a LinkInfo>,
        }

        let edges: Vec<EdgeRecord<'_>> = self
            .edges
            .iter()
            .map(|(key, info)| EdgeRecord {
                device1: key.a,
                device2: key.b,
                link: info.as_ref(),
            })
            .collect();

        let mut st = serializer.serialize_struct("TopologyGraph", 2)?;
        st.serialize_field("nodes", &self.nodes)?;
        st.serialize_field("edges", &edges)?;
        st.end()
    }
}

mod tests {
    #[allow(unused_imports)]
    use super::*;
    #[allow(unused_imports)]
    use crate::model::device::{Router, Switch};

    #[allow(dead_code)]
    fn router(hostname: &str) -> Device {
        let mut router = Router::new();
        router.hostname = hostname.to_string();
        Device::Router(router)
    }

    #[test]
    fn test_edge_key_is_direction_free() {
        assert_eq!(EdgeKey::new("R1", "R2"), EdgeKey::new("R2", "R1"));
        assert_eq!(EdgeKey::new("R2", "R1").endpoints(), ("R1", "R2"));
    }

    #[test]
    fn test_self_loops_and_duplicates_are_rejected() {
        let devices = [router("R1"), router("R2")];
        let mut graph = TopologyGraph::new();
        for device in &devices {
            assert!(graph.add_node(device));
        }

        assert!(!graph.add_edge("R1", "R1", None));
        assert!(graph.add_edge("R1", "R2", None));
        assert!(!graph.add_edge("R2", "R1", None));
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_edge("R2", "R1"));
    }

    #[test]
    fn test_first_link_for_a_pair_wins() {
        let devices = [router("R1"), router("R2")];
        let mut graph = TopologyGraph::new();
        for device in &devices {
            graph.add_node(device);
        }

        let info = LinkInfo {
            interface1: "Serial0/0".to_string(),
            interface2: "Serial0/1".to_string(),
            network: "10.1.1.0/30".parse().unwrap(),
        };
        assert!(graph.add_edge("R1", "R2", Some(info.clone())));
        assert!(!graph.add_edge("R1", "R2", None));

        let (_, stored) = graph.edges().next().unwrap();
        assert_eq!(stored, Some(&info));
    }

    #[test]
    fn test_duplicate_hostname_keeps_first_node() {
        let first = router("R1");
        let second = router("R1");
        let mut graph = TopologyGraph::new();
        assert!(graph.add_node(&first));
        assert!(!graph.add_node(&second));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_edges_to_unknown_nodes_are_rejected() {
        let device = router("R1");
        let mut graph = TopologyGraph::new();
        graph.add_node(&device);
        assert!(!graph.add_edge("R1", "ghost", None));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_graph_serializes_edges_as_records() {
        let devices = [router("R1"), router("R2")];
        let mut graph = TopologyGraph::new();
        for device in &devices {
            graph.add_node(device);
        }
        graph.add_edge("R1", "R2", None);

        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["edges"][0]["device1"], "R1");
        assert_eq!(json["edges"][0]["device2"], "R2");
        assert!(json["nodes"]["R1"]["role"].is_string());
    }
}
