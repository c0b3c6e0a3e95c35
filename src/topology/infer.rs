/*!
Two-pass topology inference over a set of extracted devices.

Pass 1 links interfaces whose addresses share a subnet, which is the most
reliable signal a configuration carries. Pass 2 falls back to hostname
mentions in interface descriptions for pairs the subnet pass left
unconnected. The passes only read the devices; the resulting graph borrows
them.
*/

use std::net::Ipv4Addr;

use tracing::{debug, info};

use crate::{
    model::device::Device,
    topology::graph::{LinkInfo, TopologyGraph},
};

/// Derives the inferred-link graph for a set of extracted devices.
///
/// Idempotent: running it twice over the same input yields the same edge
/// set. Fewer than two devices simply produce a graph without edges, and
/// devices nothing matches remain isolated nodes.
pub fn infer(devices: &[Device]) -> TopologyGraph<'_> {
    let mut graph = TopologyGraph::new();
    for device in devices {
        graph.add_node(device);
    }

    info!(
        devices = devices.len(),
        "inferring links from subnets and descriptions"
    );

    subnet_pass(devices, &mut graph);
    description_pass(devices, &mut graph);

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "topology inference complete"
    );
    graph
}

/// Links every interface with a configured network to the first interface
/// of another device whose address falls inside it.
fn subnet_pass<'a>(devices: &'a [Device], graph: &mut TopologyGraph<'a>) {
    for (i, device1) in devices.iter().enumerate() {
        for view1 in device1.interface_views() {
            let Some(network) = view1.network else {
                continue;
            };
            for (j, device2) in devices.iter().enumerate() {
                if i == j {
                    continue;
                }
                for view2 in device2.interface_views() {
                    let Some(ip) = view2.ip_address else {
                        continue;
                    };
                    let Ok(address) = ip.parse::<Ipv4Addr>() else {
                        continue;
                    };
                    if !network.contains(address) {
                        continue;
                    }
                    let added = graph.add_edge(
                        device1.hostname(),
                        device2.hostname(),
                        Some(LinkInfo {
                            interface1: view1.name.to_string(),
                            interface2: view2.name.to_string(),
                            network,
                        }),
                    );
                    if added {
                        debug!(
                            device1 = %device1.hostname(),
                            interface1 = view1.name,
                            device2 = %device2.hostname(),
                            interface2 = view2.name,
                            network = %network,
                            "linked by shared subnet"
                        );
                    }
                    // Stop at the first matching interface on device2 for
                    // this (device1, interface1) pair; overlapping fallback
                    // addressing would otherwise produce spurious links.
                    break;
                }
            }
        }
    }
}

/// Links devices whose hostname appears in another device's interface
/// description, for pairs the subnet pass left unconnected.
fn description_pass<'a>(devices: &'a [Device], graph: &mut TopologyGraph<'a>) {
    for device in devices {
        for view in device.interface_views() {
            let Some(description) = view.description else {
                continue;
            };
            let description = description.to_lowercase();
            for other in devices {
                if other.hostname() == device.hostname() {
                    continue;
                }
                if !description.contains(&other.hostname().to_lowercase()) {
                    continue;
                }
                if graph.has_edge(device.hostname(), other.hostname()) {
                    continue;
                }
                if graph.add_edge(device.hostname(), other.hostname(), None) {
                    debug!(
                        device1 = %device.hostname(),
                        device2 = %other.hostname(),
                        interface = view.name,
                        "linked by description mention"
                    );
                    break;
                }
            }
        }
    }
}

mod tests {
    #[allow(unused_imports)]
    use super::*;
    #[allow(unused_imports)]
    use crate::model::{
        device::{Router, Switch},
        interface::{RouterInterface, SwitchInterface},
    };

    #[allow(dead_code)]
    fn router_with_interface(hostname: &str, interface: &str, ip: &str, mask: Option<&str>) -> Device {
        let mut router = Router::new();
        router.hostname = hostname.to_string();
        router.interfaces.insert(
            interface.to_string(),
            RouterInterface {
                ip_address: Some(ip.to_string()),
                subnet_mask: mask.map(|m| m.to_string()),
                ..Default::default()
            },
        );
        Device::Router(router)
    }

    #[test]
    fn test_shared_subnet_yields_one_edge() {
        let a = router_with_interface("A", "Serial0/0", "10.0.0.1", Some("255.255.255.252"));
        let b = router_with_interface("B", "Serial0/1", "10.0.0.2", None);
        let devices = [a, b];

        let graph = infer(&devices);
        assert_eq!(graph.edge_count(), 1);

        let (key, info) = graph.edges().next().unwrap();
        assert_eq!(key.endpoints(), ("A", "B"));
        let info = info.unwrap();
        assert_eq!(info.interface1, "Serial0/0");
        assert_eq!(info.interface2, "Serial0/1");
        assert_eq!(info.network.to_string(), "10.0.0.0/30");
    }

    #[test]
    fn test_disjoint_subnets_yield_no_edge() {
        let a = router_with_interface("A", "Serial0/0", "10.0.0.1", Some("255.255.255.252"));
        let b = router_with_interface("B", "Serial0/1", "172.16.0.1", Some("255.255.255.252"));
        let devices = [a, b];

        let graph = infer(&devices);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.neighbors("A").is_empty());
    }

    #[test]
    fn test_subnet_pass_wins_over_description() {
        let mut r1 = Router::new();
        r1.hostname = "R1".to_string();
        r1.interfaces.insert(
            "Serial0/0".to_string(),
            RouterInterface {
                description: Some("link to R2".to_string()),
                ip_address: Some("10.1.1.1".to_string()),
                subnet_mask: Some("255.255.255.252".to_string()),
                ..Default::default()
            },
        );
        let mut r2 = Router::new();
        r2.hostname = "R2".to_string();
        r2.interfaces.insert(
            "Serial0/0".to_string(),
            RouterInterface {
                description: Some("link to R1".to_string()),
                ip_address: Some("10.1.1.2".to_string()),
                subnet_mask: Some("255.255.255.252".to_string()),
                ..Default::default()
            },
        );
        let devices = [Device::Router(r1), Device::Router(r2)];

        let graph = infer(&devices);
        assert_eq!(graph.edge_count(), 1);
        let (_, info) = graph.edges().next().unwrap();
        assert!(info.is_some(), "subnet metadata must survive the fallback pass");
    }

    #[test]
    fn test_description_fallback_links_switch_to_router() {
        let router = router_with_interface("R1", "Gi0/0", "192.168.10.1", Some("255.255.255.0"));

        let mut switch = Switch::new();
        switch.hostname = "SW1".to_string();
        switch.interfaces.insert(
            "Gi0/1".to_string(),
            SwitchInterface {
                description: Some("Uplink to r1".to_string()),
                ..Default::default()
            },
        );
        let devices = [router, Device::Switch(switch)];

        let graph = infer(&devices);
        assert_eq!(graph.edge_count(), 1);
        let (key, info) = graph.edges().next().unwrap();
        assert_eq!(key.endpoints(), ("R1", "SW1"));
        assert!(info.is_none(), "description links carry no metadata");
    }

    #[test]
    fn test_single_device_has_no_edges() {
        let devices = [router_with_interface(
            "A",
            "Serial0/0",
            "10.0.0.1",
            Some("255.255.255.252"),
        )];
        let graph = infer(&devices);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_inference_is_idempotent() {
        let a = router_with_interface("A", "Serial0/0", "10.0.0.1", Some("255.255.255.252"));
        let b = router_with_interface("B", "Serial0/1", "10.0.0.2", Some("255.255.255.252"));
        let devices = [a, b];

        let first: Vec<_> = infer(&devices)
            .edges()
            .map(|(key, info)| (key.endpoints(), info.cloned()))
            .collect();
        let second: Vec<_> = infer(&devices)
            .edges()
            .map(|(key, info)| (key.endpoints(), info.cloned()))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fixture_pair_links_over_wan_subnet() {
        use crate::parsers;

        let mut r1 = Router::new();
        parsers::router::extract(include_str!("../../test_data/r1_config.txt"), &mut r1).unwrap();
        let mut r2 = Router::new();
        parsers::router::extract(include_str!("../../test_data/r2_config.txt"), &mut r2).unwrap();
        let devices = [Device::Router(r1), Device::Router(r2)];

        let graph = infer(&devices);
        assert!(graph.has_edge("R1", "R2"));
        assert_eq!(graph.edge_count(), 1);
        let (_, info) = graph.edges().next().unwrap();
        assert_eq!(info.unwrap().network.to_string(), "10.1.1.0/30");
    }
}
