use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};

/// How a route entered the device configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Static,
    StaticDefault,
    Ospf,
}

/// A single routing-table entry extracted from a router configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub network: String,
    pub mask: String,
    pub kind: RouteKind,
    /// Next hop for static routes; an address or an exit interface name.
    pub next_hop: Option<String>,
    /// OSPF area for routes learned from `network ... area` statements.
    pub area: Option<String>,
    pub admin_distance: Option<String>,
}

impl Route {
    /// Normalizes the network/mask pair into a CIDR prefix.
    ///
    /// Static routes carry netmasks (255.255.255.252), OSPF `network`
    /// statements carry wildcard masks (0.0.0.3); the wildcard form is
    /// inverted before conversion.
    pub fn to_network(&self) -> Option<Ipv4Network> {
        let addr: Ipv4Addr = self.network.parse().ok()?;
        let mask: Ipv4Addr = self.mask.parse().ok()?;
        let raw = Ipv4Network::with_netmask(addr, mask).or_else(|_| {
            let inverted = Ipv4Addr::from(!u32::from(mask));
            Ipv4Network::with_netmask(addr, inverted)
        });
        let raw = raw.ok()?;
        Ipv4Network::new(raw.network(), raw.prefix()).ok()
    }
}

mod tests {
    #[allow(unused_imports)]
    use super::*;

    #[allow(dead_code)]
    fn route(network: &str, mask: &str, kind: RouteKind) -> Route {
        Route {
            network: network.to_string(),
            mask: mask.to_string(),
            kind,
            next_hop: None,
            area: None,
            admin_distance: None,
        }
    }

    #[test]
    fn test_netmask_route_normalizes() {
        let r = route("192.168.10.5", "255.255.255.0", RouteKind::Static);
        assert_eq!(r.to_network().unwrap().to_string(), "192.168.10.0/24");
    }

    #[test]
    fn test_wildcard_mask_is_inverted() {
        let r = route("10.1.1.0", "0.0.0.3", RouteKind::Ospf);
        assert_eq!(r.to_network().unwrap().to_string(), "10.1.1.0/30");
    }

    #[test]
    fn test_default_route_is_the_zero_prefix() {
        let r = route("0.0.0.0", "0.0.0.0", RouteKind::StaticDefault);
        assert_eq!(r.to_network().unwrap().to_string(), "0.0.0.0/0");
    }

    #[test]
    fn test_garbage_mask_yields_none() {
        let r = route("10.1.1.0", "0.3.0.3", RouteKind::Ospf);
        assert!(r.to_network().is_none());
    }
}
