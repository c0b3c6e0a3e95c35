use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
};

use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};

use crate::model::{
    interface::{RouterInterface, SwitchInterface},
    route::Route,
};

const UNKNOWN: &str = "Unknown";

/// Role assigned to a configuration file by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceRole {
    Switch,
    Router,
    Unknown,
}

impl Display for DeviceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceRole::Switch => write!(f, "Switch"),
            DeviceRole::Router => write!(f, "Router"),
            DeviceRole::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A network device reconstructed from one configuration dump.
///
/// Closed over the two supported roles; consumers match exhaustively
/// instead of probing for role-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Device {
    Switch(Switch),
    Router(Router),
}

impl Device {
    pub fn role(&self) -> DeviceRole {
        match self {
            Device::Switch(_) => DeviceRole::Switch,
            Device::Router(_) => DeviceRole::Router,
        }
    }

    pub fn hostname(&self) -> &str {
        match self {
            Device::Switch(switch) => &switch.hostname,
            Device::Router(router) => &router.hostname,
        }
    }

    pub fn vendor(&self) -> &str {
        match self {
            Device::Switch(switch) => &switch.vendor,
            Device::Router(router) => &router.vendor,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Device::Switch(switch) => &switch.model,
            Device::Router(router) => &router.model,
        }
    }

    pub fn interface_count(&self) -> usize {
        match self {
            Device::Switch(switch) => switch.interfaces.len(),
            Device::Router(router) => router.interfaces.len(),
        }
    }

    /// Role-erased addressing/description view of every interface, in name
    /// order. Switch ports carry no addressing, only descriptions.
    pub fn interface_views(&self) -> Vec<InterfaceView<'_>> {
        match self {
            Device::Switch(switch) => switch
                .interfaces
                .iter()
                .map(|(name, interface)| InterfaceView {
                    name,
                    description: interface.description.as_deref(),
                    ip_address: None,
                    network: None,
                })
                .collect(),
            Device::Router(router) => router
                .interfaces
                .iter()
                .map(|(name, interface)| InterfaceView {
                    name,
                    description: interface.description.as_deref(),
                    ip_address: interface.ip_address.as_deref(),
                    network: interface.network(),
                })
                .collect(),
        }
    }
}

impl Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.vendor(), self.role(), self.hostname())
    }
}

/// What the inference passes need to know about one interface, regardless
/// of the owning device's role.
#[derive(Debug, Clone, Copy)]
pub struct InterfaceView<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub ip_address: Option<&'a str>,
    /// Normalized CIDR of the primary address, when one is configured.
    pub network: Option<Ipv4Network>,
}

/// A layer-2 switch and its extracted configuration state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    pub hostname: String,
    pub vendor: String,
    pub model: String,
    pub interfaces: BTreeMap<String, SwitchInterface>,
    /// Every VLAN id seen on an access port.
    pub vlans: BTreeSet<String>,
    pub stp_mode: Option<String>,
}

impl Switch {
    pub fn new() -> Self {
        Switch {
            hostname: UNKNOWN.to_string(),
            vendor: "Cisco".to_string(),
            model: UNKNOWN.to_string(),
            interfaces: BTreeMap::new(),
            vlans: BTreeSet::new(),
            stp_mode: None,
        }
    }
}

impl Default for Switch {
    fn default() -> Self {
        Switch::new()
    }
}

/// A router and its extracted configuration state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Router {
    pub hostname: String,
    pub vendor: String,
    pub model: String,
    pub interfaces: BTreeMap<String, RouterInterface>,
    /// Protocol tags in discovery order, e.g. `ospf_1`, `bgp_65000`.
    pub routing_protocols: Vec<String>,
    pub routes: Vec<Route>,
    pub bgp_asn: Option<String>,
    pub ospf_process_id: Option<String>,
}

impl Router {
    pub fn new() -> Self {
        Router {
            hostname: UNKNOWN.to_string(),
            vendor: "Cisco".to_string(),
            model: UNKNOWN.to_string(),
            interfaces: BTreeMap::new(),
            routing_protocols: Vec::new(),
            routes: Vec::new(),
            bgp_asn: None,
            ospf_process_id: None,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Router::new()
    }
}

mod tests {
    #[allow(unused_imports)]
    use super::*;

    #[test]
    fn test_display_matches_role() {
        let mut router = Router::new();
        router.hostname = "R1".to_string();
        let device = Device::Router(router);
        assert_eq!(device.to_string(), "Cisco Router: R1");

        let device = Device::Switch(Switch::new());
        assert_eq!(device.to_string(), "Cisco Switch: Unknown");
    }

    #[test]
    fn test_interface_views_are_name_ordered() {
        let mut router = Router::new();
        router.interfaces.insert(
            "Serial0/0".to_string(),
            crate::model::interface::RouterInterface {
                ip_address: Some("10.1.1.1".to_string()),
                subnet_mask: Some("255.255.255.252".to_string()),
                ..Default::default()
            },
        );
        router
            .interfaces
            .insert("GigabitEthernet0/0".to_string(), Default::default());

        let device = Device::Router(router);
        let views = device.interface_views();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].name, "GigabitEthernet0/0");
        assert_eq!(views[1].name, "Serial0/0");
        assert_eq!(views[1].network.unwrap().to_string(), "10.1.1.0/30");
    }
}
