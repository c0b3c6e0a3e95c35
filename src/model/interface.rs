use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};

/// One switched port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchInterface {
    pub description: Option<String>,
    /// Port mode as configured (access, trunk, ...).
    pub mode: Option<String>,
    pub access_vlan: Option<String>,
    pub shutdown: bool,
}

/// One routed interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterInterface {
    pub description: Option<String>,
    pub shutdown: bool,
    /// Primary address. Both fields are set together or not at all.
    pub ip_address: Option<String>,
    pub subnet_mask: Option<String>,
    /// Additional addresses from `ip address ... secondary` lines, in
    /// configuration order.
    pub secondary_ips: Vec<SecondaryIp>,
    pub bandwidth: Option<String>,
    pub duplex: Option<String>,
    pub speed: Option<String>,
    pub encapsulation: Option<String>,
    pub vrf: Option<String>,
}

impl RouterInterface {
    /// CIDR network derived from the primary address, if one is configured
    /// and both parts parse as dotted quads. The returned prefix is
    /// normalized to its network address (10.1.1.1/255.255.255.252 becomes
    /// 10.1.1.0/30).
    pub fn network(&self) -> Option<Ipv4Network> {
        let ip: Ipv4Addr = self.ip_address.as_deref()?.parse().ok()?;
        let mask: Ipv4Addr = self.subnet_mask.as_deref()?.parse().ok()?;
        let raw = Ipv4Network::with_netmask(ip, mask).ok()?;
        Ipv4Network::new(raw.network(), raw.prefix()).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryIp {
    pub ip: String,
    pub mask: String,
}

mod tests {
    #[allow(unused_imports)]
    use super::*;

    #[test]
    fn test_primary_network_is_normalized() {
        let interface = RouterInterface {
            ip_address: Some("10.1.1.1".to_string()),
            subnet_mask: Some("255.255.255.252".to_string()),
            ..RouterInterface::default()
        };
        let network = interface.network().unwrap();
        assert_eq!(network.to_string(), "10.1.1.0/30");
    }

    #[test]
    fn test_network_requires_both_parts() {
        let interface = RouterInterface {
            ip_address: Some("10.1.1.1".to_string()),
            ..RouterInterface::default()
        };
        assert!(interface.network().is_none());

        let garbled = RouterInterface {
            ip_address: Some("10.1.1.1".to_string()),
            subnet_mask: Some("not-a-mask".to_string()),
            ..RouterInterface::default()
        };
        assert!(garbled.network().is_none());
    }
}
