use tracing::debug;

use crate::{
    model::{
        device::Router,
        interface::{RouterInterface, SecondaryIp},
        route::{Route, RouteKind},
    },
    parsers::{
        ExtractionError, find_hostname, is_dotted_quad, is_number,
        stanza::{self, Stanza},
    },
};

/// Populates `router` from raw configuration text.
///
/// Idempotent for identical input. Malformed stanzas and lines are skipped,
/// leaving the device partially populated rather than failing the file.
pub fn extract(text: &str, router: &mut Router) -> Result<(), ExtractionError> {
    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyInput);
    }

    if let Some(hostname) = find_hostname(text) {
        router.hostname = hostname;
    }
    if let Some(model) = find_model(text) {
        router.model = model;
    }

    for stanza in stanza::scan(text, "interface") {
        let Some(name) = stanza.header_argument() else {
            continue;
        };
        router
            .interfaces
            .insert(name.to_string(), parse_interface(&stanza));
    }

    for stanza in stanza::scan(text, "router") {
        parse_routing_stanza(&stanza, router);
    }

    for line in text.lines() {
        if let Some(route) = parse_static_route(line.trim()) {
            router.routes.push(route);
        }
    }

    debug!(
        hostname = %router.hostname,
        interfaces = router.interfaces.len(),
        routes = router.routes.len(),
        "router extraction complete"
    );
    Ok(())
}

/// First four-digit token immediately preceding a `router` or `series`
/// token, e.g. a banner line `Cisco 2901 router` yields `Cisco 2901`.
fn find_model(text: &str) -> Option<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();
    for pair in tokens.windows(2) {
        let [number, keyword] = pair else { continue };
        if (*keyword == "router" || *keyword == "series")
            && number.len() == 4
            && is_number(number)
        {
            return Some(format!("Cisco {number}"));
        }
    }
    None
}

fn parse_interface(stanza: &Stanza) -> RouterInterface {
    let mut interface = RouterInterface {
        description: stanza.description(),
        shutdown: stanza.has_shutdown(),
        ..RouterInterface::default()
    };

    for line in &stanza.body {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_ascii_lowercase()).collect();
        let keys: Vec<&str> = lowered.iter().map(String::as_str).collect();

        match keys.as_slice() {
            ["ip", "address", ip, mask] if is_dotted_quad(ip) && is_dotted_quad(mask) => {
                // The first primary address wins; later ones are ignored.
                if interface.ip_address.is_none() {
                    interface.ip_address = Some((*ip).to_string());
                    interface.subnet_mask = Some((*mask).to_string());
                }
            }
            ["ip", "address", ip, mask, "secondary"]
                if is_dotted_quad(ip) && is_dotted_quad(mask) =>
            {
                interface.secondary_ips.push(SecondaryIp {
                    ip: (*ip).to_string(),
                    mask: (*mask).to_string(),
                });
            }
            ["bandwidth", value] if is_number(value) => {
                interface.bandwidth = Some(tokens[1].to_string());
            }
            ["duplex", _] => {
                interface.duplex = Some(tokens[1].to_string());
            }
            ["speed", value] if is_number(value) => {
                interface.speed = Some(tokens[1].to_string());
            }
            ["encapsulation", _, ..] => {
                interface.encapsulation = Some(tokens[1..].join(" "));
            }
            ["ip", "vrf", "forwarding", _] => {
                interface.vrf = Some(tokens[3].to_string());
            }
            ["vrf", "forwarding", _] => {
                interface.vrf = Some(tokens[2].to_string());
            }
            _ => {}
        }
    }

    interface
}

fn parse_routing_stanza(stanza: &Stanza, router: &mut Router) {
    let tokens: Vec<&str> = stanza.header.split_whitespace().collect();
    let [_, protocol, id] = tokens.as_slice() else {
        return;
    };
    if !is_number(id) {
        return;
    }

    match protocol.to_ascii_lowercase().as_str() {
        "ospf" => {
            router.ospf_process_id = Some((*id).to_string());
            router.routing_protocols.push(format!("ospf_{id}"));
            for line in &stanza.body {
                if let Some(route) = parse_ospf_network(line.trim()) {
                    router.routes.push(route);
                }
            }
        }
        "bgp" => {
            router.bgp_asn = Some((*id).to_string());
            router.routing_protocols.push(format!("bgp_{id}"));
        }
        // Other router stanzas (eigrp, rip) only matter to the classifier.
        _ => {}
    }
}

fn parse_ospf_network(line: &str) -> Option<Route> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [keyword, network, wildcard, area_keyword, area] = tokens.as_slice() else {
        return None;
    };
    if !keyword.eq_ignore_ascii_case("network") || !area_keyword.eq_ignore_ascii_case("area") {
        return None;
    }
    if !is_dotted_quad(network) || !is_dotted_quad(wildcard) || !is_number(area) {
        return None;
    }
    Some(Route {
        network: (*network).to_string(),
        mask: (*wildcard).to_string(),
        kind: RouteKind::Ospf,
        next_hop: None,
        area: Some((*area).to_string()),
        admin_distance: None,
    })
}

fn parse_static_route(line: &str) -> Option<Route> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 5 {
        return None;
    }
    if !tokens[0].eq_ignore_ascii_case("ip") || !tokens[1].eq_ignore_ascii_case("route") {
        return None;
    }
    let (network, mask, next_hop) = (tokens[2], tokens[3], tokens[4]);
    if !is_dotted_quad(network) || !is_dotted_quad(mask) {
        return None;
    }

    let kind = if network == "0.0.0.0" && mask == "0.0.0.0" {
        RouteKind::StaticDefault
    } else {
        RouteKind::Static
    };

    Some(Route {
        network: network.to_string(),
        mask: mask.to_string(),
        kind,
        next_hop: Some(next_hop.to_string()),
        area: None,
        admin_distance: tokens
            .get(5)
            .filter(|t| is_number(t))
            .map(|t| (*t).to_string()),
    })
}

mod tests {
    #[allow(unused_imports)]
    use super::*;

    #[test]
    fn test_extract_minimal_ospf_router() {
        let text = "hostname R1\ninterface Serial0/0\n ip address 10.1.1.1 255.255.255.252\n!\nrouter ospf 1\n network 10.1.1.0 0.0.0.3 area 0\n!";
        let mut router = Router::new();
        extract(text, &mut router).unwrap();

        assert_eq!(router.hostname, "R1");
        assert_eq!(router.routing_protocols, vec!["ospf_1".to_string()]);
        assert_eq!(router.ospf_process_id.as_deref(), Some("1"));

        let serial = &router.interfaces["Serial0/0"];
        assert_eq!(serial.ip_address.as_deref(), Some("10.1.1.1"));
        assert_eq!(serial.subnet_mask.as_deref(), Some("255.255.255.252"));

        assert_eq!(router.routes.len(), 1);
        let route = &router.routes[0];
        assert_eq!(route.network, "10.1.1.0");
        assert_eq!(route.mask, "0.0.0.3");
        assert_eq!(route.kind, RouteKind::Ospf);
        assert_eq!(route.area.as_deref(), Some("0"));
    }

    #[test]
    fn test_extract_full_fixture() {
        let text = include_str!("../../test_data/r1_config.txt");
        let mut router = Router::new();
        extract(text, &mut router).unwrap();

        assert_eq!(router.hostname, "R1");
        assert_eq!(router.model, "Cisco 2901");
        assert_eq!(router.bgp_asn.as_deref(), Some("65001"));
        assert_eq!(
            router.routing_protocols,
            vec!["ospf_1".to_string(), "bgp_65001".to_string()]
        );

        let serial = &router.interfaces["Serial0/0"];
        assert_eq!(serial.description.as_deref(), Some("WAN link to R2"));
        assert_eq!(serial.bandwidth.as_deref(), Some("1544"));
        assert_eq!(serial.encapsulation.as_deref(), Some("ppp"));
        assert!(!serial.shutdown);

        let lan = &router.interfaces["GigabitEthernet0/0"];
        assert_eq!(lan.duplex.as_deref(), Some("full"));
        assert_eq!(lan.speed.as_deref(), Some("1000"));
        assert_eq!(lan.secondary_ips.len(), 1);
        assert_eq!(lan.secondary_ips[0].ip, "192.168.20.1");
        assert_eq!(lan.vrf.as_deref(), Some("CUSTOMER-A"));

        let unused = &router.interfaces["GigabitEthernet0/1"];
        assert!(unused.shutdown);
        assert!(unused.ip_address.is_none());
    }

    #[test]
    fn test_default_route_is_tagged_once() {
        let text = "hostname R9\nip route 0.0.0.0 0.0.0.0 10.1.1.2\nip route 192.168.50.0 255.255.255.0 10.1.1.2 200\n";
        let mut router = Router::new();
        extract(text, &mut router).unwrap();

        assert_eq!(router.routes.len(), 2);
        assert_eq!(router.routes[0].kind, RouteKind::StaticDefault);
        assert_eq!(router.routes[0].next_hop.as_deref(), Some("10.1.1.2"));
        assert_eq!(router.routes[0].admin_distance, None);
        assert_eq!(router.routes[1].kind, RouteKind::Static);
        assert_eq!(router.routes[1].admin_distance.as_deref(), Some("200"));
    }

    #[test]
    fn test_static_route_with_exit_interface_next_hop() {
        let mut router = Router::new();
        extract("ip route 172.16.0.0 255.255.0.0 Serial0/0\n", &mut router).unwrap();
        assert_eq!(router.routes.len(), 1);
        assert_eq!(router.routes[0].next_hop.as_deref(), Some("Serial0/0"));
    }

    #[test]
    fn test_zero_interface_text_is_not_a_failure() {
        let mut router = Router::new();
        extract("hostname lonely\n", &mut router).unwrap();
        assert!(router.interfaces.is_empty());
        assert_eq!(router.hostname, "lonely");
    }

    #[test]
    fn test_empty_text_fails() {
        let mut router = Router::new();
        assert_eq!(
            extract("  \n \n", &mut router),
            Err(ExtractionError::EmptyInput)
        );
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "interface Serial0/1\n ip address 10.1.1 255.255.255.0\n bandwidth lots\n!\nip route 10.0.0.0 255.0.0.0\n";
        let mut router = Router::new();
        extract(text, &mut router).unwrap();

        let serial = &router.interfaces["Serial0/1"];
        assert!(serial.ip_address.is_none());
        assert!(serial.bandwidth.is_none());
        assert!(router.routes.is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = include_str!("../../test_data/r1_config.txt");

        let mut first = Router::new();
        extract(text, &mut first).unwrap();
        let mut second = Router::new();
        extract(text, &mut second).unwrap();

        assert_eq!(first, second);
    }
}
