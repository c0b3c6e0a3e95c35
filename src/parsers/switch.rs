use std::collections::BTreeSet;

use tracing::debug;

use crate::{
    model::{device::Switch, interface::SwitchInterface},
    parsers::{
        ExtractionError, find_hostname,
        stanza::{self, Stanza},
    },
};

/// Populates `switch` from raw configuration text. Same contract as the
/// router extractor: idempotent, and malformed stanzas are skipped.
pub fn extract(text: &str, switch: &mut Switch) -> Result<(), ExtractionError> {
    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyInput);
    }

    if let Some(hostname) = find_hostname(text) {
        switch.hostname = hostname;
    }
    if let Some(mode) = find_stp_mode(text) {
        switch.stp_mode = Some(mode);
    }

    for stanza in stanza::scan(text, "interface") {
        let Some(name) = stanza.header_argument() else {
            continue;
        };
        let interface = parse_interface(&stanza, &mut switch.vlans);
        switch.interfaces.insert(name.to_string(), interface);
    }

    debug!(
        hostname = %switch.hostname,
        interfaces = switch.interfaces.len(),
        vlans = switch.vlans.len(),
        "switch extraction complete"
    );
    Ok(())
}

/// First `spanning-tree mode <m>` line anywhere in the text.
fn find_stp_mode(text: &str) -> Option<String> {
    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if let [first, second, mode] = tokens.as_slice() {
            if first.eq_ignore_ascii_case("spanning-tree") && second.eq_ignore_ascii_case("mode") {
                return Some((*mode).to_string());
            }
        }
    }
    None
}

fn parse_interface(stanza: &Stanza, vlans: &mut BTreeSet<String>) -> SwitchInterface {
    let mut interface = SwitchInterface {
        description: stanza.description(),
        shutdown: stanza.has_shutdown(),
        ..SwitchInterface::default()
    };

    for line in &stanza.body {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_ascii_lowercase()).collect();
        let keys: Vec<&str> = lowered.iter().map(String::as_str).collect();

        match keys.as_slice() {
            ["switchport", "mode", _] => {
                interface.mode = Some(tokens[2].to_string());
            }
            ["switchport", "access", "vlan", _] => {
                let vlan_id = tokens[3].to_string();
                interface.access_vlan = Some(vlan_id.clone());
                vlans.insert(vlan_id);
            }
            _ => {}
        }
    }

    interface
}

mod tests {
    #[allow(unused_imports)]
    use super::*;

    #[test]
    fn test_extract_fixture() {
        let text = include_str!("../../test_data/sw1_config.txt");
        let mut switch = Switch::new();
        extract(text, &mut switch).unwrap();

        assert_eq!(switch.hostname, "SW1");
        assert_eq!(switch.stp_mode.as_deref(), Some("rapid-pvst"));
        assert_eq!(
            switch.vlans.iter().cloned().collect::<Vec<_>>(),
            vec!["10".to_string(), "20".to_string()]
        );

        let access = &switch.interfaces["FastEthernet0/1"];
        assert_eq!(access.mode.as_deref(), Some("access"));
        assert_eq!(access.access_vlan.as_deref(), Some("10"));
        assert!(!access.shutdown);

        let uplink = &switch.interfaces["GigabitEthernet0/1"];
        assert_eq!(uplink.mode.as_deref(), Some("trunk"));
        assert_eq!(uplink.description.as_deref(), Some("Uplink to R1"));
        assert!(uplink.access_vlan.is_none());

        let spare = &switch.interfaces["FastEthernet0/3"];
        assert!(spare.shutdown);
    }

    #[test]
    fn test_access_vlans_accumulate() {
        let text = "interface Fa0/1\n switchport access vlan 10\n!\ninterface Fa0/2\n switchport access vlan 30\n!\ninterface Fa0/3\n switchport access vlan 10\n!\n";
        let mut switch = Switch::new();
        extract(text, &mut switch).unwrap();

        assert_eq!(switch.vlans.len(), 2);
        assert!(switch.vlans.contains("10"));
        assert!(switch.vlans.contains("30"));
    }

    #[test]
    fn test_zero_interface_text_is_not_a_failure() {
        let mut switch = Switch::new();
        extract("hostname closet-sw\nvtp mode transparent\n", &mut switch).unwrap();
        assert!(switch.interfaces.is_empty());
        assert_eq!(switch.hostname, "closet-sw");
    }

    #[test]
    fn test_empty_text_fails() {
        let mut switch = Switch::new();
        assert_eq!(extract("", &mut switch), Err(ExtractionError::EmptyInput));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = include_str!("../../test_data/sw1_config.txt");

        let mut first = Switch::new();
        extract(text, &mut first).unwrap();
        let mut second = Switch::new();
        extract(text, &mut second).unwrap();

        assert_eq!(first, second);
    }
}
