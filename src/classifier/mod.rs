/*!
Device-role classification.

Scores raw configuration text against fixed keyword indicator sets and
picks a role. The tables are plain data handed to the classifier at
construction, so tests can substitute alternate sets; the built-in table
covers the common Cisco-style vocabulary.
*/

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::model::device::DeviceRole;

/// Keyword indicator tables driving classification. All matching is done
/// as case-insensitive substring containment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Strong switch evidence, one score point per hit.
    pub switch_indicators: Vec<String>,
    /// Strong router evidence, one score point per hit.
    pub router_indicators: Vec<String>,
    /// Coarse routing-protocol keywords for the first tie-break.
    pub routing_keywords: Vec<String>,
    /// Coarse switching keywords for the first tie-break.
    pub switching_keywords: Vec<String>,
    /// Interface-type hints for the final tie-break.
    pub router_interface_hints: Vec<String>,
    pub switch_interface_hints: Vec<String>,
}

static BUILTIN_CONFIG: Lazy<ClassifierConfig> = Lazy::new(|| ClassifierConfig {
    switch_indicators: to_owned(&[
        "switchport",
        "spanning-tree",
        "vtp mode",
        "vlan database",
        "show mac address-table",
    ]),
    router_indicators: to_owned(&[
        "router ospf",
        "router bgp",
        "router eigrp",
        "ip route ",
        "interface serial",
        "ppp authentication",
        "frame-relay",
        "ip nat",
        "ipsec",
        "crypto map",
    ]),
    routing_keywords: to_owned(&["ospf", "bgp", "eigrp", "rip"]),
    switching_keywords: to_owned(&["vlan", "switchport"]),
    router_interface_hints: to_owned(&["interface serial", "interface tunnel"]),
    switch_interface_hints: to_owned(&["interface vlan", "interface port-channel"]),
});

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        BUILTIN_CONFIG.clone()
    }
}

/// Decides the device role of one configuration dump.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Classifier { config }
    }

    /// Classifies one configuration text. Deterministic, single-pass and
    /// infallible; input without a usable signal resolves to
    /// `DeviceRole::Unknown`.
    pub fn classify(&self, text: &str) -> DeviceRole {
        let text = text.to_lowercase();

        let switch_score = count_hits(&text, &self.config.switch_indicators);
        let router_score = count_hits(&text, &self.config.router_indicators);

        if router_score > switch_score {
            return DeviceRole::Router;
        }
        if switch_score > router_score {
            return DeviceRole::Switch;
        }

        // Tied scores: a routing protocol mentioned without any switching
        // vocabulary (or the reverse) still decides the role.
        let has_routing = any_hit(&text, &self.config.routing_keywords);
        let has_switching = any_hit(&text, &self.config.switching_keywords);
        if has_routing && !has_switching {
            return DeviceRole::Router;
        }
        if has_switching && !has_routing {
            return DeviceRole::Switch;
        }

        // Last resort: interface types only one role would carry.
        if any_hit(&text, &self.config.router_interface_hints) {
            return DeviceRole::Router;
        }
        if any_hit(&text, &self.config.switch_interface_hints) {
            return DeviceRole::Switch;
        }

        DeviceRole::Unknown
    }
}

fn count_hits(text: &str, indicators: &[String]) -> usize {
    indicators
        .iter()
        .filter(|indicator| text.contains(indicator.as_str()))
        .count()
}

fn any_hit(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword.as_str()))
}

mod tests {
    #[allow(unused_imports)]
    use super::*;

    #[test]
    fn test_switch_indicators_win() {
        let classifier = Classifier::default();
        let text = "hostname SW1\nvtp mode transparent\ninterface Fa0/1\n switchport mode access\n";
        assert_eq!(classifier.classify(text), DeviceRole::Switch);
    }

    #[test]
    fn test_router_indicators_win() {
        let classifier = Classifier::default();
        let text = "hostname R1\ninterface Serial0/0\n!\nrouter ospf 1\n network 10.0.0.0 0.0.0.3 area 0\n";
        assert_eq!(classifier.classify(text), DeviceRole::Router);
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        let classifier = Classifier::default();
        let text = "HOSTNAME SW1\nSWITCHPORT MODE ACCESS\nSPANNING-TREE PORTFAST\n";
        assert_eq!(classifier.classify(text), DeviceRole::Switch);
    }

    #[test]
    fn test_tied_scores_fall_back_to_protocol_keywords() {
        let classifier = Classifier::default();
        // No strong indicator on either side, but a routing protocol is
        // mentioned and nothing switch-like is.
        assert_eq!(
            classifier.classify("redistribute rip metric 5\n"),
            DeviceRole::Router
        );
        // Symmetric case: "vlan 20" alone scores zero on both sides.
        assert_eq!(classifier.classify("vlan 20\n name users\n"), DeviceRole::Switch);
    }

    #[test]
    fn test_tied_scores_fall_back_to_interface_hints() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("interface Tunnel0\n"), DeviceRole::Router);
        assert_eq!(
            classifier.classify("interface Port-channel1\n"),
            DeviceRole::Switch
        );
    }

    #[test]
    fn test_no_signal_is_unknown() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("hostname pc-1\nntp server 10.0.0.1\n"), DeviceRole::Unknown);
        assert_eq!(classifier.classify(""), DeviceRole::Unknown);
    }

    #[test]
    fn test_alternate_indicator_tables() {
        let mut config = ClassifierConfig::default();
        config.switch_indicators = vec!["bridge-group".to_string()];
        let classifier = Classifier::new(config);
        assert_eq!(classifier.classify("bridge-group 1\n"), DeviceRole::Switch);
    }
}
