/*
 * Role-specific extractors that turn raw configuration text into the
 * structured device model. Both are built on the stanza scanner: segment
 * the text first, then run per-field matchers inside each stanza's
 * bounded lines.
 */

pub mod router;
pub mod stanza;
pub mod switch;

use std::net::Ipv4Addr;

use thiserror::Error;

/// Structural extraction failures. Malformed stanzas and lines are skipped
/// silently, leaving the device partially populated; this error covers
/// input the extractors cannot work with at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("configuration text is empty")]
    EmptyInput,
}

/// First `hostname <token>` line, matched on case-insensitive tokens.
pub(crate) fn find_hostname(text: &str) -> Option<String> {
    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next().is_some_and(|t| t.eq_ignore_ascii_case("hostname")) {
            if let Some(name) = tokens.next() {
                return Some(name.to_string());
            }
        }
    }
    None
}

pub(crate) fn is_dotted_quad(token: &str) -> bool {
    token.parse::<Ipv4Addr>().is_ok()
}

pub(crate) fn is_number(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

mod tests {
    #[allow(unused_imports)]
    use super::*;

    #[test]
    fn test_find_hostname_takes_first_match() {
        let text = "!\nHOSTNAME R1\nhostname R2\n";
        assert_eq!(find_hostname(text), Some("R1".to_string()));
        assert_eq!(find_hostname("no name here\n"), None);
    }

    #[test]
    fn test_dotted_quad_validation() {
        assert!(is_dotted_quad("10.1.1.1"));
        assert!(is_dotted_quad("255.255.255.252"));
        assert!(!is_dotted_quad("10.1.1"));
        assert!(!is_dotted_quad("10.1.1.256"));
        assert!(!is_dotted_quad("next-hop"));
    }
}
