/*!
Line scanner that segments configuration text into stanzas before any
field matching runs.

A stanza opens at a top-level line whose first token matches the requested
keyword and collects the indented lines that follow. A `!` separator, an
`end` line, or the next top-level command closes it. Keeping segmentation
separate from field matching means a malformed stanza only loses its own
fields, never the rest of the file.
*/

/// A contiguous run of configuration lines describing one block: the
/// header line plus its indented body. Body lines keep their original
/// indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stanza {
    pub header: String,
    pub body: Vec<String>,
}

impl Stanza {
    /// Second header token, e.g. the interface name of `interface Gi0/1`.
    pub fn header_argument(&self) -> Option<&str> {
        self.header.split_whitespace().nth(1)
    }

    /// True if the body contains a bare `shutdown` line. A `no shutdown`
    /// line does not count.
    pub fn has_shutdown(&self) -> bool {
        self.body
            .iter()
            .any(|line| line.trim().eq_ignore_ascii_case("shutdown"))
    }

    /// First `description` line of the body. Following lines indented more
    /// deeply than the description line itself are folded in as wrapped
    /// continuations.
    pub fn description(&self) -> Option<String> {
        for (idx, line) in self.body.iter().enumerate() {
            let Some(rest) = strip_keyword(line.trim(), "description") else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            let mut description = rest.to_string();
            let indent = leading_indent(line);
            for continuation in &self.body[idx + 1..] {
                if leading_indent(continuation) > indent {
                    description.push(' ');
                    description.push_str(continuation.trim());
                } else {
                    break;
                }
            }
            return Some(description);
        }
        None
    }
}

/// Splits `text` into the stanzas whose header line starts with `keyword`
/// (case-insensitive first token at top level).
pub fn scan(text: &str, keyword: &str) -> Vec<Stanza> {
    let mut stanzas: Vec<Stanza> = Vec::new();
    let mut current: Option<Stanza> = None;

    for line in text.lines() {
        let content = line.trim();

        if content == "!" || content.eq_ignore_ascii_case("end") {
            if let Some(stanza) = current.take() {
                stanzas.push(stanza);
            }
            continue;
        }

        let indented = line.starts_with(' ') || line.starts_with('\t');
        if !indented && !content.is_empty() {
            // Any new top-level command closes the open stanza.
            if let Some(stanza) = current.take() {
                stanzas.push(stanza);
            }
            let opens = content
                .split_whitespace()
                .next()
                .is_some_and(|first| first.eq_ignore_ascii_case(keyword));
            if opens {
                current = Some(Stanza {
                    header: content.to_string(),
                    body: Vec::new(),
                });
            }
            continue;
        }

        if let Some(stanza) = current.as_mut() {
            if !content.is_empty() {
                stanza.body.push(line.trim_end().to_string());
            }
        }
    }

    if let Some(stanza) = current.take() {
        stanzas.push(stanza);
    }

    stanzas
}

/// Strips a leading keyword token (case-insensitive) from a trimmed line
/// and returns the rest. None if the line does not start with the keyword.
pub(crate) fn strip_keyword<'a>(content: &'a str, keyword: &str) -> Option<&'a str> {
    let mut parts = content.splitn(2, char::is_whitespace);
    let first = parts.next()?;
    if !first.eq_ignore_ascii_case(keyword) {
        return None;
    }
    Some(parts.next().unwrap_or("").trim())
}

fn leading_indent(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

mod tests {
    #[allow(unused_imports)]
    use super::*;

    #[test]
    fn test_scan_splits_on_bang_and_next_header() {
        let text = "interface Fa0/1\n switchport mode access\n!\ninterface Fa0/2\n shutdown\ninterface Fa0/3\nend\n";
        let stanzas = scan(text, "interface");
        assert_eq!(stanzas.len(), 3);
        assert_eq!(stanzas[0].header, "interface Fa0/1");
        assert_eq!(stanzas[0].body, vec![" switchport mode access"]);
        assert!(stanzas[1].has_shutdown());
        assert!(stanzas[2].body.is_empty());
    }

    #[test]
    fn test_scan_closes_on_foreign_top_level_command() {
        let text = "interface Serial0/0\n ip address 10.1.1.1 255.255.255.252\nrouter ospf 1\n network 10.1.1.0 0.0.0.3 area 0\n!\n";
        let interfaces = scan(text, "interface");
        assert_eq!(interfaces.len(), 1);
        assert_eq!(
            interfaces[0].body,
            vec![" ip address 10.1.1.1 255.255.255.252"]
        );

        let routers = scan(text, "router");
        assert_eq!(routers.len(), 1);
        assert_eq!(routers[0].header, "router ospf 1");
    }

    #[test]
    fn test_scan_keyword_is_token_exact() {
        // "interfaces" must not open an "interface" stanza.
        let stanzas = scan("interfaces all\ninterface Fa0/1\n!\n", "interface");
        assert_eq!(stanzas.len(), 1);
        assert_eq!(stanzas[0].header, "interface Fa0/1");
    }

    #[test]
    fn test_shutdown_ignores_no_shutdown() {
        let stanzas = scan("interface Fa0/1\n no shutdown\n!\n", "interface");
        assert!(!stanzas[0].has_shutdown());

        let stanzas = scan("interface Fa0/2\n SHUTDOWN\n!\n", "interface");
        assert!(stanzas[0].has_shutdown());
    }

    #[test]
    fn test_description_takes_first_line() {
        let text = "interface Fa0/1\n description Uplink to R1\n description second one\n!\n";
        let stanzas = scan(text, "interface");
        assert_eq!(stanzas[0].description(), Some("Uplink to R1".to_string()));
    }

    #[test]
    fn test_description_folds_wrapped_continuation() {
        let text = "interface Fa0/1\n description WAN circuit 44217\n   provider ACME, contact noc@example.net\n ip address 10.1.1.1 255.255.255.0\n!\n";
        let stanzas = scan(text, "interface");
        assert_eq!(
            stanzas[0].description(),
            Some("WAN circuit 44217 provider ACME, contact noc@example.net".to_string())
        );
    }

    #[test]
    fn test_scan_without_trailing_terminator() {
        let stanzas = scan("interface Fa0/1\n speed 100", "interface");
        assert_eq!(stanzas.len(), 1);
        assert_eq!(stanzas[0].body, vec![" speed 100"]);
    }
}
