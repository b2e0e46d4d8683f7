//! Remediation notes for scanned ports.
//!
//! An [`Advisor`] holds an ordered rule list. Every rule that matches an
//! open port contributes its note; when nothing matches, a generic note is
//! used so that open ports are never left without advice. Ports that are
//! not open get no advice.

use crate::model::{ScanRecord, OPEN_STATE};
use serde::{Deserialize, Serialize};

/// Note used for open ports that no rule covers.
pub const DEFAULT_NOTE: &str = "Review service configuration and apply updates.";

/// Separator placed between notes when several rules match.
pub const NOTE_SEPARATOR: &str = " | ";

/// A single advisory rule.
///
/// Every criterion that is set must match: `ports` when non-empty, and
/// `service` (case-insensitive) when present. A rule with no criteria never
/// matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryRule {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub note: String,
}

impl AdvisoryRule {
    pub fn for_ports(ports: &[u16], note: &str) -> Self {
        Self {
            ports: ports.to_vec(),
            service: None,
            note: note.to_string(),
        }
    }

    pub fn for_service(service: &str, note: &str) -> Self {
        Self {
            ports: Vec::new(),
            service: Some(service.to_string()),
            note: note.to_string(),
        }
    }

    pub fn matches(&self, port: u16, service: &str) -> bool {
        if self.ports.is_empty() && self.service.is_none() {
            return false;
        }

        let port_ok = self.ports.is_empty() || self.ports.contains(&port);
        let service_ok = self
            .service
            .as_deref()
            .map_or(true, |s| s.eq_ignore_ascii_case(service));

        port_ok && service_ok
    }

    /// Short description of what the rule matches, for listings.
    pub fn criteria(&self) -> String {
        let mut parts = Vec::new();
        if !self.ports.is_empty() {
            let ports: Vec<String> = self.ports.iter().map(|p| p.to_string()).collect();
            parts.push(format!("port {}", ports.join(", ")));
        }
        if let Some(service) = &self.service {
            parts.push(format!("service {}", service));
        }
        parts.join(" and ")
    }
}

/// The rules every advisor starts with.
pub fn builtin_rules() -> Vec<AdvisoryRule> {
    vec![
        AdvisoryRule::for_ports(&[22], "Use key-based SSH and disable password auth."),
        AdvisoryRule::for_service("telnet", "Replace Telnet with SSH."),
        AdvisoryRule::for_ports(&[80, 8080], "Review web server versions and apply patches."),
        AdvisoryRule::for_ports(
            &[3306, 5432],
            "Restrict DB to localhost and enforce strong auth.",
        ),
    ]
}

#[derive(Debug, Clone)]
pub struct Advisor {
    rules: Vec<AdvisoryRule>,
}

impl Default for Advisor {
    fn default() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }
}

impl Advisor {
    /// Built-in rules followed by `extra`.
    pub fn with_rules(extra: impl IntoIterator<Item = AdvisoryRule>) -> Self {
        let mut advisor = Self::default();
        advisor.rules.extend(extra);
        advisor
    }

    pub fn rules(&self) -> &[AdvisoryRule] {
        &self.rules
    }

    pub fn suggest(&self, port: u16, service: &str, state: &str) -> String {
        if state != OPEN_STATE {
            return String::new();
        }

        let notes: Vec<&str> = self
            .rules
            .iter()
            .filter(|r| r.matches(port, service))
            .map(|r| r.note.as_str())
            .collect();

        if notes.is_empty() {
            DEFAULT_NOTE.to_string()
        } else {
            notes.join(NOTE_SEPARATOR)
        }
    }

    pub fn annotate(&self, records: &mut [ScanRecord]) {
        for record in records.iter_mut() {
            record.suggestion = self.suggest(record.port, &record.service, &record.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_port_gets_nothing() {
        let advisor = Advisor::default();
        assert_eq!(advisor.suggest(22, "ssh", "closed"), "");
        assert_eq!(advisor.suggest(23, "telnet", "filtered"), "");
        assert_eq!(advisor.suggest(80, "http", "open|filtered"), "");
    }

    #[test]
    fn test_telnet_always_gets_ssh_note() {
        let advisor = Advisor::default();
        for port in [23, 2323, 80, 22] {
            let note = advisor.suggest(port, "telnet", "open");
            assert!(note.contains("Replace Telnet with SSH."), "port {}: {}", port, note);
        }
        assert!(advisor.suggest(23, "TELNET", "open").contains("Replace Telnet"));
    }

    #[test]
    fn test_notes_joined_in_rule_order() {
        let advisor = Advisor::default();
        assert_eq!(
            advisor.suggest(22, "telnet", "open"),
            "Use key-based SSH and disable password auth. | Replace Telnet with SSH."
        );
    }

    #[test]
    fn test_known_ports() {
        let advisor = Advisor::default();
        assert_eq!(
            advisor.suggest(8080, "http-proxy", "open"),
            "Review web server versions and apply patches."
        );
        assert_eq!(
            advisor.suggest(5432, "postgresql", "open"),
            "Restrict DB to localhost and enforce strong auth."
        );
    }

    #[test]
    fn test_default_for_unmatched_open_port() {
        let advisor = Advisor::default();
        assert_eq!(advisor.suggest(6379, "redis", "open"), DEFAULT_NOTE);
        assert_eq!(advisor.suggest(1, "", "open"), DEFAULT_NOTE);
    }

    #[test]
    fn test_extra_rules_run_after_builtins() {
        let advisor = Advisor::with_rules(vec![
            AdvisoryRule::for_service("ssh", "Check for weak host keys."),
            AdvisoryRule {
                ports: vec![21],
                service: Some("ftp".to_string()),
                note: "Disable anonymous FTP.".to_string(),
            },
        ]);

        assert_eq!(
            advisor.suggest(22, "ssh", "open"),
            "Use key-based SSH and disable password auth. | Check for weak host keys."
        );
        assert_eq!(advisor.suggest(21, "ftp", "open"), "Disable anonymous FTP.");
        assert_eq!(advisor.suggest(2121, "ftp", "open"), DEFAULT_NOTE);
    }

    #[test]
    fn test_rule_without_criteria_never_matches() {
        let rule = AdvisoryRule {
            ports: vec![],
            service: None,
            note: "always".to_string(),
        };
        assert!(!rule.matches(22, "ssh"));
        assert_eq!(Advisor::with_rules(vec![rule]).suggest(9, "x", "open"), DEFAULT_NOTE);
    }

    #[test]
    fn test_annotate_fills_records() {
        let mut records = vec![
            ScanRecord {
                host_index: 0,
                ip: "192.0.2.1".into(),
                hostname: String::new(),
                os: String::new(),
                port: 23,
                protocol: "tcp".into(),
                state: "open".into(),
                service: "telnet".into(),
                version: String::new(),
                banner: "telnet".into(),
                suggestion: String::new(),
            },
            ScanRecord {
                host_index: 0,
                ip: "192.0.2.1".into(),
                hostname: String::new(),
                os: String::new(),
                port: 22,
                protocol: "tcp".into(),
                state: "closed".into(),
                service: "ssh".into(),
                version: String::new(),
                banner: "ssh".into(),
                suggestion: "stale".into(),
            },
        ];

        Advisor::default().annotate(&mut records);
        assert_eq!(records[0].suggestion, "Replace Telnet with SSH.");
        assert_eq!(records[1].suggestion, "");
    }

    #[test]
    fn test_criteria_description() {
        let rules = builtin_rules();
        assert_eq!(rules[0].criteria(), "port 22");
        assert_eq!(rules[1].criteria(), "service telnet");
        assert_eq!(rules[2].criteria(), "port 80, 8080");
    }
}
