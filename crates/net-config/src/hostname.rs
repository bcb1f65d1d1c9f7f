//! Default hostname lookup used by DHCP methods

use std::sync::OnceLock;

use regex::Regex;

/// Regex for a single DNS label
const HOSTNAME_LABEL_REGEX: &str = r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?$";

/// Maximum length of a fully qualified hostname
const HOSTNAME_MAX_LEN: usize = 253;

/// Source of the hostname sent along with DHCP requests
pub trait HostnameLookup {
    fn default_hostname(&self) -> Option<String>;
}

impl<F> HostnameLookup for F
where
    F: Fn() -> Option<String>,
{
    fn default_hostname(&self) -> Option<String> {
        self()
    }
}

/// Lookup returning a fixed value
#[derive(Debug, Clone, Default)]
pub struct FixedHostname(pub Option<String>);

impl FixedHostname {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self(Some(hostname.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl HostnameLookup for FixedHostname {
    fn default_hostname(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Check a hostname or domain name
pub fn is_valid_hostname(name: &str) -> bool {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    let label = LABEL.get_or_init(|| Regex::new(HOSTNAME_LABEL_REGEX).expect("valid hostname regex"));

    let name = name.strip_suffix('.').unwrap_or(name);
    !name.is_empty() && name.len() <= HOSTNAME_MAX_LEN && name.split('.').all(|l| label.is_match(l))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname_validation() {
        assert!(is_valid_hostname("client"));
        assert!(is_valid_hostname("client-1.example.com"));
        assert!(is_valid_hostname("client.example.com."));

        assert!(!is_valid_hostname(""));
        assert!(!is_valid_hostname("-client"));
        assert!(!is_valid_hostname("client..example"));
        assert!(!is_valid_hostname("cli ent"));
        assert!(!is_valid_hostname("client;reboot"));
        assert!(!is_valid_hostname(&"a".repeat(64)));
    }

    #[test]
    fn test_lookups() {
        assert_eq!(FixedHostname::new("box").default_hostname().as_deref(), Some("box"));
        assert_eq!(FixedHostname::none().default_hostname(), None);

        let lookup = || Some("from-closure".to_string());
        assert_eq!(lookup.default_hostname().as_deref(), Some("from-closure"));
    }
}
