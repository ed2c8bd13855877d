//! Allowed-hosts list.
//!
//! A host is accepted when any pattern matches it:
//! - `*` matches every host;
//! - `.example.com` matches `example.com` and any subdomain of it;
//! - anything else must equal the host exactly (case-insensitive).
//!
//! Incoming hosts are normalised first: lowercased, port stripped, trailing
//! dot removed. IPv6 literals keep their brackets, so `[::1]:8000` matches the
//! pattern `[::1]`.

use serde::Serialize;

use super::constants::DEBUG_ALLOWED_HOSTS;

/// Ordered set of host patterns. Order does not affect matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AllowedHosts(Vec<String>);

impl AllowedHosts {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            patterns
                .into_iter()
                .map(|p| p.as_ref().trim().to_ascii_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        )
    }

    /// Parse a comma separated list, dropping blank entries.
    pub fn from_csv(value: &str) -> Self {
        Self::new(value.split(','))
    }

    pub fn patterns(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains_wildcard(&self) -> bool {
        self.0.iter().any(|p| p == "*")
    }

    /// The list actually enforced: debug mode with no hosts configured
    /// accepts local addresses only.
    pub fn effective(&self, debug: bool) -> AllowedHosts {
        if debug && self.is_empty() {
            AllowedHosts::new(DEBUG_ALLOWED_HOSTS.iter())
        } else {
            self.clone()
        }
    }

    /// Whether a `Host` header value is accepted.
    pub fn is_allowed(&self, host: &str) -> bool {
        match normalize_host(host) {
            Some(domain) => self.0.iter().any(|p| pattern_matches(p, &domain)),
            None => false,
        }
    }
}

fn pattern_matches(pattern: &str, domain: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    match pattern.strip_prefix('.') {
        Some(parent) => domain == parent || domain.ends_with(pattern),
        None => domain == pattern,
    }
}

/// Lowercased domain part of a host header, `None` when malformed.
pub fn normalize_host(host: &str) -> Option<String> {
    let host = host.trim().to_ascii_lowercase();
    if host.is_empty() {
        return None;
    }

    let domain = if host.starts_with('[') {
        // [v6]:port
        let end = host.find(']')?;
        let (literal, rest) = host.split_at(end + 1);
        if !(rest.is_empty() || valid_port(rest.strip_prefix(':')?)) {
            return None;
        }
        if !literal[1..end]
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.')
        {
            return None;
        }
        literal.to_string()
    } else {
        let (name, port) = match host.rsplit_once(':') {
            Some((name, port)) => (name, Some(port)),
            None => (host.as_str(), None),
        };
        if let Some(port) = port {
            if !valid_port(port) {
                return None;
            }
        }
        let name = name.strip_suffix('.').unwrap_or(name);
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
        {
            return None;
        }
        name.to_string()
    };

    Some(domain)
}

fn valid_port(port: &str) -> bool {
    !port.is_empty() && port.parse::<u16>().is_ok()
}
