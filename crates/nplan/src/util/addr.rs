//! Address parsing and formatting utilities.

use std::net::IpAddr;

/// Error type for address parsing.
#[derive(Debug, thiserror::Error)]
pub enum AddrError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid domain: {0}")]
    InvalidDomain(String),
}

pub type Result<T> = std::result::Result<T, AddrError>;

/// Maximum length of a fully qualified domain name.
const MAX_DOMAIN_LEN: usize = 253;

/// Maximum length of a single domain label.
const MAX_LABEL_LEN: usize = 63;

/// Parse an IP address from string.
pub fn parse_addr(s: &str) -> Result<IpAddr> {
    s.parse()
        .map_err(|_| AddrError::InvalidAddress(s.to_string()))
}

/// Format an address with prefix in CIDR notation.
pub fn format_prefix(addr: &str, prefix: u32) -> String {
    format!("{}/{}", addr, prefix)
}

/// Validate a DNS domain name.
///
/// Requires at least two labels, each 1-63 characters of ASCII
/// alphanumerics or hyphens, not starting or ending with a hyphen.
/// The top-level label must not be numeric.
pub fn validate_domain(s: &str) -> Result<()> {
    let name = s.strip_suffix('.').unwrap_or(s);

    if name.is_empty() || name.len() > MAX_DOMAIN_LEN {
        return Err(AddrError::InvalidDomain(s.to_string()));
    }

    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 {
        return Err(AddrError::InvalidDomain(format!(
            "{} (needs at least two labels)",
            s
        )));
    }

    for label in &labels {
        let valid = !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(AddrError::InvalidDomain(format!(
                "{} (bad label '{}')",
                s, label
            )));
        }
    }

    if labels
        .last()
        .is_some_and(|tld| tld.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(AddrError::InvalidDomain(format!(
            "{} (numeric top-level label)",
            s
        )));
    }

    Ok(())
}
