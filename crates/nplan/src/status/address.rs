//! Parsing `ip addr` output.
//!
//! `ip -j addr` prints a JSON array; older iproute2 releases ignore `-j`
//! and print the classic text layout:
//!
//! ```text
//! 2: eth0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc fq_codel state UP
//!     link/ether 52:54:00:12:34:56 brd ff:ff:ff:ff:ff:ff
//!     inet 192.168.1.5/24 brd 192.168.1.255 scope global eth0
//!     inet6 fe80::5054:ff:fe12:3456/64 scope link
//! ```
//!
//! Both forms produce the same [`StatusMap`].

use serde::Deserialize;
use winnow::ascii::digit1;
use winnow::combinator::{opt, preceded, terminated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_till;

use super::{AddressStatus, InterfaceStatus, StatusMap};
use crate::error::Result;

/// Result type for winnow parsers.
type PResult<T> = core::result::Result<T, ErrMode<ContextError>>;

/// Address family of an `addr_info` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Inet,
    Inet6,
}

impl Family {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Inet => "inet",
            Self::Inet6 => "inet6",
        }
    }
}

/// One interface record from `ip -j addr`.
#[derive(Debug, Deserialize)]
struct LinkRecord {
    ifname: String,
    #[serde(default)]
    link_type: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    addr_info: Vec<AddrRecord>,
}

/// One address of an interface record.
#[derive(Debug, Deserialize)]
struct AddrRecord {
    #[serde(default)]
    family: Option<String>,
    #[serde(default)]
    local: Option<String>,
    #[serde(default)]
    broadcast: Option<String>,
    #[serde(default)]
    prefixlen: Option<u8>,
}

impl LinkRecord {
    fn first_address(&self, family: Family) -> Option<AddressStatus> {
        self.addr_info
            .iter()
            .filter(|a| a.family.as_deref() == Some(family.as_str()))
            .find_map(|a| {
                Some(AddressStatus {
                    ip: a.local.clone()?,
                    broadcast: a.broadcast.clone(),
                    prefix: a.prefixlen,
                    gateway: None,
                })
            })
    }

    fn into_status(self) -> (String, InterfaceStatus) {
        let status = InterfaceStatus {
            ipv4: self.first_address(Family::Inet),
            ipv6: self.first_address(Family::Inet6),
            link_type: self.link_type,
            mac: self.address,
        };
        (self.ifname, status)
    }
}

/// Parse an address dump, preferring JSON and falling back to text.
pub fn parse_addresses(output: &str) -> StatusMap {
    let trimmed = output.trim_start();
    if trimmed.starts_with('[') {
        match parse_addresses_json(trimmed) {
            Ok(status) => return status,
            Err(e) => {
                tracing::warn!(error = %e, "address dump is not valid JSON, parsing as text");
            }
        }
    }
    parse_addresses_text(output)
}

/// Parse the JSON form of `ip -j addr`.
///
/// For each family only the first address is reported.
pub fn parse_addresses_json(output: &str) -> Result<StatusMap> {
    let records: Vec<LinkRecord> = serde_json::from_str(output)?;
    Ok(records.into_iter().map(LinkRecord::into_status).collect())
}

/// Parse the text form of `ip addr`.
///
/// Address lines are attributed to the most recent interface header and
/// ignored before the first one. Every `inet`/`inet6` line replaces the
/// interface's address for that family, so the last one listed is reported.
pub fn parse_addresses_text(output: &str) -> StatusMap {
    let mut status = StatusMap::new();
    let mut current: Option<String> = None;

    for line in output.lines() {
        if let Ok(name) = interface_header(&mut &*line) {
            status.insert(name.to_string(), InterfaceStatus::default());
            current = Some(name.to_string());
            continue;
        }

        let Some(entry) = current.as_ref().and_then(|name| status.get_mut(name)) else {
            continue;
        };

        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some(kind) if kind.starts_with("link/") => {
                entry.link_type = kind.split('/').nth(1).map(str::to_string);
                entry.mac = tokens.next().map(str::to_string);
            }
            Some("inet") => entry.ipv4 = parse_inet_line(tokens),
            Some("inet6") => entry.ipv6 = parse_inet_line(tokens),
            _ => {}
        }
    }

    status
}

/// Parse the tokens after `inet`/`inet6`: `ip/prefix [... brd addr ...]`.
fn parse_inet_line<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<AddressStatus> {
    let mut token = tokens.next()?;
    let (ip, prefix) = cidr(&mut token).ok()?;

    let mut broadcast = None;
    while let Some(key) = tokens.next() {
        if key == "brd" {
            broadcast = tokens.next().map(str::to_string);
        }
    }

    Some(AddressStatus {
        ip: ip.to_string(),
        broadcast,
        prefix,
        gateway: None,
    })
}

/// `2: eth0: <BROADCAST,...>` yields `eth0`.
fn interface_header<'a>(input: &mut &'a str) -> PResult<&'a str> {
    preceded(terminated(digit1, ':'), take_till(0.., ':'))
        .map(str::trim)
        .parse_next(input)
}

/// `192.168.1.5/24` yields the address and prefix length.
fn cidr<'a>(input: &mut &'a str) -> PResult<(&'a str, Option<u8>)> {
    (
        take_till(1.., '/'),
        opt(preceded('/', digit1.try_map(str::parse::<u8>))),
    )
        .parse_next(input)
}
