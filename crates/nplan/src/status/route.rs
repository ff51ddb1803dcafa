//! Parsing `route -n` and `route -6n` tables.
//!
//! Column positions are taken from the header row rather than assumed,
//! since net-tools has shuffled them between releases.

use std::borrow::Cow;

/// Header of the IPv6 gateway column, which contains a space.
const IPV6_NEXT_HOP: &str = "Next Hop";
const IPV6_NEXT_HOP_TOKEN: &str = "Next_Hop";

/// A default route found in a routing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRoute {
    /// Outgoing interface.
    pub iface: String,
    /// Gateway column value.
    pub gateway: String,
}

/// Column layout of a routing table, from its header row.
#[derive(Debug, Clone, Copy)]
struct Header {
    gateway: Option<usize>,
    iface: Option<usize>,
}

impl Header {
    fn parse(columns: &[&str], gateway: &str, iface: &str) -> Self {
        Self {
            gateway: columns.iter().position(|c| *c == gateway),
            iface: columns.iter().position(|c| *c == iface),
        }
    }
}

fn default_routes<'a>(
    lines: impl Iterator<Item = Cow<'a, str>>,
    gateway_column: &str,
    iface_column: &str,
    is_default: impl Fn(&str) -> bool,
) -> Vec<DefaultRoute> {
    let mut header: Option<Header> = None;
    let mut routes = Vec::new();

    for line in lines {
        let columns: Vec<&str> = line.split_whitespace().collect();

        if header.is_none() {
            if line.contains("Destination") {
                header = Some(Header::parse(&columns, gateway_column, iface_column));
            }
            continue;
        }

        let Some(Header {
            gateway: Some(gw_idx),
            iface: Some(if_idx),
        }) = header
        else {
            continue;
        };

        if !columns.first().is_some_and(|dst| is_default(dst)) {
            continue;
        }

        match (columns.get(gw_idx), columns.get(if_idx)) {
            (Some(gateway), Some(iface)) => routes.push(DefaultRoute {
                iface: iface.to_string(),
                gateway: gateway.to_string(),
            }),
            _ => tracing::warn!(line = %line, "truncated default route row"),
        }
    }

    routes
}

/// Find default routes in `route -n` output.
///
/// ```text
/// Kernel IP routing table
/// Destination     Gateway         Genmask         Flags Metric Ref    Use Iface
/// 0.0.0.0         192.168.1.1     0.0.0.0         UG    100    0        0 eno1
/// ```
pub fn ipv4_default_routes(output: &str) -> Vec<DefaultRoute> {
    default_routes(
        output.lines().map(Cow::Borrowed),
        "Gateway",
        "Iface",
        |dst| dst.starts_with("0.0.0.0"),
    )
}

/// Find default routes in `route -6n` output.
///
/// ```text
/// Kernel IPv6 routing table
/// Destination                    Next Hop                   Flag Met Ref Use If
/// ::/0                           fe80::1                    UG   1024 2     0 eno1
/// ```
pub fn ipv6_default_routes(output: &str) -> Vec<DefaultRoute> {
    default_routes(
        output
            .lines()
            .map(|line| Cow::Owned(line.replace(IPV6_NEXT_HOP, IPV6_NEXT_HOP_TOKEN))),
        IPV6_NEXT_HOP_TOKEN,
        "If",
        |dst| dst == "::/0",
    )
}
