//! Live interface status.
//!
//! The status report merges three command outputs into one record per
//! interface:
//!
//! 1. `ip -j addr` for link type, MAC and the first IPv4/IPv6 address
//! 2. `route -n` for the IPv4 default gateway
//! 3. `route -6n` for the IPv6 default gateway (optional; a failure here
//!    only means there is no IPv6 gateway to report)
//!
//! Route tables only enrich interfaces that already have an address of
//! the matching family; they never add interfaces.
//!
//! # Example
//!
//! ```
//! use nplan::status::build_status;
//!
//! let addrs = r#"[{"ifname":"eno1","link_type":"ether","address":"52:54:00:12:34:56",
//!     "addr_info":[{"family":"inet","local":"192.168.1.5","prefixlen":24}]}]"#;
//! let routes = "Destination Gateway Genmask Flags Metric Ref Use Iface\n\
//!               0.0.0.0 192.168.1.1 0.0.0.0 UG 100 0 0 eno1\n";
//!
//! let status = build_status(addrs, routes, None);
//! assert_eq!(status["eno1"].ipv4.as_ref().unwrap().gateway.as_deref(), Some("192.168.1.1"));
//! ```

mod address;
mod route;

pub use address::{parse_addresses, parse_addresses_json, parse_addresses_text};
pub use route::{DefaultRoute, ipv4_default_routes, ipv6_default_routes};

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::command::{BinaryPaths, CommandRunner, Tool, run_tool};
use crate::error::Result;

/// Arguments for the JSON address dump.
pub const ADDRESS_ARGS: &[&str] = &["-j", "addr"];
/// Arguments for the numeric IPv4 route table.
pub const IPV4_ROUTE_ARGS: &[&str] = &["-n"];
/// Arguments for the numeric IPv6 route table.
pub const IPV6_ROUTE_ARGS: &[&str] = &["-6n"];

/// IPv6 gateway value meaning "directly connected".
const NO_IPV6_GATEWAY: &str = "::";

/// Status of every interface, keyed by name.
pub type StatusMap = BTreeMap<String, InterfaceStatus>;

/// One address of an interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressStatus {
    /// The address.
    pub ip: String,
    /// Broadcast address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<String>,
    /// Prefix length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<u8>,
    /// Default gateway through this interface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
}

impl fmt::Display for AddressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ip)?;
        if let Some(prefix) = self.prefix {
            write!(f, "/{}", prefix)?;
        }
        if let Some(brd) = &self.broadcast {
            write!(f, " brd {}", brd)?;
        }
        if let Some(gw) = &self.gateway {
            write!(f, " via {}", gw)?;
        }
        Ok(())
    }
}

/// Status of a single interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceStatus {
    /// Link type, e.g. `ether` or `loopback`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    /// MAC address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    /// First IPv4 address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<AddressStatus>,
    /// First IPv6 address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<AddressStatus>,
}

/// Record IPv4 default gateways on interfaces that have an IPv4 address.
pub fn apply_ipv4_routes(status: &mut StatusMap, output: &str) {
    for route in ipv4_default_routes(output) {
        if let Some(v4) = status.get_mut(&route.iface).and_then(|s| s.ipv4.as_mut()) {
            v4.gateway = Some(route.gateway);
        }
    }
}

/// Record IPv6 default gateways on interfaces that have an IPv6 address.
///
/// A next hop of `::` is not a gateway and is skipped.
pub fn apply_ipv6_routes(status: &mut StatusMap, output: &str) {
    for route in ipv6_default_routes(output) {
        if route.gateway == NO_IPV6_GATEWAY {
            continue;
        }
        if let Some(v6) = status.get_mut(&route.iface).and_then(|s| s.ipv6.as_mut()) {
            v6.gateway = Some(route.gateway);
        }
    }
}

/// Merge an address dump and route tables into a status map.
///
/// `ipv6_routes` is `None` when the IPv6 table could not be read.
pub fn build_status(addresses: &str, ipv4_routes: &str, ipv6_routes: Option<&str>) -> StatusMap {
    let mut status = parse_addresses(addresses);
    apply_ipv4_routes(&mut status, ipv4_routes);
    if let Some(output) = ipv6_routes.filter(|o| !o.trim().is_empty()) {
        apply_ipv6_routes(&mut status, output);
    }
    status
}

/// Query the host and build the status map.
///
/// Runs the address dump, then the IPv4 table, then the IPv6 table, one
/// after another. Failures of the first two are returned; a failing IPv6
/// table is ignored.
pub async fn collect_status<R: CommandRunner>(runner: &R, paths: &BinaryPaths) -> Result<StatusMap> {
    let addresses = run_tool(runner, paths, Tool::Ip, ADDRESS_ARGS).await?;
    let ipv4 = run_tool(runner, paths, Tool::Route, IPV4_ROUTE_ARGS).await?;
    let ipv6 = match run_tool(runner, paths, Tool::Route, IPV6_ROUTE_ARGS).await {
        Ok(output) => Some(output),
        Err(e) => {
            tracing::debug!(error = %e, "no IPv6 routes");
            None
        }
    };

    Ok(build_status(
        &addresses.stdout,
        &ipv4.stdout,
        ipv6.as_ref().map(|o| o.stdout.as_str()),
    ))
}
