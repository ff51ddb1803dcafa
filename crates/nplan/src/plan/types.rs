//! Core types for the netplan configuration document.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Extra keys carried through untouched.
pub type Passthrough = BTreeMap<String, serde_yaml::Value>;

/// Default plan format version.
pub const DEFAULT_VERSION: u32 = 2;

/// Destination used for default routes.
pub const DEFAULT_ROUTE: &str = "0.0.0.0/0";

fn default_version() -> u32 {
    DEFAULT_VERSION
}

/// The whole configuration file: a `network:` section plus any other
/// top-level keys, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDocument {
    /// The network section.
    pub network: NetworkPlan,

    #[serde(flatten)]
    pub extra: Passthrough,
}

impl PlanDocument {
    /// A document holding only `network`.
    pub fn new(network: NetworkPlan) -> Self {
        Self {
            network,
            extra: Passthrough::new(),
        }
    }
}

/// The `network:` section of a netplan file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkPlan {
    /// Plan format version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Backend the generator targets.
    #[serde(default)]
    pub renderer: Renderer,

    /// Ethernet interfaces by name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethernets: Option<BTreeMap<String, InterfaceDefinition>>,

    /// Wifi interfaces by name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifis: Option<BTreeMap<String, InterfaceDefinition>>,

    /// Other sections (bridges, bonds, vlans, ...) preserved verbatim.
    #[serde(flatten)]
    pub extra: Passthrough,
}

impl Default for NetworkPlan {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION,
            renderer: Renderer::default(),
            ethernets: None,
            wifis: None,
            extra: Passthrough::new(),
        }
    }
}

impl NetworkPlan {
    /// Get the map for an interface kind, if it has been created.
    pub fn interfaces(&self, kind: InterfaceKind) -> Option<&BTreeMap<String, InterfaceDefinition>> {
        match kind {
            InterfaceKind::Ethernet => self.ethernets.as_ref(),
            InterfaceKind::Wifi => self.wifis.as_ref(),
        }
    }

    /// Get the map for an interface kind, creating it if absent.
    pub fn interfaces_mut(&mut self, kind: InterfaceKind) -> &mut BTreeMap<String, InterfaceDefinition> {
        let slot = match kind {
            InterfaceKind::Ethernet => &mut self.ethernets,
            InterfaceKind::Wifi => &mut self.wifis,
        };
        slot.get_or_insert_with(BTreeMap::new)
    }

    /// Look up an interface definition by kind and name.
    pub fn interface(&self, kind: InterfaceKind, name: &str) -> Option<&InterfaceDefinition> {
        self.interfaces(kind).and_then(|m| m.get(name))
    }
}

/// Renderer backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Renderer {
    /// systemd-networkd.
    #[default]
    #[serde(rename = "networkd")]
    Networkd,
    /// NetworkManager.
    NetworkManager,
}

impl Renderer {
    /// Get the name used in plan files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Networkd => "networkd",
            Self::NetworkManager => "NetworkManager",
        }
    }
}

impl fmt::Display for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Renderer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "networkd" => Ok(Self::Networkd),
            "NetworkManager" => Ok(Self::NetworkManager),
            _ => Err(Error::validation(
                "renderer",
                format!("must be one of networkd, NetworkManager, got '{}'", s),
            )),
        }
    }
}

/// Interface type, deciding which plan section holds the definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    /// Stored under `ethernets`.
    #[default]
    Ethernet,
    /// Stored under `wifis`.
    Wifi,
}

impl InterfaceKind {
    /// Get the type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethernet => "ethernet",
            Self::Wifi => "wifi",
        }
    }

    /// Get the plan section this kind is stored in.
    pub fn section(&self) -> &'static str {
        match self {
            Self::Ethernet => "ethernets",
            Self::Wifi => "wifis",
        }
    }
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterfaceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ethernet" => Ok(Self::Ethernet),
            "wifi" => Ok(Self::Wifi),
            other => Err(Error::UnsupportedType(other.to_string())),
        }
    }
}

/// A yes/no flag such as `dhcp4`.
///
/// Written as `yes`/`no`; reading also accepts YAML booleans and the
/// `true`/`false`/`on`/`off` spellings netplan understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Yes,
    No,
}

impl Toggle {
    /// Check if the flag is enabled.
    pub fn is_yes(&self) -> bool {
        *self == Self::Yes
    }
}

impl From<bool> for Toggle {
    fn from(value: bool) -> Self {
        if value { Self::Yes } else { Self::No }
    }
}

impl Serialize for Toggle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            Self::Yes => "yes",
            Self::No => "no",
        })
    }
}

impl<'de> Deserialize<'de> for Toggle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ToggleVisitor;

        impl Visitor<'_> for ToggleVisitor {
            type Value = Toggle;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a boolean or one of yes/no/true/false/on/off")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Toggle, E> {
                Ok(Toggle::from(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Toggle, E> {
                match v.to_ascii_lowercase().as_str() {
                    "yes" | "y" | "true" | "on" => Ok(Toggle::Yes),
                    "no" | "n" | "false" | "off" => Ok(Toggle::No),
                    _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
                }
            }
        }

        deserializer.deserialize_any(ToggleVisitor)
    }
}

/// DNS settings of an interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nameservers {
    /// Search domains.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<Vec<String>>,

    /// Nameserver addresses.
    #[serde(default)]
    pub addresses: Vec<String>,
}

/// A static route.
///
/// Link-scoped and `unreachable`/`blackhole` routes have no gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Destination in CIDR notation.
    pub to: String,
    /// Gateway address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,

    #[serde(flatten)]
    pub extra: Passthrough,
}

impl RouteEntry {
    /// A default route through `gateway`.
    pub fn default_via(gateway: impl Into<String>) -> Self {
        Self {
            to: DEFAULT_ROUTE.to_string(),
            via: Some(gateway.into()),
            extra: Passthrough::new(),
        }
    }

    /// Check if this route is a default route.
    pub fn is_default(&self) -> bool {
        self.to == DEFAULT_ROUTE || self.to == "default"
    }
}

/// One entry of an interface's `addresses` list.
///
/// Either a plain `addr/prefix` string or the map form carrying per-address
/// options (`- 10.0.0.5/24: {lifetime: 0}`), which is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InterfaceAddress {
    Cidr(String),
    Detailed(serde_yaml::Mapping),
}

impl InterfaceAddress {
    /// Get the `addr/prefix` text, if the entry has one.
    pub fn cidr(&self) -> Option<&str> {
        match self {
            Self::Cidr(cidr) => Some(cidr),
            Self::Detailed(map) => map.keys().next().and_then(|k| k.as_str()),
        }
    }
}

impl From<String> for InterfaceAddress {
    fn from(cidr: String) -> Self {
        Self::Cidr(cidr)
    }
}

impl From<&str> for InterfaceAddress {
    fn from(cidr: &str) -> Self {
        Self::Cidr(cidr.to_string())
    }
}

/// Credentials for a wifi access point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessPoint {
    /// Pre-shared key; open networks have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(flatten)]
    pub extra: Passthrough,
}

/// Per-interface configuration, shared by ethernet and wifi entries.
///
/// Keys this crate does not model (`match`, `mtu`, `set-name`, ...) are
/// kept in [`extra`](Self::extra) so opaque definitions survive intact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDefinition {
    /// Enable DHCPv4.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp4: Option<Toggle>,

    /// Static addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<InterfaceAddress>>,

    /// DNS settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nameservers: Option<Nameservers>,

    /// Static routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<RouteEntry>>,

    /// Wifi networks by SSID.
    #[serde(
        rename = "access-points",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub access_points: Option<BTreeMap<String, AccessPoint>>,

    #[serde(flatten)]
    pub extra: Passthrough,
}

impl InterfaceDefinition {
    /// A definition that only enables DHCPv4.
    pub fn dhcp() -> Self {
        Self {
            dhcp4: Some(Toggle::Yes),
            ..Default::default()
        }
    }

    /// Check if DHCPv4 is enabled.
    pub fn is_dhcp(&self) -> bool {
        self.dhcp4.is_some_and(|t| t.is_yes())
    }

    /// Get the gateway of the default route, if any.
    pub fn default_gateway(&self) -> Option<&str> {
        self.routes
            .as_ref()?
            .iter()
            .find(|r| r.is_default())
            .and_then(|r| r.via.as_deref())
    }

    /// Add or replace an access point.
    pub fn add_access_point(&mut self, ssid: impl Into<String>, password: impl Into<String>) {
        self.access_points.get_or_insert_with(BTreeMap::new).insert(
            ssid.into(),
            AccessPoint {
                password: Some(password.into()),
                extra: Passthrough::new(),
            },
        );
    }
}
