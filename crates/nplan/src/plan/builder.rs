//! Translate high-level interface intent into plan definitions.

use serde::Deserialize;

use super::types::{InterfaceDefinition, InterfaceKind, Nameservers, RouteEntry};
use crate::error::Result;
use crate::util::addr;
use crate::validation::{
    Validatable, ValidationResult, validate_domain, validate_ip, validate_prefix,
    validate_required,
};

/// Prefix length used when none is given.
pub const DEFAULT_PREFIX: u32 = 24;

/// Wifi network to join.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPointOptions {
    /// Network name.
    pub ssid: String,
    /// Pre-shared key.
    pub wifi_password: String,
}

/// High-level description of how an interface should be addressed.
///
/// With `dhcp` set, every static field is ignored. Otherwise each static
/// field lands in the definition only when it is present.
///
/// # Example
///
/// ```
/// use nplan::plan::InterfaceOptions;
///
/// let opts = InterfaceOptions::new()
///     .ip("192.168.4.8")
///     .default_gateway("192.168.4.1")
///     .nameservers(["192.168.4.1"])
///     .domain("guardian-angel.local");
/// let (kind, def) = opts.build().unwrap();
/// assert_eq!(kind, nplan::plan::InterfaceKind::Ethernet);
/// assert_eq!(def.addresses.unwrap()[0].cidr(), Some("192.168.4.8/24"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceOptions {
    /// Use DHCPv4 instead of static settings.
    #[serde(default)]
    pub dhcp: bool,

    /// Explicit interface type. Inferred from `access_point` when absent.
    #[serde(default, rename = "type")]
    pub kind: Option<InterfaceKind>,

    /// Static address.
    #[serde(default)]
    pub ip: Option<String>,

    /// Prefix length for `ip`, 0-32.
    #[serde(default)]
    pub prefix: Option<u32>,

    /// Gateway for the default route.
    #[serde(default)]
    pub default_gateway: Option<String>,

    /// DNS search domain.
    #[serde(default)]
    pub domain: Option<String>,

    /// DNS servers.
    #[serde(default)]
    pub nameservers: Option<Vec<String>>,

    /// Wifi network to join.
    #[serde(default)]
    pub access_point: Option<AccessPointOptions>,
}

impl InterfaceOptions {
    /// Empty options: static addressing with nothing configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options enabling DHCPv4.
    pub fn dhcp() -> Self {
        Self {
            dhcp: true,
            ..Self::default()
        }
    }

    /// Set the interface type explicitly.
    pub fn kind(mut self, kind: InterfaceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the static address.
    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Set the prefix length.
    pub fn prefix(mut self, prefix: u32) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Set the default gateway.
    pub fn default_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.default_gateway = Some(gateway.into());
        self
    }

    /// Set the search domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the DNS servers.
    pub fn nameservers<I, S>(mut self, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nameservers = Some(servers.into_iter().map(Into::into).collect());
        self
    }

    /// Join a wifi network.
    pub fn access_point(mut self, ssid: impl Into<String>, password: impl Into<String>) -> Self {
        self.access_point = Some(AccessPointOptions {
            ssid: ssid.into(),
            wifi_password: password.into(),
        });
        self
    }

    /// Resolve the interface type.
    ///
    /// An explicit type wins; otherwise an access point makes it wifi.
    pub fn resolved_kind(&self) -> InterfaceKind {
        match (self.kind, &self.access_point) {
            (Some(kind), _) => kind,
            (None, Some(_)) => InterfaceKind::Wifi,
            (None, None) => InterfaceKind::Ethernet,
        }
    }

    /// Validate and build the interface definition.
    pub fn build(&self) -> Result<(InterfaceKind, InterfaceDefinition)> {
        self.validate().into_result()?;

        let kind = self.resolved_kind();
        let mut definition = if self.dhcp {
            InterfaceDefinition::dhcp()
        } else {
            self.static_definition()
        };

        // Ethernet definitions never carry access points.
        if let (Some(ap), InterfaceKind::Wifi) = (&self.access_point, kind) {
            definition.add_access_point(&ap.ssid, &ap.wifi_password);
        }

        Ok((kind, definition))
    }

    fn static_definition(&self) -> InterfaceDefinition {
        let prefix = self.prefix.unwrap_or(DEFAULT_PREFIX);

        InterfaceDefinition {
            addresses: self
                .ip
                .as_deref()
                .map(|ip| vec![addr::format_prefix(ip, prefix).into()]),
            nameservers: self.nameservers.as_ref().map(|servers| Nameservers {
                search: self.domain.as_ref().map(|d| vec![d.clone()]),
                addresses: servers.clone(),
            }),
            routes: self
                .default_gateway
                .as_deref()
                .map(|gw| vec![RouteEntry::default_via(gw)]),
            ..Default::default()
        }
    }
}

impl Validatable for InterfaceOptions {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(ip) = &self.ip {
            result.merge(validate_ip(ip, "ip"));
        }
        if let Some(prefix) = self.prefix {
            result.merge(validate_prefix(prefix, "prefix"));
        }
        if let Some(gw) = &self.default_gateway {
            result.merge(validate_ip(gw, "defaultGateway"));
        }
        if let Some(domain) = &self.domain {
            result.merge(validate_domain(domain, "domain"));
        }
        if let Some(servers) = &self.nameservers {
            for (i, server) in servers.iter().enumerate() {
                result.merge(validate_ip(server, &format!("nameservers[{}]", i)));
            }
        }
        if let Some(ap) = &self.access_point {
            result.merge(validate_required(Some(ap.ssid.as_str()), "accessPoint.ssid"));
            result.merge(validate_required(
                Some(ap.wifi_password.as_str()),
                "accessPoint.wifiPassword",
            ));
            if self.kind == Some(InterfaceKind::Ethernet) {
                result.add_warning("accessPoint", "ignored for ethernet interfaces");
            }
        }

        result
    }
}
