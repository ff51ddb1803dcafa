//! Integration tests for building plans.

use nplan::plan::{InterfaceDefinition, InterfaceKind, InterfaceOptions, NetplanInterface};
use nplan::store::{MemoryFs, serialize};
use nplan::{Netplan, NetplanOptions};

use crate::common::{FixtureRunner, fake_binaries, yaml_fixture};

fn netplan() -> Netplan<FixtureRunner, MemoryFs> {
    Netplan::with_parts(
        NetplanOptions::new().config_file("/tmp/netplan.yaml"),
        FixtureRunner::new(),
        MemoryFs::new(),
        fake_binaries(),
    )
    .unwrap()
}

fn as_yaml(netplan: &Netplan<FixtureRunner, MemoryFs>) -> serde_yaml::Value {
    serde_yaml::from_str(&serialize(netplan.document()).unwrap()).unwrap()
}

// ============================================================================
// configure_interface
// ============================================================================

#[test]
fn test_static_ethernet() {
    let mut np = netplan();
    np.configure_interface(
        "eth0",
        &InterfaceOptions::new()
            .ip("192.168.4.8")
            .default_gateway("192.168.4.1")
            .nameservers(["192.168.4.1"])
            .domain("guardian-angel.local"),
    )
    .unwrap();

    assert_eq!(as_yaml(&np), yaml_fixture("one_static_eth.yaml"));
}

#[test]
fn test_static_ethernet_and_static_wifi() {
    let mut np = netplan();
    np.configure_interface("eth0", &InterfaceOptions::new().ip("192.168.4.8"))
        .unwrap();
    np.configure_interface(
        "wlan0",
        &InterfaceOptions::new()
            .kind(InterfaceKind::Wifi)
            .ip("10.54.1.120")
            .nameservers(["10.54.1.1"])
            .default_gateway("10.54.1.1")
            .access_point("TellMyWiFiLoveHer", "supersecretpassword"),
    )
    .unwrap();

    assert_eq!(
        as_yaml(&np),
        yaml_fixture("one_static_eth_one_static_wifi.yaml")
    );
}

#[test]
fn test_static_ethernet_and_dhcp_wifi() {
    let mut np = netplan();
    np.configure_interface(
        "eth0",
        &InterfaceOptions::new()
            .kind(InterfaceKind::Ethernet)
            .ip("192.168.4.8"),
    )
    .unwrap();
    np.configure_interface(
        "wlan0",
        &InterfaceOptions::dhcp().access_point("TellMyWiFiLoveHer", "supersecretpassword"),
    )
    .unwrap();

    assert_eq!(
        as_yaml(&np),
        yaml_fixture("one_static_eth_one_dhcp_wifi.yaml")
    );
}

#[test]
fn test_dhcp_discards_static_fields() {
    let mut np = netplan();
    np.configure_interface(
        "eth0",
        &InterfaceOptions::dhcp()
            .ip("192.168.4.8")
            .prefix(16)
            .default_gateway("192.168.4.1")
            .nameservers(["1.1.1.1"]),
    )
    .unwrap();

    let eth0 = np.plan().interface(InterfaceKind::Ethernet, "eth0").unwrap();
    assert_eq!(eth0, &InterfaceDefinition::dhcp());

    let yaml = as_yaml(&np);
    let eth0 = yaml["network"]["ethernets"]["eth0"].as_mapping().unwrap();
    assert_eq!(eth0.len(), 1);
    assert_eq!(yaml["network"]["ethernets"]["eth0"]["dhcp4"].as_str(), Some("yes"));
}

#[test]
fn test_explicit_ethernet_drops_access_point() {
    let mut np = netplan();
    np.configure_interface(
        "eth1",
        &InterfaceOptions::dhcp()
            .kind(InterfaceKind::Ethernet)
            .access_point("cafe", "latte1234"),
    )
    .unwrap();

    assert!(np.plan().wifis.is_none());
    let eth1 = np.plan().interface(InterfaceKind::Ethernet, "eth1").unwrap();
    assert!(eth1.access_points.is_none());
}

#[test]
fn test_validation_errors_name_fields() {
    let mut np = netplan();
    let err = np
        .configure_interface(
            "eth0",
            &InterfaceOptions::new()
                .ip("192.168.4.300")
                .prefix(33)
                .domain("not a domain")
                .nameservers(["8.8.8.8", "dns.google"]),
        )
        .unwrap_err();

    let fields: Vec<&str> = err
        .validation_errors()
        .iter()
        .map(|e| e.field.as_str())
        .collect();
    assert!(fields.contains(&"ip"));
    assert!(fields.contains(&"prefix"));
    assert!(fields.contains(&"domain"));
    assert!(fields.contains(&"nameservers[1]"));
    assert!(np.plan().ethernets.is_none());
}

// ============================================================================
// configure_netplan_interface
// ============================================================================

#[test]
fn test_netplan_interface_from_yaml_definition() {
    let mut np = netplan();
    let definition: InterfaceDefinition = serde_yaml::from_str(
        "addresses: [192.168.4.8/24]\nmtu: 9000\nmacaddress: 52:54:00:12:34:56\n",
    )
    .unwrap();
    np.configure_netplan_interface("eth0", InterfaceKind::Ethernet, definition)
        .unwrap();

    let yaml = as_yaml(&np);
    let eth0 = &yaml["network"]["ethernets"]["eth0"];
    assert_eq!(eth0["mtu"].as_u64(), Some(9000));
    assert_eq!(eth0["macaddress"].as_str(), Some("52:54:00:12:34:56"));
}

#[test]
fn test_netplan_interface_gatewayless_routes_and_address_options() {
    let mut np = netplan();
    let input: NetplanInterface = serde_json::from_str(
        r#"{
            "name": "eth1",
            "type": "ethernet",
            "definition": {
                "addresses": [{"10.0.0.5/24": {"lifetime": 0}}],
                "routes": [{"to": "10.0.0.0/8", "scope": "link"}]
            }
        }"#,
    )
    .unwrap();
    np.configure_from(input).unwrap();

    let yaml = as_yaml(&np);
    let eth1 = &yaml["network"]["ethernets"]["eth1"];
    assert_eq!(eth1["addresses"][0]["10.0.0.5/24"]["lifetime"].as_u64(), Some(0));
    assert_eq!(eth1["routes"][0]["scope"].as_str(), Some("link"));
    assert!(eth1["routes"][0].get("via").is_none());
}

#[test]
fn test_netplan_interface_unsupported_type() {
    let err = "bond".parse::<InterfaceKind>().unwrap_err();
    assert!(matches!(err, nplan::Error::UnsupportedType(ref t) if t == "bond"));

    let mut np = netplan();
    let input: NetplanInterface = serde_json::from_str(
        r#"{"name": "bond0", "type": "bond", "definition": {"dhcp4": "yes"}}"#,
    )
    .unwrap();
    assert!(np.configure_from(input).unwrap_err().is_validation());
    assert_eq!(np.plan(), netplan().plan());
}
