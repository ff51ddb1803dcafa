//! Integration tests for plan files on disk.

use nplan::command::BinaryPaths;
use nplan::plan::{InterfaceAddress, InterfaceKind, InterfaceOptions};
use nplan::store::{OsFs, read_key_values};
use nplan::{Netplan, NetplanOptions};

use crate::common::{FixtureRunner, fixture};

fn netplan_at(path: &std::path::Path) -> Netplan<FixtureRunner, OsFs> {
    Netplan::with_parts(
        NetplanOptions::new().config_file(path.to_str().unwrap()),
        FixtureRunner::new(),
        OsFs,
        BinaryPaths::default(),
    )
    .unwrap()
}

#[test]
fn test_write_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    let mut np = netplan_at(&path);
    np.configure_interface(
        "eth0",
        &InterfaceOptions::new()
            .ip("192.168.4.8")
            .prefix(16)
            .default_gateway("192.168.4.1"),
    )
    .unwrap();
    assert!(np.write_config().unwrap());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), np.new_config());

    let mut reloaded = netplan_at(&path);
    reloaded.load_config().unwrap();
    assert_eq!(reloaded.plan(), np.plan());

    let eth0 = reloaded
        .plan()
        .interface(InterfaceKind::Ethernet, "eth0")
        .unwrap();
    assert_eq!(eth0.addresses, Some(vec![InterfaceAddress::from("192.168.4.8/16")]));
    assert_eq!(eth0.default_gateway(), Some("192.168.4.1"));
}

#[test]
fn test_unchanged_plan_is_not_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    let mut np = netplan_at(&path);
    np.configure_interface("eth0", &InterfaceOptions::dhcp()).unwrap();
    assert!(np.write_config().unwrap());

    let mut again = netplan_at(&path);
    again.load_config().unwrap();
    assert!(!again.write_config().unwrap());
    assert_eq!(again.old_config(), again.new_config());
}

#[test]
fn test_unknown_sections_survive_edit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("01-bridge.yaml");
    std::fs::write(&path, fixture("bridged.yaml")).unwrap();

    let mut np = netplan_at(&path);
    np.load_config().unwrap();
    assert_eq!(np.plan().renderer.as_str(), "NetworkManager");

    np.configure_interface("wlan0", &InterfaceOptions::dhcp().access_point("home", "hunter22"))
        .unwrap();
    assert!(np.write_config().unwrap());

    let written: serde_yaml::Value =
        serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let network = &written["network"];
    assert_eq!(network["bridges"]["br0"]["interfaces"][0].as_str(), Some("enp3s0"));
    assert_eq!(network["ethernets"]["enp3s0"]["optional"].as_bool(), Some(true));
    assert!(network["wifis"]["wlan0"]["access-points"]["home"].is_mapping());
}

#[test]
fn test_missing_file_keeps_initial_plan() {
    let dir = tempfile::tempdir().unwrap();
    let mut np = netplan_at(&dir.path().join("absent.yaml"));
    np.configure_interface("eth0", &InterfaceOptions::dhcp()).unwrap();

    np.load_config().unwrap();
    assert!(np.plan().interface(InterfaceKind::Ethernet, "eth0").is_some());
}

#[test]
fn test_read_key_values_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("os-release");
    std::fs::write(&path, "NAME=Ubuntu\nVERSION_ID=24.04\n\nID_LIKE=debian\n").unwrap();

    let values = read_key_values(&OsFs, &path).unwrap();
    assert_eq!(values["NAME"], "Ubuntu");
    assert_eq!(values["VERSION_ID"], "24.04");
    assert_eq!(values.len(), 3);
}
