//! Integration tests for status reports.

use nplan::status::{build_status, parse_addresses_json, parse_addresses_text};
use nplan::store::MemoryFs;
use nplan::{Netplan, NetplanOptions};

use crate::common::{FixtureRunner, fake_binaries, fixture};

fn netplan(runner: FixtureRunner) -> Netplan<FixtureRunner, MemoryFs> {
    Netplan::with_parts(NetplanOptions::new(), runner, MemoryFs::new(), fake_binaries()).unwrap()
}

#[tokio::test]
async fn test_status_from_json_dump() {
    let runner = FixtureRunner::new()
        .stdout_from("ip -j addr", "ip_addr.json")
        .stdout_from("route -n", "route.txt")
        .stdout_from("route -6n", "route6.txt");
    let np = netplan(runner);

    let status = np.status().await.unwrap();
    assert_eq!(status.len(), 3);

    let eno1 = &status["eno1"];
    assert_eq!(eno1.link_type.as_deref(), Some("ether"));
    assert_eq!(eno1.mac.as_deref(), Some("52:54:00:12:34:56"));

    let v4 = eno1.ipv4.as_ref().unwrap();
    assert_eq!(v4.ip, "192.168.1.5");
    assert_eq!(v4.prefix, Some(24));
    assert_eq!(v4.broadcast.as_deref(), Some("192.168.1.255"));
    assert_eq!(v4.gateway.as_deref(), Some("192.168.1.1"));

    let v6 = eno1.ipv6.as_ref().unwrap();
    assert_eq!(v6.ip, "2001:db8::5");
    assert_eq!(v6.gateway.as_deref(), Some("fe80::1"));

    // Default route through an interface without an address
    assert!(status["wlp2s0"].ipv4.is_none());
    // Unreachable IPv6 default on loopback
    assert!(status["lo"].ipv6.as_ref().unwrap().gateway.is_none());
}

#[tokio::test]
async fn test_status_ipv6_failure_keeps_ipv4() {
    let runner = FixtureRunner::new()
        .stdout_from("ip -j addr", "ip_addr.json")
        .stdout_from("route -n", "route.txt")
        .exit("route -6n", 1);
    let np = netplan(runner);

    let status = np.status().await.unwrap();
    let eno1 = &status["eno1"];
    assert_eq!(
        eno1.ipv4.as_ref().unwrap().gateway.as_deref(),
        Some("192.168.1.1")
    );
    assert!(eno1.ipv6.as_ref().unwrap().gateway.is_none());
}

#[tokio::test]
async fn test_status_address_failure() {
    let runner = FixtureRunner::new().exit("ip -j addr", 255);
    let np = netplan(runner);

    let err = np.status().await.unwrap_err();
    assert_eq!(err.exit_code(), Some(255));
}

#[tokio::test]
async fn test_status_text_dump_fallback() {
    let runner = FixtureRunner::new()
        .stdout_from("ip -j addr", "ip_addr.txt")
        .stdout_from("route -n", "route.txt")
        .stdout_from("route -6n", "route6.txt");
    let np = netplan(runner);

    let status = np.status().await.unwrap();
    assert_eq!(
        status["eno1"].ipv4.as_ref().unwrap().gateway.as_deref(),
        Some("192.168.1.1")
    );
}

#[test]
fn test_json_and_text_dumps() {
    let json = parse_addresses_json(&fixture("ip_addr.json")).unwrap();
    let text = parse_addresses_text(&fixture("ip_addr.txt"));
    assert_eq!(json["lo"], text["lo"]);
    assert_eq!(json["wlp2s0"], text["wlp2s0"]);

    // JSON reports the first address per family, text the last.
    let (json_eno1, text_eno1) = (&json["eno1"], &text["eno1"]);
    assert_eq!(json_eno1.mac, text_eno1.mac);
    assert_eq!(json_eno1.ipv4.as_ref().unwrap().ip, "192.168.1.5");
    assert_eq!(text_eno1.ipv4.as_ref().unwrap().ip, "192.168.1.6");
    assert_eq!(text_eno1.ipv6.as_ref().unwrap().ip, "fe80::5054:ff:fe12:3456");
}

#[test]
fn test_json_status_shape() {
    let status = build_status(
        &fixture("ip_addr.json"),
        &fixture("route.txt"),
        Some(&fixture("route6.txt")),
    );
    let value = serde_json::to_value(&status).unwrap();

    assert_eq!(value["lo"]["type"], "loopback");
    assert_eq!(value["eno1"]["ipv6"]["prefix"], 64);
    assert!(value["wlp2s0"].get("ipv4").is_none());
    assert!(value["wlp2s0"].get("ipv6").is_none());
}
