//! Declarative network configuration through netplan.
//!
//! This crate builds and edits a netplan plan in memory, persists it as
//! YAML, runs `netplan generate` / `netplan apply`, and reports the live
//! state of every interface by merging `ip -j addr`, `route -n` and
//! `route -6n` output.
//!
//! # Example
//!
//! ```ignore
//! use nplan::plan::InterfaceOptions;
//! use nplan::{Netplan, NetplanOptions};
//!
//! #[tokio::main]
//! async fn main() -> nplan::Result<()> {
//!     let mut netplan = Netplan::new(NetplanOptions::new())?;
//!     netplan.load_config()?;
//!
//!     // Static address with a default route
//!     netplan.configure_interface(
//!         "eth0",
//!         &InterfaceOptions::new()
//!             .ip("192.168.4.8")
//!             .default_gateway("192.168.4.1")
//!             .nameservers(["192.168.4.1"])
//!             .domain("example.com"),
//!     )?;
//!
//!     // Wifi with DHCP
//!     netplan.configure_interface(
//!         "wlan0",
//!         &InterfaceOptions::dhcp().access_point("home", "hunter22"),
//!     )?;
//!
//!     if netplan.write_config()? {
//!         netplan.apply(false).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Status
//!
//! ```ignore
//! let status = netplan.status().await?;
//! for (name, iface) in &status {
//!     if let Some(v4) = &iface.ipv4 {
//!         println!("{}: {}", name, v4);
//!     }
//! }
//! ```

// Core modules
pub mod command;
pub mod error;
pub mod plan;
pub mod status;
pub mod store;
pub mod util;
pub mod validation;

mod netplan;

// Re-export common types at crate root for convenience
pub use error::{Error, Result};
pub use netplan::{DEFAULT_CONFIG_FILE, Netplan, NetplanOptions, NetworkOptions};
