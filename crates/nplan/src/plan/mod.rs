//! The in-memory netplan document.
//!
//! A [`PlanDocument`] mirrors the YAML file netplan reads:
//!
//! ```yaml
//! network:
//!   version: 2
//!   renderer: networkd
//!   ethernets:
//!     eth0:
//!       dhcp4: 'yes'
//!   wifis:
//!     wlan0:
//!       access-points:
//!         home:
//!           password: hunter22
//! ```
//!
//! Interfaces are added either from a ready-made definition with
//! [`NetworkPlan::configure_netplan_interface`] or from high-level intent
//! with [`NetworkPlan::configure_interface`]:
//!
//! ```
//! use nplan::plan::{InterfaceOptions, NetworkPlan};
//!
//! let mut plan = NetworkPlan::default();
//! plan.configure_interface("eth0", &InterfaceOptions::dhcp())?;
//! plan.configure_interface(
//!     "wlan0",
//!     &InterfaceOptions::new().access_point("home", "hunter22"),
//! )?;
//!
//! assert!(plan.ethernets.as_ref().unwrap()["eth0"].is_dhcp());
//! assert!(plan.wifis.as_ref().unwrap().contains_key("wlan0"));
//! # Ok::<(), nplan::Error>(())
//! ```

mod builder;
mod types;

pub use builder::{AccessPointOptions, DEFAULT_PREFIX, InterfaceOptions};
pub use types::*;

use serde::Deserialize;

use crate::error::Result;
use crate::validation::{Validatable, ValidationResult, validate_required};

/// A ready-made interface definition, as accepted from JSON or YAML input.
///
/// The type is kept as a string so unsupported values can be reported.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NetplanInterface {
    /// Interface name.
    #[serde(default)]
    pub name: Option<String>,

    /// `ethernet` (default) or `wifi`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Definition stored verbatim.
    #[serde(default)]
    pub definition: Option<InterfaceDefinition>,
}

impl Validatable for NetplanInterface {
    fn validate(&self) -> ValidationResult {
        let mut result = validate_required(self.name.as_deref(), "name");

        if let Some(kind) = &self.kind
            && kind.parse::<InterfaceKind>().is_err()
        {
            result.add_error("type", format!("must be one of ethernet, wifi, got '{}'", kind));
        }
        if self.definition.is_none() {
            result.add_error("definition", "is required");
        }

        result
    }
}

impl NetworkPlan {
    /// Store a definition under `name`, replacing any previous one.
    ///
    /// The section for `kind` is created if it does not exist yet. A second
    /// call for the same name and kind replaces the definition outright.
    pub fn configure_netplan_interface(
        &mut self,
        name: &str,
        kind: InterfaceKind,
        definition: InterfaceDefinition,
    ) -> Result<()> {
        validate_required(Some(name), "name").into_result()?;

        tracing::debug!(name, section = kind.section(), "configuring interface");
        self.interfaces_mut(kind).insert(name.to_string(), definition);
        Ok(())
    }

    /// Validate and store a ready-made interface definition.
    pub fn configure_from(&mut self, input: NetplanInterface) -> Result<()> {
        input.validate().into_result()?;

        let kind = match input.kind.as_deref() {
            Some(kind) => kind.parse()?,
            None => InterfaceKind::default(),
        };
        let name = input.name.unwrap_or_default();
        let definition = input.definition.unwrap_or_default();
        self.configure_netplan_interface(&name, kind, definition)
    }

    /// Build a definition from high-level intent and store it under `name`.
    pub fn configure_interface(&mut self, name: &str, options: &InterfaceOptions) -> Result<()> {
        validate_required(Some(name), "name").into_result()?;
        let (kind, definition) = options.build()?;
        self.configure_netplan_interface(name, kind, definition)
    }
}
