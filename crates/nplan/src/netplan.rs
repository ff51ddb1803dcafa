//! The configuration object tying plan, persistence and commands together.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::command::{BinaryPaths, CommandOutput, CommandRunner, ProcessRunner, Tool, run_tool};
use crate::error::{Error, Result};
use crate::plan::{
    DEFAULT_VERSION, InterfaceDefinition, InterfaceKind, InterfaceOptions, NetplanInterface,
    NetworkPlan, Passthrough, PlanDocument,
};
use crate::status::{StatusMap, collect_status};
use crate::store::{FileSystem, OsFs, PlanStore};
use crate::validation::{Validatable, ValidationResult, validate_config_path, validate_renderer};

/// Plan file used when none is configured.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/netplan/config.yaml";

/// Initial `network:` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NetworkOptions {
    /// Plan format version, default 2.
    #[serde(default)]
    pub version: Option<u32>,

    /// `networkd` (default) or `NetworkManager`.
    #[serde(default)]
    pub renderer: Option<String>,

    /// Ethernet interfaces to start with.
    #[serde(default)]
    pub ethernets: Option<BTreeMap<String, InterfaceDefinition>>,

    /// Wifi interfaces to start with.
    #[serde(default)]
    pub wifis: Option<BTreeMap<String, InterfaceDefinition>>,

    /// Other sections, kept verbatim.
    #[serde(flatten)]
    pub extra: Passthrough,
}

/// Options for constructing a [`Netplan`].
///
/// Accepts the same shape from JSON or YAML:
///
/// ```json
/// {"network": {"renderer": "NetworkManager"}, "configFile": "/etc/netplan/01.yaml"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetplanOptions {
    /// Initial plan.
    #[serde(default)]
    pub network: Option<NetworkOptions>,

    /// Path of the plan file.
    #[serde(default)]
    pub config_file: Option<String>,
}

impl NetplanOptions {
    /// Create empty options (all defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the renderer.
    pub fn renderer(mut self, renderer: impl Into<String>) -> Self {
        self.network.get_or_insert_with(Default::default).renderer = Some(renderer.into());
        self
    }

    /// Set the plan file path.
    pub fn config_file(mut self, path: impl Into<String>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Parse options from JSON.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| Error::validation("options", e.to_string()))
    }

    /// Parse options from YAML.
    pub fn from_yaml(input: &str) -> Result<Self> {
        serde_yaml::from_str(input).map_err(|e| Error::validation("options", e.to_string()))
    }

    fn config_file_or_default(&self) -> &str {
        self.config_file.as_deref().unwrap_or(DEFAULT_CONFIG_FILE)
    }

    /// Turn validated options into the initial plan.
    fn into_plan(self) -> Result<NetworkPlan> {
        let network = self.network.unwrap_or_default();
        let renderer = match network.renderer.as_deref() {
            Some(r) => r.parse()?,
            None => Default::default(),
        };

        Ok(NetworkPlan {
            version: network.version.unwrap_or(DEFAULT_VERSION),
            renderer,
            ethernets: network.ethernets,
            wifis: network.wifis,
            extra: network.extra,
        })
    }
}

impl Validatable for NetplanOptions {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(renderer) = self.network.as_ref().and_then(|n| n.renderer.as_deref()) {
            result.merge(validate_renderer(renderer, "network.renderer"));
        }
        result.merge(validate_config_path(self.config_file_or_default(), "configFile"));

        result
    }
}

/// A netplan configuration.
///
/// Owns the in-memory plan, the plan file and the tools used to generate
/// and apply it. All mutation goes through `&mut self`; every external
/// command is awaited before the next one starts.
///
/// # Example
///
/// ```no_run
/// use nplan::plan::InterfaceOptions;
/// use nplan::{Netplan, NetplanOptions};
///
/// # async fn run() -> nplan::Result<()> {
/// let mut netplan = Netplan::new(NetplanOptions::new())?;
/// netplan.load_config()?;
/// netplan.configure_interface(
///     "eth0",
///     &InterfaceOptions::new()
///         .ip("192.168.4.8")
///         .default_gateway("192.168.4.1"),
/// )?;
/// netplan.write_config()?;
/// netplan.apply(false).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Netplan<R = ProcessRunner, F = OsFs> {
    plan: PlanDocument,
    store: PlanStore<F>,
    runner: R,
    binaries: BinaryPaths,
    old_config: String,
    new_config: String,
}

impl Netplan {
    /// Validate options and locate binaries on the host.
    pub fn new(options: NetplanOptions) -> Result<Self> {
        Self::with_parts(options, ProcessRunner, OsFs, BinaryPaths::discover())
    }
}

impl<R: CommandRunner, F: FileSystem> Netplan<R, F> {
    /// Validate options and assemble a configuration from explicit parts.
    pub fn with_parts(
        options: NetplanOptions,
        runner: R,
        fs: F,
        binaries: BinaryPaths,
    ) -> Result<Self> {
        options.validate().into_result()?;

        let config_file = options.config_file_or_default().to_string();
        let network = options.into_plan()?;
        tracing::debug!(config_file = %config_file, renderer = %network.renderer, "created netplan configuration");

        Ok(Self {
            plan: PlanDocument::new(network),
            store: PlanStore::new(fs, config_file),
            runner,
            binaries,
            old_config: String::new(),
            new_config: String::new(),
        })
    }

    /// The whole plan document.
    pub fn document(&self) -> &PlanDocument {
        &self.plan
    }

    /// The `network:` section.
    pub fn plan(&self) -> &NetworkPlan {
        &self.plan.network
    }

    /// Mutable access to the `network:` section.
    pub fn plan_mut(&mut self) -> &mut NetworkPlan {
        &mut self.plan.network
    }

    /// Path of the plan file.
    pub fn config_file(&self) -> &Path {
        self.store.path()
    }

    /// Located binaries.
    pub fn binaries(&self) -> &BinaryPaths {
        &self.binaries
    }

    /// Mutable access to the located binaries.
    pub fn binaries_mut(&mut self) -> &mut BinaryPaths {
        &mut self.binaries
    }

    /// File contents seen before the last [`write_config`](Self::write_config).
    pub fn old_config(&self) -> &str {
        &self.old_config
    }

    /// Text produced by the last [`write_config`](Self::write_config).
    pub fn new_config(&self) -> &str {
        &self.new_config
    }

    /// Replace the plan with the contents of the plan file.
    ///
    /// A missing or blank file leaves the current plan untouched.
    pub fn load_config(&mut self) -> Result<()> {
        if let Some(doc) = self.store.load()? {
            self.plan = doc;
        }
        Ok(())
    }

    /// Write the plan file if its contents would change.
    ///
    /// Returns whether the file was written.
    pub fn write_config(&mut self) -> Result<bool> {
        let outcome = self.store.write(&self.plan)?;
        self.old_config = outcome.old;
        self.new_config = outcome.new;
        Ok(outcome.written)
    }

    /// See [`NetworkPlan::configure_netplan_interface`].
    pub fn configure_netplan_interface(
        &mut self,
        name: &str,
        kind: InterfaceKind,
        definition: InterfaceDefinition,
    ) -> Result<()> {
        self.plan
            .network
            .configure_netplan_interface(name, kind, definition)
    }

    /// See [`NetworkPlan::configure_from`].
    pub fn configure_from(&mut self, input: NetplanInterface) -> Result<()> {
        self.plan.network.configure_from(input)
    }

    /// See [`NetworkPlan::configure_interface`].
    pub fn configure_interface(&mut self, name: &str, options: &InterfaceOptions) -> Result<()> {
        self.plan.network.configure_interface(name, options)
    }

    /// Run `netplan generate`.
    pub async fn generate(&self) -> Result<CommandOutput> {
        run_tool(&self.runner, &self.binaries, Tool::Netplan, &["generate"]).await
    }

    /// Run `netplan apply`.
    ///
    /// Unless `force` is set, nothing runs when the last write did not
    /// change the plan file; `Ok(None)` is returned in that case.
    pub async fn apply(&self, force: bool) -> Result<Option<CommandOutput>> {
        if !force && self.old_config == self.new_config {
            tracing::debug!(config_file = %self.config_file().display(), "plan unchanged, skipping apply");
            return Ok(None);
        }

        let output = run_tool(&self.runner, &self.binaries, Tool::Netplan, &["apply"]).await?;
        Ok(Some(output))
    }

    /// Query the live status of every interface.
    pub async fn status(&self) -> Result<StatusMap> {
        collect_status(&self.runner, &self.binaries).await
    }
}
