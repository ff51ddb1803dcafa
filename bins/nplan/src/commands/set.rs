//! nplan set / set-raw command implementation.

use clap::Args;
use nplan::Netplan;
use nplan::plan::{InterfaceDefinition, InterfaceKind, InterfaceOptions, NetplanInterface};

#[derive(Args)]
pub struct SetCmd {
    /// Interface name.
    name: String,

    /// Use DHCPv4 (static options are ignored).
    #[arg(long)]
    dhcp: bool,

    /// Interface type (ethernet, wifi). Defaults to wifi when --ssid is given.
    #[arg(short = 't', long = "type")]
    kind: Option<InterfaceKind>,

    /// Static IP address.
    #[arg(long)]
    ip: Option<String>,

    /// Prefix length for --ip.
    #[arg(long)]
    prefix: Option<u32>,

    /// Default gateway.
    #[arg(short = 'g', long)]
    gateway: Option<String>,

    /// DNS search domain.
    #[arg(long)]
    domain: Option<String>,

    /// DNS server (repeatable).
    #[arg(short = 'n', long = "nameserver")]
    nameservers: Vec<String>,

    /// Wifi network name.
    #[arg(long, requires = "password")]
    ssid: Option<String>,

    /// Wifi password.
    #[arg(long, requires = "ssid")]
    password: Option<String>,

    /// Run `netplan apply` if the file changed.
    #[arg(long)]
    apply: bool,
}

impl SetCmd {
    fn options(&self) -> InterfaceOptions {
        let mut opts = if self.dhcp {
            InterfaceOptions::dhcp()
        } else {
            InterfaceOptions::new()
        };

        if let Some(kind) = self.kind {
            opts = opts.kind(kind);
        }
        if let Some(ip) = &self.ip {
            opts = opts.ip(ip);
        }
        if let Some(prefix) = self.prefix {
            opts = opts.prefix(prefix);
        }
        if let Some(gw) = &self.gateway {
            opts = opts.default_gateway(gw);
        }
        if let Some(domain) = &self.domain {
            opts = opts.domain(domain);
        }
        if !self.nameservers.is_empty() {
            opts = opts.nameservers(&self.nameservers);
        }
        if let (Some(ssid), Some(password)) = (&self.ssid, &self.password) {
            opts = opts.access_point(ssid, password);
        }

        opts
    }

    pub async fn run(&self, netplan: &mut Netplan, renderer: Option<&str>) -> anyhow::Result<()> {
        super::load(netplan, renderer)?;
        netplan.configure_interface(&self.name, &self.options())?;
        save(netplan, self.apply).await
    }
}

#[derive(Args)]
pub struct SetRawCmd {
    /// Interface name.
    name: String,

    /// Interface type (ethernet, wifi).
    #[arg(short = 't', long = "type", default_value = "ethernet")]
    kind: String,

    /// Interface definition as YAML or JSON, e.g. '{dhcp4: yes, mtu: 9000}'.
    #[arg(short = 'd', long)]
    definition: String,

    /// Run `netplan apply` if the file changed.
    #[arg(long)]
    apply: bool,
}

impl SetRawCmd {
    pub async fn run(&self, netplan: &mut Netplan, renderer: Option<&str>) -> anyhow::Result<()> {
        super::load(netplan, renderer)?;

        let definition: InterfaceDefinition = serde_yaml::from_str(&self.definition)?;
        netplan.configure_from(NetplanInterface {
            name: Some(self.name.clone()),
            kind: Some(self.kind.clone()),
            definition: Some(definition),
        })?;
        save(netplan, self.apply).await
    }
}

/// Write the plan file and optionally apply it.
async fn save(netplan: &mut Netplan, apply: bool) -> anyhow::Result<()> {
    let path = netplan.config_file().display().to_string();
    if netplan.write_config()? {
        println!("Wrote {}", path);
    } else {
        println!("{} unchanged", path);
    }

    if apply && netplan.apply(false).await?.is_some() {
        println!("Applied");
    }
    Ok(())
}
