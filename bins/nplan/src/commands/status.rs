//! nplan status command implementation.

use std::io::{self, Write};

use clap::{Args, ValueEnum};
use nplan::Netplan;
use nplan::status::{InterfaceStatus, StatusMap};

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct StatusCmd {
    /// Only show this interface.
    name: Option<String>,

    /// Output format.
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl StatusCmd {
    pub async fn run(&self, netplan: &Netplan) -> anyhow::Result<()> {
        let mut status = netplan.status().await?;
        if let Some(name) = &self.name {
            status.retain(|n, _| n == name);
            if status.is_empty() {
                anyhow::bail!("interface \"{}\" not found", name);
            }
        }

        let stdout = io::stdout();
        let mut out = stdout.lock();
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut out, &status)?;
                writeln!(out)?;
            }
            OutputFormat::Text => print_text(&mut out, &status)?,
        }
        Ok(())
    }
}

fn print_text<W: Write>(w: &mut W, status: &StatusMap) -> io::Result<()> {
    for (name, iface) in status {
        print_interface(w, name, iface)?;
    }
    Ok(())
}

fn print_interface<W: Write>(w: &mut W, name: &str, iface: &InterfaceStatus) -> io::Result<()> {
    write!(w, "{}:", name)?;
    if let Some(link_type) = &iface.link_type {
        write!(w, " link/{}", link_type)?;
    }
    if let Some(mac) = &iface.mac {
        write!(w, " {}", mac)?;
    }
    writeln!(w)?;

    if let Some(v4) = &iface.ipv4 {
        writeln!(w, "    inet {}", v4)?;
    }
    if let Some(v6) = &iface.ipv6 {
        writeln!(w, "    inet6 {}", v6)?;
    }
    Ok(())
}
