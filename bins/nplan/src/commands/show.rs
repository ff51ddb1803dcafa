//! nplan show command implementation.

use clap::Args;
use nplan::Netplan;
use nplan::plan::InterfaceKind;
use nplan::store::serialize;

#[derive(Args)]
pub struct ShowCmd {
    /// Only show this interface.
    name: Option<String>,
}

impl ShowCmd {
    pub fn run(&self, netplan: &mut Netplan, renderer: Option<&str>) -> anyhow::Result<()> {
        super::load(netplan, renderer)?;

        let Some(name) = &self.name else {
            print!("{}", serialize(netplan.document())?);
            return Ok(());
        };

        let found = [InterfaceKind::Ethernet, InterfaceKind::Wifi]
            .into_iter()
            .find_map(|kind| netplan.plan().interface(kind, name).map(|def| (kind, def)));

        match found {
            Some((kind, definition)) => {
                println!("# {} ({})", name, kind.as_str());
                print!("{}", serde_yaml::to_string(definition)?);
                Ok(())
            }
            None => anyhow::bail!("interface \"{}\" is not configured", name),
        }
    }
}
