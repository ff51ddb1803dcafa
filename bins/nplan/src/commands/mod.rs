//! nplan command implementations.

pub mod netplan;
pub mod set;
pub mod show;
pub mod status;

use nplan::Netplan;

/// Load the plan file, then apply a renderer given on the command line.
pub(crate) fn load(netplan: &mut Netplan, renderer: Option<&str>) -> anyhow::Result<()> {
    netplan.load_config()?;
    if let Some(renderer) = renderer {
        netplan.plan_mut().renderer = renderer.parse()?;
    }
    Ok(())
}
