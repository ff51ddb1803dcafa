//! nplan generate / apply command implementation.

use clap::Args;
use nplan::Netplan;
use nplan::command::CommandOutput;

#[derive(Args)]
pub struct GenerateCmd {}

impl GenerateCmd {
    pub async fn run(&self, netplan: &Netplan) -> anyhow::Result<()> {
        print_output(&netplan.generate().await?);
        Ok(())
    }
}

#[derive(Args)]
pub struct ApplyCmd {}

impl ApplyCmd {
    pub async fn run(&self, netplan: &Netplan) -> anyhow::Result<()> {
        if let Some(output) = netplan.apply(true).await? {
            print_output(&output);
        }
        Ok(())
    }
}

fn print_output(output: &CommandOutput) {
    if !output.stdout.is_empty() {
        println!("{}", output.stdout);
    }
    if !output.stderr.is_empty() {
        eprintln!("{}", output.stderr);
    }
}
