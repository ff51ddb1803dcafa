//! nplan command - edit netplan configuration and show interface status.

mod commands;

use clap::{Parser, Subcommand};
use nplan::{DEFAULT_CONFIG_FILE, Netplan, NetplanOptions};

#[derive(Parser)]
#[command(name = "nplan", version, about = "Netplan configuration tool")]
struct Cli {
    /// Netplan configuration file.
    #[arg(short = 'c', long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config_file: String,

    /// Renderer (networkd or NetworkManager).
    #[arg(short = 'r', long, global = true)]
    renderer: Option<String>,

    /// Log debug output.
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the configuration.
    #[command(visible_alias = "s")]
    Show(commands::show::ShowCmd),

    /// Configure an interface from addressing options.
    Set(commands::set::SetCmd),

    /// Configure an interface from a netplan definition.
    SetRaw(commands::set::SetRawCmd),

    /// Run `netplan generate`.
    Generate(commands::netplan::GenerateCmd),

    /// Run `netplan apply`.
    Apply(commands::netplan::ApplyCmd),

    /// Show interface addresses and default gateways.
    #[command(visible_alias = "st")]
    Status(commands::status::StatusCmd),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let mut options = NetplanOptions::new().config_file(&cli.config_file);
    if let Some(renderer) = &cli.renderer {
        options = options.renderer(renderer);
    }
    let mut netplan = Netplan::new(options)?;

    let result = match cli.command {
        Command::Show(cmd) => cmd.run(&mut netplan, cli.renderer.as_deref()),
        Command::Set(cmd) => cmd.run(&mut netplan, cli.renderer.as_deref()).await,
        Command::SetRaw(cmd) => cmd.run(&mut netplan, cli.renderer.as_deref()).await,
        Command::Generate(cmd) => cmd.run(&netplan).await,
        Command::Apply(cmd) => cmd.run(&netplan).await,
        Command::Status(cmd) => cmd.run(&netplan).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
