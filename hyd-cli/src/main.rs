//! hydroperiod - per-pixel inundation duration from dated binary masks.
//!
//! Running without a subcommand asks for the input directory and computes
//! with default settings.

use clap::Parser;
use env_logger::Env;

#[derive(Parser)]
#[command(
    name = "hydroperiod",
    version,
    about = "Hydroperiod maps from dated binary inundation masks"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<hyd_cmd::Command>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_default();
    log::debug!("Running {:?}", command);
    hyd_cmd::run(command)
}
