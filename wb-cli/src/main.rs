//! WB CLI - Command line tool for Syr Darya water balance analytics.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "wb-cli",
    version,
    about = "Syr Darya water balance analytics toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: wb_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Running {:?}", cli.command);
    wb_cmd::run(cli.command)
}
