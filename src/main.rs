mod cli;

use anyhow::Result;
use clap::Parser;
use dealflow::commands::common::load_config;

use cli::dispatch::dispatch;
use cli::types::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config()?;
    dealflow::logging::init(cli.verbose, &config.logging.level);

    dispatch(cli.command)
}
