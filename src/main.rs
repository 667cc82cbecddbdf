//! CLI entry point for generating unique trait collections and auditing them for duplicates

use clap::Parser;
use env_logger::Env;
use layerforge::io::cli::{Cli, CommandProcessor};

fn main() -> layerforge::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_level()))
        .format_timestamp(None)
        .init();

    let processor = CommandProcessor::new(cli);
    processor.process().inspect_err(|e| {
        if e.is_configuration_error() {
            log::error!("Configuration error: {e}");
        }
    })
}
