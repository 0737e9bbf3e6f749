//! fixrec: pack, write, read and unpack fixed-layout binary records.

mod commands;
mod config;
mod sample;
mod store;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::from_cli(cli)?;
    if config.print_config {
        config.print();
    }

    commands::run(&config.action)
}

/// Log to stderr; `RUST_LOG` wins over `-v` flags.
fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
