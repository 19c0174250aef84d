mod calendar;
mod cli;
mod commands;
mod config;
mod dialog;
mod logging;
mod model;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing::info;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let location = config::locate_config(args.config);
    let mut config = config::load_config(location.as_ref())?;
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if let Some(path) = args.log_file {
        config.log_file = Some(path);
    }
    logging::init_logging(&config)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting calnotes");

    let command = args.command.unwrap_or(cli::Command::Tui);
    match command {
        cli::Command::Tui => commands::tui(&config, args.month.as_deref()),
        cli::Command::Grid => commands::grid(args.month.as_deref()),
    }
}
