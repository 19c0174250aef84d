use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "calnotes",
    version,
    about = "Terminal month calendar with short notes per day"
)]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
    /// Log filter, e.g. info or calnotes=debug (RUST_LOG wins when set)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,
    /// Log file path
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
    /// Month to open, as YYYY-MM (defaults to the current month)
    #[arg(long, global = true)]
    pub month: Option<String>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Launch the interactive calendar
    Tui,
    /// Print the month grid and exit
    Grid,
}
