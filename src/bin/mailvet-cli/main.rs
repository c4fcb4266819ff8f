mod args;
mod commands;
mod output;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use args::{Cli, Commands};

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse_args();
    match cli.command {
        Commands::Check(check) => commands::check(check),
        Commands::Batch(batch) => commands::batch(batch),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}
