use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use report_tree::cli::{self, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let workspace = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let listing = cli::run(&args, &workspace)?;
    io::stdout().write_all(listing.as_bytes())?;
    Ok(())
}
