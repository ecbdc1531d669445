// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! CLI entry point for lattice probe sessions.
// The CLI is expected to print to stdout.
#![allow(clippy::print_stdout)]

use anyhow::Result;
use clap::Parser;
use lattice_cli::cli::{execute, Cli};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let out = execute(cli)?;
    println!("{out}");
    Ok(())
}
