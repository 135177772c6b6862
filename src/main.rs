mod cli;
mod compute_cmd;
mod config;
mod convert;
mod logging;
mod pet_cmd;
mod series;

use std::process;

use anyhow::Result;
use clap::Parser;
use drought_index::IndexKind;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Spi(args) => compute_cmd::run(IndexKind::Spi, args),
        Command::Spei(args) => compute_cmd::run(IndexKind::Spei, args),
        Command::Pnp(args) => compute_cmd::run(IndexKind::Pnp, args),
        Command::Pet(args) => pet_cmd::run(args),
    }
}
