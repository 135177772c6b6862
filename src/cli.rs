use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Standardized drought indices from climate time series.
#[derive(Parser)]
#[command(
    name = "drought",
    version,
    about = "Standardized drought indices (SPI, SPEI, PNP) and PET"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Standardized Precipitation Index.
    Spi(IndexArgs),
    /// Standardized Precipitation-Evapotranspiration Index.
    Spei(IndexArgs),
    /// Percent of normal precipitation.
    Pnp(IndexArgs),
    /// Estimate potential evapotranspiration from temperature.
    Pet(PetArgs),
}

/// Arguments for the index subcommands.
#[derive(clap::Args)]
pub struct IndexArgs {
    /// Path to TOML configuration file (defaults apply when omitted).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the input series JSON document.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path for the output JSON (stdout when omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the accumulation scale from config.
    #[arg(short, long)]
    pub scale: Option<usize>,
}

/// Arguments for the `pet` subcommand.
#[derive(clap::Args)]
pub struct PetArgs {
    /// Path to TOML configuration file (defaults apply when omitted).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the input series JSON document.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path for the output series JSON with PET filled in (stdout when omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
