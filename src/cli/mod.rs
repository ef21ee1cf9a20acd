//! Command-line parsing for the TEPCat catalogue tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! catalogue pipeline and from presentation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_OBSERVABLES_FILE, DEFAULT_PHYSICAL_FILE, DEFAULT_REFERENCE, DerivedGroups};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "tepcat",
    version,
    about = "Merge the TEPCat tables into a target catalogue for transit/eclipse noise simulations"
)]
pub struct Cli {
    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download the latest tables over the local cache (falls back to the cache when offline).
    Fetch(CacheArgs),
    /// Build the catalogue and print per-stage counts and unmatched systems.
    Summary(CatalogueArgs),
    /// Rank systems by relative transmission signal.
    Rank(RankArgs),
    /// Print every catalogue field for one system.
    Show(ShowArgs),
    /// Write the catalogue to JSON and/or CSV.
    Export(ExportArgs),
}

/// Where the cached tables live.
#[derive(Debug, Args, Clone)]
pub struct CacheArgs {
    /// Cache directory (defaults to `$TEPCAT_DIR`, else the working directory).
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Observables table file name ("for planning observations").
    #[arg(long, default_value = DEFAULT_OBSERVABLES_FILE)]
    pub observables: String,

    /// Physical-properties table file name ("well-studied transiting planets").
    #[arg(long, default_value = DEFAULT_PHYSICAL_FILE)]
    pub physical: String,
}

/// Common options for building the catalogue.
#[derive(Debug, Args, Clone)]
pub struct CatalogueArgs {
    #[command(flatten)]
    pub cache: CacheArgs,

    /// Try to download the latest tables before loading.
    #[arg(long)]
    pub refresh: bool,

    /// Which derived quantities to compute.
    #[arg(long, value_enum, default_value_t = DerivedGroups::Physical)]
    pub derive: DerivedGroups,

    /// System that signal metrics are normalized to.
    #[arg(long, default_value = DEFAULT_REFERENCE)]
    pub reference: String,
}

#[derive(Debug, Args, Clone)]
pub struct RankArgs {
    #[command(flatten)]
    pub catalogue: CatalogueArgs,

    /// Show the top-N systems.
    #[arg(long, default_value_t = 20)]
    pub top: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub catalogue: CatalogueArgs,

    /// System name, matched exactly (e.g. `WASP-12b`).
    pub name: String,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub catalogue: CatalogueArgs,

    /// Sort by descending transmission signal (implies `--derive signal`).
    #[arg(long)]
    pub rank: bool,

    /// Write column-oriented JSON.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,

    /// Write one CSV row per system.
    #[arg(long, value_name = "CSV")]
    pub csv: Option<PathBuf>,
}
