//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs logging
//! - refreshes the cache and runs the catalogue pipeline
//! - prints reports and writes optional exports

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{CacheArgs, CatalogueArgs, Command, ExportArgs, RankArgs, ShowArgs};
use crate::data::{CachePaths, TepcatClient, refresh_cache};
use crate::domain::{CatalogueConfig, DerivedGroups};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `tepcat` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();
    init_logging(cli.quiet);

    match cli.command {
        Command::Fetch(args) => handle_fetch(args),
        Command::Summary(args) => handle_summary(args),
        Command::Rank(args) => handle_rank(args),
        Command::Show(args) => handle_show(args),
        Command::Export(args) => handle_export(args),
    }
}

fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // stdout is reserved for reports.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_fetch(args: CacheArgs) -> Result<(), AppError> {
    let cache_dir = resolve_cache_dir(&args);
    let paths = CachePaths {
        observables: cache_dir.join(&args.observables),
        physical: cache_dir.join(&args.physical),
    };
    let client = TepcatClient::from_env()?;
    let outcome = refresh_cache(&client, &paths, true)?;
    println!("{}", outcome.describe());
    Ok(())
}

fn handle_summary(args: CatalogueArgs) -> Result<(), AppError> {
    let config = config_from_args(&args, false);
    let run = pipeline::run_pipeline(&config)?;

    print!(
        "{}",
        crate::report::format_run_summary(&run.report, &run.catalogue, &config)
    );
    println!();
    print!("{}", crate::report::format_unmatched(&run.report.merge));

    signal_failure(run.report.signal_error)
}

fn handle_rank(args: RankArgs) -> Result<(), AppError> {
    let mut catalogue_args = args.catalogue;
    catalogue_args.derive = DerivedGroups::Signal;
    let config = config_from_args(&catalogue_args, true);
    let run = pipeline::run_pipeline(&config)?;

    if run.catalogue.is_empty() {
        return Err(AppError::new(3, "No systems with reliable V/K magnitudes remain."));
    }

    println!(
        "Top {} of {} systems by transmission signal (relative to {}):\n",
        args.top.min(run.catalogue.len()),
        run.catalogue.len(),
        config.reference
    );
    print!("{}", crate::report::format_ranking(&run.catalogue, args.top));
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let config = config_from_args(&args.catalogue, false);
    let run = pipeline::run_pipeline(&config)?;
    print!("{}", show_system(run, &args.name)?);
    Ok(())
}

/// The per-system view, or the reason it cannot be shown.
fn show_system(run: pipeline::RunOutput, name: &str) -> Result<String, AppError> {
    signal_failure(run.report.signal_error)?;

    let row = run.catalogue.index_of(name).ok_or_else(|| {
        AppError::new(
            3,
            format!("'{name}' is not in the catalogue (unknown, dropped, or lacking V/K magnitudes)."),
        )
    })?;
    Ok(crate::report::format_system(&run.catalogue, row))
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    if args.json.is_none() && args.csv.is_none() {
        return Err(AppError::new(2, "Nothing to export: pass `--json` and/or `--csv`."));
    }

    let mut catalogue_args = args.catalogue;
    if args.rank {
        catalogue_args.derive = DerivedGroups::Signal;
    }
    let config = config_from_args(&catalogue_args, args.rank);
    let run = pipeline::run_pipeline(&config)?;
    signal_failure(run.report.signal_error)?;

    if let Some(path) = &args.json {
        crate::io::export::write_catalogue_json(path, &run.catalogue, &config)?;
        println!("Wrote {} systems to {}", run.catalogue.len(), path.display());
    }
    if let Some(path) = &args.csv {
        crate::io::export::write_catalogue_csv(path, &run.catalogue)?;
        println!("Wrote {} systems to {}", run.catalogue.len(), path.display());
    }

    Ok(())
}

/// Signal metrics that were requested but could not be computed are a hard failure.
fn signal_failure(err: Option<crate::error::CatalogueError>) -> Result<(), AppError> {
    match err {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// `--dir`, else `$TEPCAT_DIR`, else the working directory.
fn resolve_cache_dir(args: &CacheArgs) -> PathBuf {
    args.dir
        .clone()
        .or_else(|| std::env::var_os("TEPCAT_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve CLI flags, environment and defaults into a pipeline configuration.
pub fn config_from_args(args: &CatalogueArgs, rank: bool) -> CatalogueConfig {
    CatalogueConfig {
        cache_dir: resolve_cache_dir(&args.cache),
        observables_file: args.cache.observables.clone(),
        physical_file: args.cache.physical.clone(),
        refresh: args.refresh,
        groups: args.derive,
        reference: args.reference.clone(),
        rank,
        ..CatalogueConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogueError;

    #[test]
    fn explicit_dir_wins() {
        let args = CatalogueArgs {
            cache: CacheArgs {
                dir: Some(PathBuf::from("/tmp/tepcat")),
                observables: "obs.txt".to_string(),
                physical: "phys.txt".to_string(),
            },
            refresh: true,
            derive: DerivedGroups::Signal,
            reference: "WASP-43b".to_string(),
        };
        let config = config_from_args(&args, true);
        assert_eq!(config.observables_path(), PathBuf::from("/tmp/tepcat/obs.txt"));
        assert_eq!(config.physical_path(), PathBuf::from("/tmp/tepcat/phys.txt"));
        assert!(config.refresh && config.rank);
        assert_eq!(config.groups, DerivedGroups::Signal);
        assert_eq!(config.reference, "WASP-43b");
    }

    fn run_with(names: &[&str]) -> pipeline::RunOutput {
        use crate::test_support::{observable_line, physical_line, write_tables};
        let dir = tempfile::tempdir().unwrap();
        let observables: Vec<String> = names
            .iter()
            .map(|n| observable_line(n, 10.0, 9.0, 0.1, 0.01, 2.0))
            .collect();
        let physical: Vec<String> = names
            .iter()
            .map(|n| physical_line(n, 5500.0, 1.0, 1.0, 1.0, 1.0))
            .collect();
        write_tables(dir.path(), &observables, &physical);

        let config = CatalogueConfig {
            cache_dir: dir.path().to_path_buf(),
            ..CatalogueConfig::default()
        };
        pipeline::build_catalogue(&config, crate::data::RefreshOutcome::NotRequested).unwrap()
    }

    #[test]
    fn show_prints_known_system() {
        let text = show_system(run_with(&["WASP-12b"]), "WASP-12b").unwrap();
        assert!(text.starts_with("WASP-12b\n"));
    }

    #[test]
    fn show_unknown_system_exits_3() {
        let err = show_system(run_with(&["WASP-12b"]), "WASP-99b").unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn show_refuses_when_signal_metrics_failed() {
        let mut run = run_with(&["WASP-12b"]);
        run.report.signal_error = Some(CatalogueError::ReferenceNotFound("HD209458b".to_string()));
        let err = show_system(run, "WASP-12b").unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
