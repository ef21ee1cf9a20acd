//! Shared catalogue pipeline used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! refresh -> load -> validity filter -> merge -> derive -> brightness filter/rank
//!
//! The CLI can then focus on presentation (summaries, tables, exports).

use tracing::info;

use crate::catalogue::{
    Catalogue, MergeReport, derive, filter_physical, finalize, merge_catalogues, observable_records,
    physical_records,
};
use crate::data::{CachePaths, RefreshOutcome, TableSource, TepcatClient, ensure_cached, refresh_cache};
use crate::domain::CatalogueConfig;
use crate::error::CatalogueError;
use crate::io::table::{OBSERVABLES_SCHEMA, PHYSICAL_SCHEMA, load_table};

/// Counters and diagnostics collected along the way.
#[derive(Debug)]
pub struct PipelineReport {
    pub refresh: RefreshOutcome,
    /// Data rows read from the observables table.
    pub observables_rows: usize,
    /// Data rows read from the physical table (before filtering).
    pub physical_rows: usize,
    /// Systems dropped for non-positive mass or radius.
    pub dropped: Vec<String>,
    pub merge: MergeReport,
    /// Systems removed for lacking positive V and K magnitudes.
    pub brightness_removed: usize,
    /// Why signal metrics are missing, if they were requested.
    pub signal_error: Option<CatalogueError>,
}

/// All outputs of one pipeline run.
#[derive(Debug)]
pub struct RunOutput {
    pub catalogue: Catalogue,
    pub report: PipelineReport,
}

/// Run the full pipeline against the TEPCat web pages.
///
/// The HTTP client is only built when a refresh is requested.
pub fn run_pipeline(config: &CatalogueConfig) -> Result<RunOutput, CatalogueError> {
    if !config.refresh {
        ensure_cached(&cache_paths(config))?;
        return build_catalogue(config, RefreshOutcome::NotRequested);
    }
    let client = TepcatClient::from_env()?;
    run_pipeline_with_source(config, &client)
}

/// Run the full pipeline against an arbitrary table source.
pub fn run_pipeline_with_source<S: TableSource + ?Sized>(
    config: &CatalogueConfig,
    source: &S,
) -> Result<RunOutput, CatalogueError> {
    let refresh = refresh_cache(source, &cache_paths(config), config.refresh)?;
    build_catalogue(config, refresh)
}

fn cache_paths(config: &CatalogueConfig) -> CachePaths {
    CachePaths {
        observables: config.observables_path(),
        physical: config.physical_path(),
    }
}

/// Build the catalogue from the cache files only (no network).
pub fn build_catalogue(config: &CatalogueConfig, refresh: RefreshOutcome) -> Result<RunOutput, CatalogueError> {
    // 1) Load both tables.
    let observables_table = load_table(&config.observables_path(), OBSERVABLES_SCHEMA)?;
    let physical_table = load_table(&config.physical_path(), PHYSICAL_SCHEMA)?;

    // 2) Drop physically incomplete systems before anything divides by them.
    let filtered = filter_physical(&physical_table)?;

    // 3) Cross-match.
    let observables = observable_records(&observables_table)?;
    let physical = physical_records(&filtered.table)?;
    let merged = merge_catalogues(&physical, &observables);

    // 4) Derived quantities (and signal metrics when requested).
    let derivation = derive(
        &merged.records,
        config.groups,
        &config.reference,
        &config.constants,
        &config.settings,
    );

    let signal_error = match derivation.signal_error {
        Some(err) if config.rank => return Err(err),
        other => other,
    };

    // 5) Brightness filter and optional ranking.
    let catalogue = finalize(&derivation.records, config.rank)?;
    let brightness_removed = derivation.records.len() - catalogue.len();

    info!(
        observables = observables_table.len(),
        physical = physical_table.len(),
        dropped = filtered.dropped.len(),
        unmatched = merged.report.unmatched.len(),
        kept = catalogue.len(),
        "finished reading TEPCat"
    );

    Ok(RunOutput {
        catalogue,
        report: PipelineReport {
            refresh,
            observables_rows: observables_table.len(),
            physical_rows: physical_table.len(),
            dropped: filtered.dropped,
            merge: merged.report,
            brightness_removed,
            signal_error,
        },
    })
}
