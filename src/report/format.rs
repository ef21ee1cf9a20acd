//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::PipelineReport;
use crate::catalogue::{Catalogue, EMISSION, FIELDS, MergeReport, NAMES, SIGNAL_FIELDS, TRANSMISSION};
use crate::domain::CatalogueConfig;

/// Format the run summary (row counts per stage + signal status).
pub fn format_run_summary(report: &PipelineReport, catalogue: &Catalogue, config: &CatalogueConfig) -> String {
    let mut out = String::new();

    out.push_str("=== tepcat - TEPCat merge ===\n");
    out.push_str(&format!("Source: {}\n", report.refresh.describe()));
    out.push_str(&format!(
        "Tables: {} ({} rows) | {} ({} rows)\n",
        config.observables_path().display(),
        report.observables_rows,
        config.physical_path().display(),
        report.physical_rows,
    ));
    out.push_str(&format!(
        "Dropped (non-positive mass/radius): {}\n",
        report.dropped.len()
    ));
    out.push_str(&format!(
        "Merged: matched={} unmatched={}\n",
        report.merge.matched,
        report.merge.unmatched.len()
    ));
    out.push_str(&format!(
        "Without reliable V/K magnitudes: {}\n",
        report.brightness_removed
    ));
    out.push_str(&format!("Catalogue: {} systems\n", catalogue.len()));

    if config.groups.includes_signal() {
        match &report.signal_error {
            None => out.push_str(&format!("Signal metrics: relative to {}\n", config.reference)),
            Some(err) => out.push_str(&format!("Signal metrics: unavailable ({err})\n")),
        }
    }

    out
}

/// List systems that found no observables entry.
pub fn format_unmatched(report: &MergeReport) -> String {
    if report.unmatched.is_empty() {
        return "All systems matched.\n".to_string();
    }

    let mut out = format!("Could not match {} systems:\n", report.unmatched.len());
    for entry in &report.unmatched {
        out.push_str(&format!("  {}\n", entry.name));
    }
    out
}

/// Format the top-N rows of a ranked catalogue.
pub fn format_ranking(catalogue: &Catalogue, top_n: usize) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>4} {:<20} {:>12} {:>10} {:>7} {:>8} {:>8}",
            "#", "system", "transmission", "emission", "K", "Teq", "Rp/R*"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:->4} {:-<20} {:->12} {:->10} {:->7} {:->8} {:->8}",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    let value = |field: &str, row: usize| catalogue.number(field, row).unwrap_or(f64::NAN);
    for (row, name) in catalogue.names().iter().enumerate().take(top_n) {
        out.push_str(
            format!(
                "{:>4} {:<20} {:>12.4} {:>10.4} {:>7.2} {:>8.0} {:>8.4}",
                row + 1,
                truncate(name, 20),
                value(TRANSMISSION, row),
                value(EMISSION, row),
                value("kmags", row),
                value("tplanet", row),
                value("RpRs", row),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Every catalogue field for one system, with units.
pub fn format_system(catalogue: &Catalogue, row: usize) -> String {
    let mut out = String::new();
    let name = catalogue.text(NAMES, row).unwrap_or("?");
    out.push_str(&format!("{name}\n"));

    for spec in FIELDS.iter().chain(SIGNAL_FIELDS).filter(|f| f.name != NAMES) {
        let Some(value) = catalogue.number(spec.name, row) else {
            continue;
        };
        out.push_str(
            format!(
                "  {:<20} {:>14} {:<12} {}",
                spec.name,
                fmt_value(value),
                spec.unit,
                spec.description
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn fmt_value(v: f64) -> String {
    if v != 0.0 && (v.abs() >= 1e5 || v.abs() < 1e-3) {
        format!("{v:.4e}")
    } else {
        format!("{v:.4}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
