//! Export the final catalogue to CSV or JSON.
//!
//! CSV is one row per system and meant for spreadsheets. JSON keeps the
//! column-oriented layout (field -> array) the simulation front-ends consume,
//! together with run metadata and units.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalogue::{Catalogue, field_spec};
use crate::domain::CatalogueConfig;
use crate::error::CatalogueError;
use crate::io::table::Column;

/// On-disk JSON layout.
#[derive(Debug, Serialize)]
struct CatalogueFile<'a> {
    tool: &'static str,
    generated: DateTime<Utc>,
    /// Reference system for signal metrics (absent when not computed).
    reference: Option<&'a str>,
    ranked: bool,
    rows: usize,
    units: BTreeMap<&'static str, &'static str>,
    columns: &'a Catalogue,
}

/// Write the catalogue as column-oriented JSON.
pub fn write_catalogue_json(path: &Path, catalogue: &Catalogue, config: &CatalogueConfig) -> Result<(), CatalogueError> {
    let file = File::create(path).map_err(|e| CatalogueError::io(path, e))?;

    let units = catalogue
        .field_names()
        .filter_map(|name| field_spec(name).map(|spec| (name, spec.unit)))
        .collect();

    let doc = CatalogueFile {
        tool: "tepcat",
        generated: Utc::now(),
        reference: catalogue.has_signal().then_some(config.reference.as_str()),
        ranked: config.rank,
        rows: catalogue.len(),
        units,
        columns: catalogue,
    };

    serde_json::to_writer_pretty(BufWriter::new(file), &doc)
        .map_err(|e| CatalogueError::io(path, std::io::Error::other(e)))
}

/// Write the catalogue as CSV, one row per system.
pub fn write_catalogue_csv(path: &Path, catalogue: &Catalogue) -> Result<(), CatalogueError> {
    let file = File::create(path).map_err(|e| CatalogueError::io(path, e))?;
    let mut out = BufWriter::new(file);
    write_csv(&mut out, catalogue).map_err(|e| CatalogueError::io(path, e))
}

fn write_csv<W: Write>(out: &mut W, catalogue: &Catalogue) -> std::io::Result<()> {
    let fields: Vec<&str> = catalogue.field_names().collect();
    writeln!(out, "{}", fields.join(","))?;

    for row in 0..catalogue.len() {
        let cells: Vec<String> = fields
            .iter()
            .map(|field| match catalogue.get(field) {
                Some(Column::Text(v)) => quote(&v[row]),
                Some(Column::Number(v)) => v[row].to_string(),
                None => String::new(),
            })
            .collect();
        writeln!(out, "{}", cells.join(","))?;
    }

    out.flush()
}

fn quote(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::derive_physical;
    use crate::domain::{MergedSystemRecord, Observables, RawPhysicalRecord};
    use crate::math::{DerivationSettings, PhysicalConstants};

    fn catalogue(names: &[&str]) -> Catalogue {
        let merged: Vec<MergedSystemRecord> = names
            .iter()
            .map(|name| MergedSystemRecord {
                physical: RawPhysicalRecord {
                    name: name.to_string(),
                    tstar: 5500.0,
                    metalstar: -0.1,
                    mstar: 0.9,
                    rstar: 0.95,
                    loggstar: 4.5,
                    a_tabulated: 0.03,
                    mplanet: 1.1,
                    rplanet: 1.05,
                    littleg_tabulated: 25.0,
                    rhoplanet_tabulated: 0.9,
                    tplanet_tabulated: 1300.0,
                },
                observables: Observables {
                    vmag: 11.2,
                    kmag: 9.8,
                    tdur: 0.09,
                    tdepth: 0.013,
                    period: 2.2,
                },
                matched: true,
            })
            .collect();
        let derived = derive_physical(&merged, &PhysicalConstants::default(), &DerivationSettings::default());
        Catalogue::from_records(&derived)
    }

    #[test]
    fn csv_has_header_and_one_line_per_system() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &catalogue(&["WASP-4b", "odd,name"])).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("names,vmags,kmags"));
        assert!(lines[1].starts_with("WASP-4b,11.2,9.8"));
        assert!(lines[2].starts_with("\"odd,name\","));
        assert_eq!(lines[0].split(',').count(), lines[1].split(',').count());
    }

    #[test]
    fn json_is_column_oriented_with_units() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalogue.json");
        write_catalogue_json(&path, &catalogue(&["WASP-4b"]), &CatalogueConfig::default()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["tool"], "tepcat");
        assert_eq!(value["rows"], 1);
        assert!(value["reference"].is_null());
        assert_eq!(value["units"]["periods"], "days");
        assert_eq!(value["columns"]["names"][0], "WASP-4b");
        assert_eq!(value["columns"]["periods"][0], 2.2);
    }
}
