//! Cross-match of the two catalogues by system name.
//!
//! The physical table is the primary record set: every (filtered) row
//! survives. Each row is matched against the observables table by exact,
//! case-sensitive name equality; the first occurrence in file order wins.
//! Rows without a match keep all-zero observables and are listed in the
//! [`MergeReport`].

use tracing::{debug, info};

use crate::domain::{MergedSystemRecord, Observables, RawObservableRecord, RawPhysicalRecord};
use crate::error::CatalogueError;
use crate::io::table::Table;

/// A primary row that found no observables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedEntry {
    /// Index of the row in the filtered physical table.
    pub row: usize,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub matched: usize,
    pub unmatched: Vec<UnmatchedEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutput {
    pub records: Vec<MergedSystemRecord>,
    pub report: MergeReport,
}

/// Convert an observables table into typed records.
pub fn observable_records(table: &Table) -> Result<Vec<RawObservableRecord>, CatalogueError> {
    let names = table.text("name")?;
    let vmag = table.numbers("vmag")?;
    let kmag = table.numbers("kmag")?;
    let tdur = table.numbers("tdur")?;
    let tdepth = table.numbers("tdepth")?;
    let period = table.numbers("period")?;

    Ok((0..table.len())
        .map(|i| RawObservableRecord {
            name: names[i].clone(),
            vmag: vmag[i],
            kmag: kmag[i],
            tdur: tdur[i],
            tdepth: tdepth[i],
            period: period[i],
        })
        .collect())
}

/// Join every physical record with its first same-named observable record.
pub fn merge_catalogues(physical: &[RawPhysicalRecord], observables: &[RawObservableRecord]) -> MergeOutput {
    let mut records = Vec::with_capacity(physical.len());
    let mut report = MergeReport::default();

    for (row, primary) in physical.iter().enumerate() {
        let found = observables.iter().find(|o| o.name == primary.name);

        let (obs, matched) = match found {
            Some(o) => {
                debug!(system = %primary.name, "matched");
                report.matched += 1;
                (Observables::from(o), true)
            }
            None => {
                info!(system = %primary.name, "no observables entry; magnitudes and timing default to zero");
                report.unmatched.push(UnmatchedEntry {
                    row,
                    name: primary.name.clone(),
                });
                (Observables::default(), false)
            }
        };

        records.push(MergedSystemRecord {
            physical: primary.clone(),
            observables: obs,
            matched,
        });
    }

    MergeOutput { records, report }
}
