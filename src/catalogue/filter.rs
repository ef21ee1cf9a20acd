//! Validity filter for the physical-properties table.
//!
//! TEPCat uses non-positive placeholders for unknown masses and radii. Any row
//! with such a placeholder in stellar mass, stellar radius, planet mass or
//! planet radius is dropped before merging, so every later division by these
//! quantities is safe.

use tracing::info;

use crate::domain::RawPhysicalRecord;
use crate::error::CatalogueError;
use crate::io::table::Table;

/// Filtered physical table plus the identifiers that were dropped.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub table: Table,
    pub dropped: Vec<String>,
}

/// Keep row `i` iff `mstar`, `rstar`, `mplanet` and `rplanet` are all `> 0`.
pub fn physical_keep_mask(table: &Table) -> Result<Vec<bool>, CatalogueError> {
    let mstar = table.numbers("mstar")?;
    let rstar = table.numbers("rstar")?;
    let mplanet = table.numbers("mplanet")?;
    let rplanet = table.numbers("rplanet")?;

    Ok((0..table.len())
        .map(|i| mstar[i] > 0.0 && rstar[i] > 0.0 && mplanet[i] > 0.0 && rplanet[i] > 0.0)
        .collect())
}

/// Drop invalid rows from the physical table (all columns in lockstep).
pub fn filter_physical(table: &Table) -> Result<FilterOutcome, CatalogueError> {
    let mask = physical_keep_mask(table)?;
    let names = table.text("name")?;

    let dropped: Vec<String> = names
        .iter()
        .zip(&mask)
        .filter(|(_, keep)| !**keep)
        .map(|(name, _)| name.clone())
        .collect();
    for name in &dropped {
        info!(system = %name, "dropping system with non-positive mass or radius");
    }

    Ok(FilterOutcome {
        table: table.retain(&mask),
        dropped,
    })
}

/// Convert a filtered physical table into typed records.
pub fn physical_records(table: &Table) -> Result<Vec<RawPhysicalRecord>, CatalogueError> {
    let names = table.text("name")?;
    let tstar = table.numbers("tstar")?;
    let metalstar = table.numbers("metalstar")?;
    let mstar = table.numbers("mstar")?;
    let rstar = table.numbers("rstar")?;
    let loggstar = table.numbers("loggstar")?;
    let a = table.numbers("a")?;
    let mplanet = table.numbers("mplanet")?;
    let rplanet = table.numbers("rplanet")?;
    let littleg = table.numbers("littleg")?;
    let rhoplanet = table.numbers("rhoplanet")?;
    let tplanet = table.numbers("tplanet")?;

    Ok((0..table.len())
        .map(|i| RawPhysicalRecord {
            name: names[i].clone(),
            tstar: tstar[i],
            metalstar: metalstar[i],
            mstar: mstar[i],
            rstar: rstar[i],
            loggstar: loggstar[i],
            a_tabulated: a[i],
            mplanet: mplanet[i],
            rplanet: rplanet[i],
            littleg_tabulated: littleg[i],
            rhoplanet_tabulated: rhoplanet[i],
            tplanet_tabulated: tplanet[i],
        })
        .collect())
}
