//! Catalogue merge-and-derive pipeline stages and the final [`Catalogue`].
//!
//! - validity filter for the physical table (`filter`)
//! - cross-match by system name (`merge`)
//! - derived quantities and signal metrics (`derive`)
//! - brightness filter and ranking (`rank`)
//!
//! The final catalogue is column-oriented: one named array per field, all of
//! equal length, indexable by row. Field names and units are fixed because the
//! simulation front-ends read them verbatim.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::domain::DerivedSystemRecord;
use crate::error::CatalogueError;
use crate::io::table::Column;

pub mod derive;
pub mod filter;
pub mod merge;
pub mod rank;

pub use derive::*;
pub use filter::*;
pub use merge::*;
pub use rank::*;

/// Name, unit and meaning of one catalogue field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
}

const fn field(name: &'static str, unit: &'static str, description: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        unit,
        description,
    }
}

pub const NAMES: &str = "names";
pub const TRANSMISSION: &str = "transmission_signal";
pub const EMISSION: &str = "emission_signal";

/// Fields present in every catalogue, in column order.
pub const FIELDS: &[FieldSpec] = &[
    field(NAMES, "", "system identifier"),
    field("vmags", "mag", "V-band magnitude"),
    field("kmags", "mag", "K-band magnitude"),
    field("tdurs", "days", "transit duration (consumers convert with 86400 s/day)"),
    field("tdepths", "fraction", "transit depth"),
    field("periods", "days", "orbital period"),
    field("tstar", "K", "stellar effective temperature"),
    field("metalstar", "dex", "stellar metallicity [Fe/H]"),
    field("mstar", "M_sun", "stellar mass"),
    field("rstar", "R_sun", "stellar radius"),
    field("loggstar", "log10(cgs)", "stellar surface gravity"),
    field("mplanet", "M_jup", "planet mass"),
    field("rplanet", "R_jup", "planet radius"),
    field("a", "AU", "semi-major axis (Kepler's third law)"),
    field("aRs", "", "scaled separation a/R*"),
    field("RpRs", "", "planet-to-star radius ratio"),
    field("tplanet", "K", "equilibrium temperature"),
    field("littleg", "m s^-2", "planet surface gravity"),
    field("rhoplanet", "kg m^-3", "planet bulk density"),
];

/// Fields present only when signal metrics were computed.
pub const SIGNAL_FIELDS: &[FieldSpec] = &[
    field(EMISSION, "relative", "emission signal normalized to the reference system"),
    field(TRANSMISSION, "relative", "transmission signal normalized to the reference system"),
];

/// Look up the spec for a field name.
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().chain(SIGNAL_FIELDS).find(|f| f.name == name)
}

/// The final, read-only, column-oriented catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogue {
    columns: Vec<(&'static str, Column)>,
    rows: usize,
}

impl Catalogue {
    /// Build columns from records, preserving record order.
    ///
    /// Signal columns are included only if every record carries metrics.
    pub fn from_records(records: &[DerivedSystemRecord]) -> Self {
        let num = |f: fn(&DerivedSystemRecord) -> f64| Column::Number(records.iter().map(f).collect());

        let mut columns = vec![
            (NAMES, Column::Text(records.iter().map(|r| r.name().to_string()).collect())),
            ("vmags", num(|r| r.merged.observables.vmag)),
            ("kmags", num(|r| r.merged.observables.kmag)),
            ("tdurs", num(|r| r.merged.observables.tdur)),
            ("tdepths", num(|r| r.merged.observables.tdepth)),
            ("periods", num(|r| r.merged.observables.period)),
            ("tstar", num(|r| r.merged.physical.tstar)),
            ("metalstar", num(|r| r.merged.physical.metalstar)),
            ("mstar", num(|r| r.merged.physical.mstar)),
            ("rstar", num(|r| r.merged.physical.rstar)),
            ("loggstar", num(|r| r.merged.physical.loggstar)),
            ("mplanet", num(|r| r.merged.physical.mplanet)),
            ("rplanet", num(|r| r.merged.physical.rplanet)),
            ("a", num(|r| r.derived.a)),
            ("aRs", num(|r| r.derived.a_rs)),
            ("RpRs", num(|r| r.derived.rp_rs)),
            ("tplanet", num(|r| r.derived.tplanet)),
            ("littleg", num(|r| r.derived.littleg)),
            ("rhoplanet", num(|r| r.derived.rhoplanet)),
        ];

        let signals: Option<Vec<_>> = records.iter().map(|r| r.signal).collect();
        if let Some(signals) = signals.filter(|s| !s.is_empty()) {
            columns.push((EMISSION, Column::Number(signals.iter().map(|s| s.emission).collect())));
            columns.push((TRANSMISSION, Column::Number(signals.iter().map(|s| s.transmission).collect())));
        }

        Self {
            columns,
            rows: records.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn has_signal(&self) -> bool {
        self.get(TRANSMISSION).is_some()
    }

    /// Field names in column order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(name, _)| *name)
    }

    pub fn get(&self, field: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| *n == field).map(|(_, c)| c)
    }

    pub fn names(&self) -> &[String] {
        match self.get(NAMES) {
            Some(Column::Text(v)) => v,
            _ => &[],
        }
    }

    pub fn numbers(&self, field: &str) -> Option<&[f64]> {
        match self.get(field) {
            Some(Column::Number(v)) => Some(v),
            _ => None,
        }
    }

    /// Row index of the first system with this exact name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names().iter().position(|n| n == name)
    }

    pub fn number(&self, field: &str, row: usize) -> Option<f64> {
        self.numbers(field)?.get(row).copied()
    }

    pub fn text(&self, field: &str, row: usize) -> Option<&str> {
        match self.get(field) {
            Some(Column::Text(v)) => v.get(row).map(String::as_str),
            _ => None,
        }
    }
}

impl Serialize for Catalogue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, column) in &self.columns {
            map.serialize_entry(name, column)?;
        }
        map.end()
    }
}

/// Apply the brightness filter, optionally rank, and build the catalogue.
pub fn finalize(records: &[DerivedSystemRecord], rank: bool) -> Result<Catalogue, CatalogueError> {
    let kept = filter_reliable_brightness(records);
    let ordered = if rank { rank_by_transmission(&kept)? } else { kept };
    Ok(Catalogue::from_records(&ordered))
}
