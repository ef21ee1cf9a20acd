//! Shared domain types.
//!
//! Records move through the pipeline in this order:
//!
//! `RawPhysicalRecord` + `RawObservableRecord` -> `MergedSystemRecord` -> `DerivedSystemRecord`
//!
//! Every stage takes its input by reference and returns a new collection.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::math::{DerivationSettings, PhysicalConstants};

/// Default cache file name for the observables ("for planning observations") table.
pub const DEFAULT_OBSERVABLES_FILE: &str = "tepcat1.txt";
/// Default cache file name for the physical-properties ("well-studied") table.
pub const DEFAULT_PHYSICAL_FILE: &str = "tepcat2.txt";
/// Default system used to normalize signal metrics.
pub const DEFAULT_REFERENCE: &str = "HD209458b";

/// One row of the observables table (catalogue 1).
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservableRecord {
    pub name: String,
    pub vmag: f64,
    pub kmag: f64,
    /// Transit duration (days).
    pub tdur: f64,
    /// Transit depth (fraction).
    pub tdepth: f64,
    /// Orbital period (days).
    pub period: f64,
}

/// One row of the physical-properties table (catalogue 2).
///
/// Only rows with strictly positive stellar mass/radius and planet
/// mass/radius are ever turned into this type.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPhysicalRecord {
    pub name: String,
    /// Stellar effective temperature (K).
    pub tstar: f64,
    /// Stellar metallicity, [Fe/H] (dex).
    pub metalstar: f64,
    /// Stellar mass (solar masses).
    pub mstar: f64,
    /// Stellar radius (solar radii).
    pub rstar: f64,
    /// Stellar surface gravity, log10(g / cgs).
    pub loggstar: f64,
    /// Tabulated semi-major axis (AU). Superseded by the Kepler value.
    pub a_tabulated: f64,
    /// Planet mass (Jupiter masses).
    pub mplanet: f64,
    /// Planet radius (Jupiter radii).
    pub rplanet: f64,
    /// Tabulated planet surface gravity. Superseded.
    pub littleg_tabulated: f64,
    /// Tabulated planet density. Superseded.
    pub rhoplanet_tabulated: f64,
    /// Tabulated equilibrium temperature. Superseded.
    pub tplanet_tabulated: f64,
}

/// Observable fields copied from catalogue 1 during the merge.
///
/// An unmatched system carries all zeros; zero means "unavailable".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Observables {
    pub vmag: f64,
    pub kmag: f64,
    pub tdur: f64,
    pub tdepth: f64,
    pub period: f64,
}

impl From<&RawObservableRecord> for Observables {
    fn from(r: &RawObservableRecord) -> Self {
        Self {
            vmag: r.vmag,
            kmag: r.kmag,
            tdur: r.tdur,
            tdepth: r.tdepth,
            period: r.period,
        }
    }
}

/// A physical record joined with zero-or-one observable record.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSystemRecord {
    pub physical: RawPhysicalRecord,
    pub observables: Observables,
    /// Whether a catalogue-1 row with the identical name was found.
    pub matched: bool,
}

impl MergedSystemRecord {
    pub fn name(&self) -> &str {
        &self.physical.name
    }
}

/// Quantities recomputed from the merged fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalQuantities {
    /// Planet surface gravity (m s^-2).
    pub littleg: f64,
    /// Planet bulk density (kg m^-3).
    pub rhoplanet: f64,
    /// Semi-major axis from Kepler's third law (AU).
    pub a: f64,
    /// Scaled separation a / R*.
    pub a_rs: f64,
    /// Zero-albedo equilibrium temperature (K).
    pub tplanet: f64,
    /// Planet-to-star radius ratio.
    pub rp_rs: f64,
}

/// Signal metrics relative to the reference system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalMetrics {
    pub emission: f64,
    pub transmission: f64,
}

/// A merged record plus its derived quantities.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSystemRecord {
    pub merged: MergedSystemRecord,
    pub derived: PhysicalQuantities,
    pub signal: Option<SignalMetrics>,
}

impl DerivedSystemRecord {
    pub fn name(&self) -> &str {
        self.merged.name()
    }

    pub fn transmission(&self) -> Option<f64> {
        self.signal.map(|s| s.transmission)
    }
}

/// Which groups of derived quantities to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DerivedGroups {
    /// Gravity, density, semi-major axis, a/R*, Teq and Rp/R* only.
    Physical,
    /// Physical quantities plus normalized emission/transmission metrics.
    Signal,
}

impl DerivedGroups {
    pub fn includes_signal(self) -> bool {
        matches!(self, DerivedGroups::Signal)
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, environment and defaults.
#[derive(Debug, Clone)]
pub struct CatalogueConfig {
    /// Directory holding the two cache files.
    pub cache_dir: PathBuf,
    pub observables_file: String,
    pub physical_file: String,
    /// Try to download fresh tables before loading.
    pub refresh: bool,
    pub groups: DerivedGroups,
    /// Identifier of the system signal metrics are normalized to.
    pub reference: String,
    /// Sort the final catalogue by descending transmission metric.
    pub rank: bool,
    pub constants: PhysicalConstants,
    pub settings: DerivationSettings,
}

impl CatalogueConfig {
    pub fn observables_path(&self) -> PathBuf {
        self.cache_dir.join(&self.observables_file)
    }

    pub fn physical_path(&self) -> PathBuf {
        self.cache_dir.join(&self.physical_file)
    }
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("."),
            observables_file: DEFAULT_OBSERVABLES_FILE.to_string(),
            physical_file: DEFAULT_PHYSICAL_FILE.to_string(),
            refresh: false,
            groups: DerivedGroups::Physical,
            reference: DEFAULT_REFERENCE.to_string(),
            rank: false,
            constants: PhysicalConstants::default(),
            settings: DerivationSettings::default(),
        }
    }
}
