//! Derived physical quantities and signal metrics.
//!
//! Everything here is a pure function of the merged fields plus the explicit
//! [`PhysicalConstants`] / [`DerivationSettings`]. Internally all formulas run
//! in SI units; results are stored in the conventional catalogue units
//! documented on [`PhysicalQuantities`].
//!
//! Tabulated gravity, density, semi-major axis and equilibrium temperature are
//! never passed through: they are always recomputed.

use std::f64::consts::PI;

use crate::domain::{
    DerivedGroups, DerivedSystemRecord, MergedSystemRecord, PhysicalQuantities, SignalMetrics,
};
use crate::error::CatalogueError;
use crate::math::{DerivationSettings, PhysicalConstants, blackbody_ratio};

/// Output of the derivation stage.
///
/// A signal-metric failure does not invalidate the physical quantities, so it
/// is carried alongside the records instead of replacing them.
#[derive(Debug)]
pub struct Derivation {
    pub records: Vec<DerivedSystemRecord>,
    pub signal_error: Option<CatalogueError>,
}

/// Zero-albedo-style equilibrium temperature.
///
/// `T_eq = T* · sqrt(1 / (a/R*)) · (f' · (1 - A))^(1/4)`
pub fn equilibrium_temperature(tstar: f64, a_rs: f64, albedo: f64, redistribution: f64) -> f64 {
    let redist = redistribution * (1.0 - albedo);
    tstar * (1.0 / a_rs).sqrt() * redist.powf(0.25)
}

/// Compute the physical quantities of one merged record.
pub fn physical_quantities(
    record: &MergedSystemRecord,
    constants: &PhysicalConstants,
    settings: &DerivationSettings,
) -> PhysicalQuantities {
    let p = &record.physical;
    let c = constants;

    let mp = p.mplanet * c.m_jup;
    let rp = p.rplanet * c.r_jup;
    let ms = p.mstar * c.m_sun;
    let rs = p.rstar * c.r_sun;

    let littleg = c.g * mp / (rp * rp);
    let volume = (4.0 * PI / 3.0) * rp.powi(3);
    let rhoplanet = mp / volume;

    // Kepler's third law.
    let term1 = (record.observables.period * c.day / (2.0 * PI)).powi(2);
    let term2 = c.g * (ms + mp);
    let a_m = (term1 * term2).cbrt();

    let a_rs = a_m / rs;
    let tplanet = equilibrium_temperature(p.tstar, a_rs, settings.albedo, settings.redistribution);

    PhysicalQuantities {
        littleg,
        rhoplanet,
        a: a_m / c.au,
        a_rs,
        tplanet,
        rp_rs: rp / rs,
    }
}

/// Derive physical quantities for every record. Signal metrics are left unset.
pub fn derive_physical(
    records: &[MergedSystemRecord],
    constants: &PhysicalConstants,
    settings: &DerivationSettings,
) -> Vec<DerivedSystemRecord> {
    records
        .iter()
        .map(|m| DerivedSystemRecord {
            merged: m.clone(),
            derived: physical_quantities(m, constants, settings),
            signal: None,
        })
        .collect()
}

/// Atmospheric scale height (m): `H = R T / (μ g)`.
pub fn scale_height(record: &DerivedSystemRecord, constants: &PhysicalConstants, settings: &DerivationSettings) -> f64 {
    constants.r_gas * record.derived.tplanet / (settings.mean_molecular_weight * record.derived.littleg)
}

/// Un-normalized emission contrast: blackbody ratio × (Rp/R*)².
fn raw_emission(record: &DerivedSystemRecord, constants: &PhysicalConstants, settings: &DerivationSettings) -> f64 {
    let ratio = blackbody_ratio(
        settings.emission_wavelength,
        record.derived.tplanet,
        record.merged.physical.tstar,
        constants,
    );
    ratio * record.derived.rp_rs.powi(2)
}

/// Un-normalized transmission signal: `2 H Rp / R*²`, scaled by the K-band
/// brightness relative to `kmag_ref`.
fn raw_transmission(
    record: &DerivedSystemRecord,
    kmag_ref: f64,
    constants: &PhysicalConstants,
    settings: &DerivationSettings,
) -> f64 {
    let rp = record.merged.physical.rplanet * constants.r_jup;
    let rs = record.merged.physical.rstar * constants.r_sun;
    let signal = 2.0 * scale_height(record, constants, settings) * rp / (rs * rs);
    let delta_k = record.merged.observables.kmag - kmag_ref;
    signal * 10f64.powf(-delta_k / 2.5)
}

fn check_reference(name: &str, metric: &'static str, value: f64) -> Result<f64, CatalogueError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CatalogueError::InvalidReference {
            name: name.to_string(),
            metric,
            value,
        })
    }
}

/// Return a copy of `records` with emission and transmission metrics divided
/// by the reference system's values.
///
/// Fails if `reference` is absent, or if its raw metrics are not finite and
/// positive (for example an unmatched reference with zero period).
pub fn attach_signal_metrics(
    records: &[DerivedSystemRecord],
    reference: &str,
    constants: &PhysicalConstants,
    settings: &DerivationSettings,
) -> Result<Vec<DerivedSystemRecord>, CatalogueError> {
    let ref_record = records
        .iter()
        .find(|r| r.name() == reference)
        .ok_or_else(|| CatalogueError::ReferenceNotFound(reference.to_string()))?;

    let kmag_ref = ref_record.merged.observables.kmag;
    let emission_ref = check_reference(reference, "emission", raw_emission(ref_record, constants, settings))?;
    let transmission_ref = check_reference(
        reference,
        "transmission",
        raw_transmission(ref_record, kmag_ref, constants, settings),
    )?;

    Ok(records
        .iter()
        .map(|r| DerivedSystemRecord {
            signal: Some(SignalMetrics {
                emission: raw_emission(r, constants, settings) / emission_ref,
                transmission: raw_transmission(r, kmag_ref, constants, settings) / transmission_ref,
            }),
            ..r.clone()
        })
        .collect())
}

/// Run the derivation stage for the requested groups.
pub fn derive(
    records: &[MergedSystemRecord],
    groups: DerivedGroups,
    reference: &str,
    constants: &PhysicalConstants,
    settings: &DerivationSettings,
) -> Derivation {
    let physical = derive_physical(records, constants, settings);
    if !groups.includes_signal() {
        return Derivation {
            records: physical,
            signal_error: None,
        };
    }

    match attach_signal_metrics(&physical, reference, constants, settings) {
        Ok(records) => Derivation {
            records,
            signal_error: None,
        },
        Err(err) => Derivation {
            records: physical,
            signal_error: Some(err),
        },
    }
}
