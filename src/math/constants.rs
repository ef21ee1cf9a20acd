//! Physical constants and unit conversions used by the derivation stage.
//!
//! The values are carried in a plain struct (rather than module-level
//! `const`s) so that the derivation engine receives them explicitly and tests
//! can pin or perturb them without touching global state.

/// SI constants and conversion factors.
///
/// The astronomical values match the ones the TEPCat tables are usually
/// reduced with; they are not the latest IAU nominal values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    /// Gravitational constant (m^3 kg^-1 s^-2).
    pub g: f64,
    /// Seconds per day.
    pub day: f64,
    /// Solar radius (m).
    pub r_sun: f64,
    /// Solar mass (kg).
    pub m_sun: f64,
    /// Jupiter equatorial radius (m).
    pub r_jup: f64,
    /// Jupiter mass (kg).
    pub m_jup: f64,
    /// Astronomical unit (m).
    pub au: f64,
    /// Planck constant (J s).
    pub h: f64,
    /// Speed of light (m/s).
    pub c: f64,
    /// Boltzmann constant (J/K).
    pub k_b: f64,
    /// Molar gas constant (J mol^-1 K^-1).
    pub r_gas: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            g: 6.67428e-11,
            day: 24.0 * 60.0 * 60.0,
            r_sun: 6.9551e8,
            m_sun: 1.99e30,
            r_jup: 7.1492e7,
            m_jup: 1.89852e27,
            au: 1.49598e11,
            h: 6.62607015e-34,
            c: 2.99792458e8,
            k_b: 1.380649e-23,
            r_gas: 8.314462618,
        }
    }
}

/// Fixed assumptions used when deriving temperatures and signal metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivationSettings {
    /// Bond albedo.
    pub albedo: f64,
    /// Heat redistribution factor `f'` (0.25 = full redistribution).
    pub redistribution: f64,
    /// Wavelength (m) at which emission contrast is evaluated.
    pub emission_wavelength: f64,
    /// Mean molecular weight of the atmosphere (kg/mol).
    pub mean_molecular_weight: f64,
}

impl Default for DerivationSettings {
    fn default() -> Self {
        Self {
            albedo: 0.0,
            redistribution: 0.25,
            emission_wavelength: 2.2e-6,
            // H2/He dominated, Jupiter-like.
            mean_molecular_weight: 2.3e-3,
        }
    }
}
