//! Blackbody helpers.
//!
//! `B(λ, T) = 2hc² / λ⁵ · 1 / (exp(hc / λkT) - 1)`
//!
//! Numerical notes:
//! - `exp(x) - 1` is evaluated with `exp_m1` so that hot bodies at long
//!   wavelengths (small `x`) keep full precision.
//! - For very cold bodies `x` overflows `exp`, which correctly drives the
//!   radiance to zero.

use crate::math::PhysicalConstants;

/// Planck spectral radiance per unit wavelength (W sr^-1 m^-3).
///
/// Returns `0.0` for non-positive temperatures.
pub fn planck(wavelength: f64, temperature: f64, constants: &PhysicalConstants) -> f64 {
    if temperature <= 0.0 {
        return 0.0;
    }
    let PhysicalConstants { h, c, k_b, .. } = *constants;
    let x = h * c / (wavelength * k_b * temperature);
    let prefactor = 2.0 * h * c * c / wavelength.powi(5);
    prefactor / x.exp_m1()
}

/// Ratio of planet to star blackbody radiance at one wavelength.
pub fn blackbody_ratio(
    wavelength: f64,
    t_planet: f64,
    t_star: f64,
    constants: &PhysicalConstants,
) -> f64 {
    planck(wavelength, t_planet, constants) / planck(wavelength, t_star, constants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn planck_matches_reference_value() {
        // Sun-like photosphere at 500 nm: ~2.6e13 W sr^-1 m^-3.
        let c = PhysicalConstants::default();
        let b = planck(500e-9, 5778.0, &c);
        assert!(b > 2.5e13 && b < 2.7e13, "got {b:e}");
    }

    #[test]
    fn ratio_is_one_for_equal_temperatures() {
        let c = PhysicalConstants::default();
        assert_relative_eq!(blackbody_ratio(2.2e-6, 1500.0, 1500.0, &c), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn colder_body_is_fainter() {
        let c = PhysicalConstants::default();
        let r = blackbody_ratio(2.2e-6, 1200.0, 6000.0, &c);
        assert!(r > 0.0 && r < 1.0);
        assert_eq!(planck(2.2e-6, 0.0, &c), 0.0);
    }
}
