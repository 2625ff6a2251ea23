//! Boundary unit conversions.
//!
//! Positions are millimeters everywhere. Wavelength is the one unit
//! that changes representation across the API boundary: SI meters on
//! [`crate::core::geometry::Ray`] and nanometers everywhere a human
//! reads or configures one (lamp bands, spectral profiles, dominant
//! pass wavelength). Every crossing goes through these two functions so
//! the conversion is auditable at exactly two call sites, per spec.md
//! §6.

use crate::core::pbrt::Float;

pub fn nm_to_m(nm: Float) -> Float {
    nm * 1e-9
}

pub fn m_to_nm(m: Float) -> Float {
    m * 1e9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        assert!((m_to_nm(nm_to_m(532.0)) - 532.0).abs() < 1e-9);
    }
}
