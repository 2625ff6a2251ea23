//! Wavelength-dependent transmission curves, built from sigmoids
//! rather than coated-stack spectral physics (spec.md §1, §4.2).

use crate::core::pbrt::Float;

const VISIBLE_MIN_NM: Float = 380.0;
const VISIBLE_MAX_NM: Float = 750.0;
const CHART_MIN_NM: Float = 350.0;
const CHART_MAX_NM: Float = 850.0;
const CHART_STEP_NM: Float = 5.0;

fn sigma(x: Float, edge_steepness: Float) -> Float {
    let slope = 4.0 / edge_steepness.max(1e-6);
    1.0 / (1.0 + (-slope * x).exp())
}

#[derive(Debug, Clone, Copy)]
pub struct Passband {
    pub center_nm: Float,
    pub fwhm_nm: Float,
}

/// A spectral transmission curve T(lambda), one of four presets.
#[derive(Debug, Clone)]
pub enum SpectralProfile {
    Longpass {
        cutoff_nm: Float,
        edge_steepness: Float,
    },
    Shortpass {
        cutoff_nm: Float,
        edge_steepness: Float,
    },
    Bandpass {
        band: Passband,
        edge_steepness: Float,
    },
    Multiband {
        bands: Vec<Passband>,
        edge_steepness: Float,
    },
}

impl SpectralProfile {
    pub fn transmission(&self, wavelength_nm: Float) -> Float {
        match self {
            SpectralProfile::Longpass {
                cutoff_nm,
                edge_steepness,
            } => sigma(wavelength_nm - cutoff_nm, *edge_steepness),
            SpectralProfile::Shortpass {
                cutoff_nm,
                edge_steepness,
            } => sigma(cutoff_nm - wavelength_nm, *edge_steepness),
            SpectralProfile::Bandpass {
                band,
                edge_steepness,
            } => bandpass_transmission(wavelength_nm, band, *edge_steepness),
            SpectralProfile::Multiband {
                bands,
                edge_steepness,
            } => bands
                .iter()
                .map(|band| bandpass_transmission(wavelength_nm, band, *edge_steepness))
                .fold(0.0, Float::max),
        }
    }

    /// Samples the curve over 350-850nm for charting.
    pub fn sample_curve(&self) -> Vec<(Float, Float)> {
        let mut samples = Vec::new();
        let mut nm = CHART_MIN_NM;
        while nm <= CHART_MAX_NM {
            samples.push((nm, self.transmission(nm)));
            nm += CHART_STEP_NM;
        }
        samples
    }

    /// The dominant pass wavelength in the visible band, used for
    /// color tinting. `None` if nothing in the visible band transmits
    /// appreciably.
    pub fn dominant_pass_wavelength(&self) -> Option<Float> {
        let mut best_nm = None;
        let mut best_t = 0.0;
        let mut nm = VISIBLE_MIN_NM;
        while nm <= VISIBLE_MAX_NM {
            let t = self.transmission(nm);
            if t > best_t {
                best_t = t;
                best_nm = Some(nm);
            }
            nm += CHART_STEP_NM;
        }
        if best_t > 0.5 {
            best_nm
        } else {
            None
        }
    }
}

fn bandpass_transmission(wavelength_nm: Float, band: &Passband, edge_steepness: Float) -> Float {
    let lo = band.center_nm - band.fwhm_nm / 2.0;
    let hi = band.center_nm + band.fwhm_nm / 2.0;
    sigma(wavelength_nm - lo, edge_steepness) * sigma(hi - wavelength_nm, edge_steepness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn longpass_passes_above_cutoff() {
        let p = SpectralProfile::Longpass {
            cutoff_nm: 505.0,
            edge_steepness: 10.0,
        };
        assert!(p.transmission(488.0) < 0.01);
        assert!(p.transmission(532.0) > 0.99);
    }

    #[test]
    fn bandpass_peaks_at_center() {
        let p = SpectralProfile::Bandpass {
            band: Passband {
                center_nm: 520.0,
                fwhm_nm: 30.0,
            },
            edge_steepness: 5.0,
        };
        assert_relative_eq!(p.transmission(520.0), 1.0, epsilon = 1e-3);
        assert!(p.transmission(400.0) < 0.01);
        assert!(p.transmission(700.0) < 0.01);
    }

    #[test]
    fn multiband_is_max_over_bands() {
        let p = SpectralProfile::Multiband {
            bands: vec![
                Passband {
                    center_nm: 450.0,
                    fwhm_nm: 20.0,
                },
                Passband {
                    center_nm: 600.0,
                    fwhm_nm: 20.0,
                },
            ],
            edge_steepness: 5.0,
        };
        assert!(p.transmission(450.0) > 0.9);
        assert!(p.transmission(600.0) > 0.9);
        assert!(p.transmission(525.0) < 0.1);
    }
}
