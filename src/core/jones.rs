//! Jones-calculus polarization helpers: a two-component complex vector
//! and the 2x2 complex matrices waveplates/polarizers act with.

use crate::core::pbrt::Cplx;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct JonesVector {
    pub ex: Cplx,
    pub ey: Cplx,
}

impl JonesVector {
    /// Linearly polarized at angle `alpha` (radians, measured from the
    /// local x-axis), unit amplitude.
    pub fn linear(alpha: Float) -> Self {
        JonesVector {
            ex: Cplx::real(alpha.cos()),
            ey: Cplx::real(alpha.sin()),
        }
    }

    /// Intensity carried by this Jones vector, `|Ex|^2 + |Ey|^2`.
    pub fn intensity(self) -> Float {
        self.ex.norm_sqr() + self.ey.norm_sqr()
    }

    /// A π phase flip on both components, used by metallic reflection.
    pub fn flip(self) -> JonesVector {
        JonesVector {
            ex: -self.ex,
            ey: -self.ey,
        }
    }
}

impl Default for JonesVector {
    fn default() -> Self {
        JonesVector::linear(0.0)
    }
}

impl std::ops::Mul<Cplx> for JonesVector {
    type Output = JonesVector;
    fn mul(self, rhs: Cplx) -> JonesVector {
        JonesVector {
            ex: self.ex * rhs,
            ey: self.ey * rhs,
        }
    }
}

use crate::core::pbrt::Float;

/// A 2x2 complex Jones matrix, row-major.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct JonesMatrix {
    pub m: [[Cplx; 2]; 2],
}

impl JonesMatrix {
    pub const IDENTITY: JonesMatrix = JonesMatrix {
        m: [
            [Cplx::new(1.0, 0.0), Cplx::new(0.0, 0.0)],
            [Cplx::new(0.0, 0.0), Cplx::new(1.0, 0.0)],
        ],
    };

    pub fn apply(&self, v: JonesVector) -> JonesVector {
        JonesVector {
            ex: self.m[0][0] * v.ex + self.m[0][1] * v.ey,
            ey: self.m[1][0] * v.ex + self.m[1][1] * v.ey,
        }
    }

    /// Waveplate Jones matrix for fast axis at `theta` (radians) and
    /// retardance `delta` (radians; pi for half-wave, pi/2 for
    /// quarter-wave).
    pub fn waveplate(theta: Float, delta: Float) -> JonesMatrix {
        let c = theta.cos();
        let s = theta.sin();
        let fast = Cplx::new(1.0, 0.0);
        let slow = Cplx::exp_i(delta);
        // R(-theta) * diag(fast, slow) * R(theta)
        let r00 = fast * (c * c) + slow * (s * s);
        let r01 = (fast - slow) * (c * s);
        let r11 = fast * (s * s) + slow * (c * c);
        JonesMatrix {
            m: [[r00, r01], [r01, r11]],
        }
    }

    /// Linear-polarizer projection onto the fast axis at `theta`.
    pub fn polarizer(theta: Float) -> JonesMatrix {
        let c = theta.cos();
        let s = theta.sin();
        JonesMatrix {
            m: [
                [Cplx::real(c * c), Cplx::real(c * s)],
                [Cplx::real(c * s), Cplx::real(s * s)],
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn half_wave_plate_rotates_linear_polarization() {
        // a lambda/2 plate at angle theta maps linear-at-alpha to
        // linear-at-(2*theta - alpha), per spec.md §8.
        let theta = 0.3_f64;
        let alpha = 0.1_f64;
        let hw = JonesMatrix::waveplate(theta, PI);
        let input = JonesVector::linear(alpha);
        let out = hw.apply(input);
        let out_angle = out.ey.re.atan2(out.ex.re);
        let expected = 2.0 * theta - alpha;
        // angle is defined mod pi for a linear polarizer state
        let diff = ((out_angle - expected + PI / 2.0).rem_euclid(PI)) - PI / 2.0;
        assert_relative_eq!(diff, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn polarizer_projects_onto_fast_axis() {
        let p = JonesMatrix::polarizer(0.0);
        let input = JonesVector::linear(PI / 2.0); // pure y
        let out = p.apply(input);
        assert_relative_eq!(out.intensity(), 0.0, epsilon = 1e-9);
    }
}
