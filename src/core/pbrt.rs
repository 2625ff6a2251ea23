//! Scalar type alias and the handful of tracer-wide constants.
//!
//! Named after the teacher crate's `core::pbrt`, which plays the same
//! role: one place to change the working precision and look up the
//! magic numbers the rest of the crate leans on.

/// Working precision for every length, angle, and intensity in the
/// core. Optical-path-length accumulation and Gaussian q-parameter
/// arithmetic both want more headroom than `f32`.
pub type Float = f64;

/// Self-intersection guard: a hit closer than this to the ray origin is
/// ignored. Prevents shadow-acne at the emission point of a child ray.
pub const EPSILON: Float = 1e-3;

/// Ray-tree recursion limit (Solver 1 and the backward trace in Solver
/// 3 both enforce this). Bounds otherwise-infinite cavities.
pub const MAX_DEPTH: u32 = 20;

/// SDF raymarch utility step cap (curved bodies use a closed-form
/// quadratic instead, but compound/housing probes fall back to this).
pub const MAX_STEPS: u32 = 100;

/// Default terminal free-space segment length (mm) used by Solver 2
/// when a main path's last ray carries no recorded interaction
/// distance.
pub const DEFAULT_TERMINAL_SEGMENT_MM: Float = 200.0;

/// Cap on a Solver 3 backward ray's final escape-to-infinity segment
/// (mm), matching the teacher's habit of never letting "reached
/// infinity" become an actual unbounded float.
pub const ESCAPE_SEGMENT_MM: Float = 2000.0;

/// Throughput floor below which a Solver 3 backward path is terminated.
pub const THROUGHPUT_FLOOR: Float = 1e-6;

/// Below this denominator magnitude, complex division returns the zero
/// sentinel rather than blowing up.
pub const COMPLEX_DIV_EPSILON: Float = 1e-30;

/// Wavelength match tolerance (nm) for a Solver 3 backward ray hitting
/// a Laser. A free parameter; presets may recalibrate it.
pub const LASER_MATCH_TOLERANCE_NM: Float = 15.0;

/// A minimal complex number, hand-rolled rather than pulled in from
/// `num-complex` — the teacher crate already hand-rolls its own scalar
/// numerics rather than reaching for a numerics crate for a two-field
/// struct.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cplx {
    pub re: Float,
    pub im: Float,
}

impl Cplx {
    pub const fn new(re: Float, im: Float) -> Self {
        Cplx { re, im }
    }

    pub const ZERO: Cplx = Cplx::new(0.0, 0.0);

    pub fn real(re: Float) -> Self {
        Cplx::new(re, 0.0)
    }

    pub fn norm_sqr(self) -> Float {
        self.re * self.re + self.im * self.im
    }

    pub fn abs(self) -> Float {
        self.norm_sqr().sqrt()
    }

    pub fn conj(self) -> Self {
        Cplx::new(self.re, -self.im)
    }

    pub fn exp_i(theta: Float) -> Self {
        Cplx::new(theta.cos(), theta.sin())
    }

    /// Division with the underflow sentinel spec.md §7 calls for:
    /// denominators below `COMPLEX_DIV_EPSILON` in magnitude return
    /// zero rather than propagating an error.
    pub fn safe_div(self, rhs: Cplx) -> Cplx {
        let denom = rhs.norm_sqr();
        if denom < COMPLEX_DIV_EPSILON * COMPLEX_DIV_EPSILON {
            return Cplx::ZERO;
        }
        let num = self * rhs.conj();
        Cplx::new(num.re / denom, num.im / denom)
    }
}

impl std::ops::Add for Cplx {
    type Output = Cplx;
    fn add(self, rhs: Cplx) -> Cplx {
        Cplx::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl std::ops::Sub for Cplx {
    type Output = Cplx;
    fn sub(self, rhs: Cplx) -> Cplx {
        Cplx::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl std::ops::Mul for Cplx {
    type Output = Cplx;
    fn mul(self, rhs: Cplx) -> Cplx {
        Cplx::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl std::ops::Mul<Float> for Cplx {
    type Output = Cplx;
    fn mul(self, rhs: Float) -> Cplx {
        Cplx::new(self.re * rhs, self.im * rhs)
    }
}

impl std::ops::Add<Float> for Cplx {
    type Output = Cplx;
    fn add(self, rhs: Float) -> Cplx {
        Cplx::new(self.re + rhs, self.im)
    }
}

impl std::ops::Neg for Cplx {
    type Output = Cplx;
    fn neg(self) -> Cplx {
        Cplx::new(-self.re, -self.im)
    }
}

impl Default for Cplx {
    fn default() -> Self {
        Cplx::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn safe_div_underflow_returns_zero() {
        let z = Cplx::new(1.0, 1.0).safe_div(Cplx::new(1e-20, 0.0));
        assert_eq!(z, Cplx::ZERO);
    }

    #[test]
    fn div_matches_multiplication_inverse() {
        let a = Cplx::new(3.0, 4.0);
        let b = Cplx::new(1.0, -2.0);
        let q = a.safe_div(b);
        let back = q * b;
        assert_relative_eq!(back.re, a.re, epsilon = 1e-9);
        assert_relative_eq!(back.im, a.im, epsilon = 1e-9);
    }
}
