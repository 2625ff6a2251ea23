//! 3-vector arithmetic, unit quaternions, 4x4 affine matrices, AABBs,
//! and the handful of free-function math-kernel helpers (reflect,
//! refract, quadratic roots, the slab test) every component reaches
//! for in its `intersect`/`interact`.
//!
//! This is the crate's replacement for the mesh/math library the
//! original source leaned on (see spec.md §9): only what the component
//! library actually needs, nothing mesh-shaped.

use crate::core::jones::JonesVector;
use crate::core::pbrt::Float;

/// A 3-component vector used for both directions and points. Distinct
/// `Point3f`/`Vector3f`/`Normal3f` aliases document intent at call
/// sites the way the teacher crate's geometry module does, without
/// requiring the caller to juggle different underlying types.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vector3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

pub type Point3f = Vector3f;
pub type Normal3f = Vector3f;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Point2f {
    pub x: Float,
    pub y: Float,
}

impl Vector3f {
    pub const fn new(x: Float, y: Float, z: Float) -> Self {
        Vector3f { x, y, z }
    }

    pub const ZERO: Vector3f = Vector3f::new(0.0, 0.0, 0.0);
    pub const UNIT_Z: Vector3f = Vector3f::new(0.0, 0.0, 1.0);

    pub fn dot(self, rhs: Vector3f) -> Float {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(self, rhs: Vector3f) -> Vector3f {
        Vector3f::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    pub fn length_squared(self) -> Float {
        self.dot(self)
    }

    pub fn length(self) -> Float {
        self.length_squared().sqrt()
    }

    pub fn normalize(self) -> Vector3f {
        let len = self.length();
        if len < 1e-12 {
            return Vector3f::ZERO;
        }
        self * (1.0 / len)
    }

    /// Snaps components with magnitude below 1e-12 to exactly zero, so
    /// phantom axis components don't corrupt downstream intersection
    /// tests (spec.md §4.1).
    pub fn clean(self) -> Vector3f {
        let snap = |v: Float| if v.abs() < 1e-12 { 0.0 } else { v };
        Vector3f::new(snap(self.x), snap(self.y), snap(self.z))
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::ops::Add for Vector3f {
    type Output = Vector3f;
    fn add(self, rhs: Vector3f) -> Vector3f {
        Vector3f::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vector3f {
    type Output = Vector3f;
    fn sub(self, rhs: Vector3f) -> Vector3f {
        Vector3f::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<Float> for Vector3f {
    type Output = Vector3f;
    fn mul(self, rhs: Float) -> Vector3f {
        Vector3f::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::Neg for Vector3f {
    type Output = Vector3f;
    fn neg(self) -> Vector3f {
        Vector3f::new(-self.x, -self.y, -self.z)
    }
}

/// Reflection: `R = I - 2(N.I)N`.
pub fn reflect(incident: Vector3f, normal: Vector3f) -> Vector3f {
    incident - normal * (2.0 * normal.dot(incident))
}

/// Snell refraction. `eta` is `n1/n2` (incident-side index over
/// transmitted-side index). Returns `None` on total internal
/// reflection.
pub fn refract(incident: Vector3f, normal: Vector3f, eta: Float) -> Option<Vector3f> {
    let cos_i = -normal.dot(incident);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i).max(0.0);
    if sin2_t > 1.0 {
        return None; // TIR
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some((incident * eta + normal * (eta * cos_i - cos_t)).normalize())
}

/// Sorted real roots of `a*t^2 + b*t + c = 0`.
pub fn solve_quadratic(a: Float, b: Float, c: Float) -> Vec<Float> {
    if a.abs() < 1e-14 {
        if b.abs() < 1e-14 {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let sqrt_disc = disc.sqrt();
    let q = if b < 0.0 {
        -0.5 * (b - sqrt_disc)
    } else {
        -0.5 * (b + sqrt_disc)
    };
    let mut roots = if q.abs() < 1e-14 {
        vec![c / a]
    } else {
        let t0 = q / a;
        let t1 = c / q;
        vec![t0, t1]
    };
    roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
    roots
}

/// Ray-sphere intersection, sorted real roots (0, 1, or 2 of them).
/// Shared by every spherical-cap body (curved mirror, spherical lens).
pub fn intersect_sphere(origin: Point3f, dir: Vector3f, center: Point3f, radius: Float) -> Vec<Float> {
    let oc = origin - center;
    let a = dir.dot(dir);
    let b = 2.0 * dir.dot(oc);
    let c = oc.dot(oc) - radius * radius;
    solve_quadratic(a, b, c)
}

/// Axis-aligned bounding box, tested via the slab method.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds3f {
    pub min: Point3f,
    pub max: Point3f,
}

impl Bounds3f {
    pub fn new(min: Point3f, max: Point3f) -> Self {
        Bounds3f { min, max }
    }

    pub fn empty() -> Self {
        Bounds3f::new(
            Vector3f::new(Float::INFINITY, Float::INFINITY, Float::INFINITY),
            Vector3f::new(-Float::INFINITY, -Float::INFINITY, -Float::INFINITY),
        )
    }

    /// Slab-method intersection. Returns `(hit, t_min, t_max)`.
    pub fn intersect_ray(&self, origin: Point3f, dir: Vector3f) -> (bool, Float, Float) {
        let mut t_min = 0.0;
        let mut t_max = Float::INFINITY;
        for axis in 0..3 {
            let (o, d, lo, hi) = match axis {
                0 => (origin.x, dir.x, self.min.x, self.max.x),
                1 => (origin.y, dir.y, self.min.y, self.max.y),
                _ => (origin.z, dir.z, self.min.z, self.max.z),
            };
            if d.abs() < 1e-12 {
                if o < lo || o > hi {
                    return (false, 0.0, 0.0);
                }
                continue;
            }
            let inv_d = 1.0 / d;
            let mut t0 = (lo - o) * inv_d;
            let mut t1 = (hi - o) * inv_d;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return (false, 0.0, 0.0);
            }
        }
        (true, t_min, t_max)
    }
}

/// Slab test plus face normal for the entering surface, for the many
/// components whose housing is a plain box (laser/lamp housings,
/// aperture stops, sample chambers). Returns `None` on a miss or if
/// the box is entered from behind the ray origin.
pub fn intersect_box_with_normal(
    aabb: &Bounds3f,
    origin: Point3f,
    dir: Vector3f,
) -> Option<(Float, Point3f, Normal3f)> {
    let (hit, t_min, t_max) = aabb.intersect_ray(origin, dir);
    if !hit {
        return None;
    }
    let t = if t_min > 1e-9 { t_min } else { t_max };
    if t <= 0.0 {
        return None;
    }
    let p = origin + dir * t;
    let normal = box_face_normal(aabb, p);
    Some((t, p, normal))
}

/// Intersects the local-frame `z = 0` plane, the body every thin
/// planar optic (mirror, splitter, dichroic, filter, waveplate,
/// polarizer, aperture) is built around. Parallel-to-plane rays
/// (`|d.z| < 1e-6`) return the documented "miss" sentinel rather than
/// dividing by a near-zero denominator (spec.md §7).
pub fn intersect_z_plane(origin: Point3f, dir: Vector3f) -> Option<(Float, Point3f)> {
    if dir.z.abs() < 1e-6 {
        return None;
    }
    let t = -origin.z / dir.z;
    if t <= 0.0 {
        return None;
    }
    let p = origin + dir * t;
    Some((t, p))
}

fn box_face_normal(aabb: &Bounds3f, p: Point3f) -> Normal3f {
    let candidates = [
        (p.x - aabb.min.x, Vector3f::new(-1.0, 0.0, 0.0)),
        (aabb.max.x - p.x, Vector3f::new(1.0, 0.0, 0.0)),
        (p.y - aabb.min.y, Vector3f::new(0.0, -1.0, 0.0)),
        (aabb.max.y - p.y, Vector3f::new(0.0, 1.0, 0.0)),
        (p.z - aabb.min.z, Vector3f::new(0.0, 0.0, -1.0)),
        (aabb.max.z - p.z, Vector3f::new(0.0, 0.0, 1.0)),
    ];
    let mut best = candidates[0];
    for c in &candidates[1..] {
        if c.0.abs() < best.0.abs() {
            best = *c;
        }
    }
    best.1
}

/// Unit quaternion rotation, composed the way a pose's orientation is
/// composed across parent/child transforms.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quaternion {
    pub x: Float,
    pub y: Float,
    pub z: Float,
    pub w: Float,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn from_axis_angle(axis: Vector3f, angle: Float) -> Self {
        let axis = axis.normalize();
        let half = angle * 0.5;
        let s = half.sin();
        Quaternion {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: half.cos(),
        }
    }

    pub fn normalize(self) -> Quaternion {
        let len = (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt();
        if len < 1e-12 {
            return Quaternion::IDENTITY;
        }
        Quaternion {
            x: self.x / len,
            y: self.y / len,
            z: self.z / len,
            w: self.w / len,
        }
    }

    pub fn conj(self) -> Quaternion {
        Quaternion {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// Composition: applying `(self * rhs)` equals applying `rhs` then
    /// `self`.
    pub fn mul(self, rhs: Quaternion) -> Quaternion {
        Quaternion {
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        }
    }

    /// Rotates `v` by this quaternion.
    pub fn apply(self, v: Vector3f) -> Vector3f {
        let qv = Vector3f::new(self.x, self.y, self.z);
        let t = qv.cross(v) * 2.0;
        v + t * self.w + qv.cross(t)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion::IDENTITY
    }
}

/// Row-major 4x4 affine matrix.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub m: [[Float; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_pose(position: Point3f, rotation: Quaternion) -> Mat4 {
        let q = rotation.normalize();
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);
        let rot = [
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - z * w),
                2.0 * (x * z + y * w),
            ],
            [
                2.0 * (x * y + z * w),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - x * w),
            ],
            [
                2.0 * (x * z - y * w),
                2.0 * (y * z + x * w),
                1.0 - 2.0 * (x * x + y * y),
            ],
        ];
        Mat4 {
            m: [
                [rot[0][0], rot[0][1], rot[0][2], position.x],
                [rot[1][0], rot[1][1], rot[1][2], position.y],
                [rot[2][0], rot[2][1], rot[2][2], position.z],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn mul(&self, rhs: &Mat4) -> Mat4 {
        let mut out = [[0.0; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.m[i][k] * rhs.m[k][j];
                }
                out[i][j] = sum;
            }
        }
        Mat4 { m: out }
    }

    /// General affine inverse via cofactor expansion on the 3x3
    /// rotation/scale block plus translation back-substitution. Assumes
    /// the bottom row is `[0, 0, 0, 1]`, true for every pose transform
    /// this crate builds.
    pub fn inverse(&self) -> Mat4 {
        let a = &self.m;
        let (a00, a01, a02) = (a[0][0], a[0][1], a[0][2]);
        let (a10, a11, a12) = (a[1][0], a[1][1], a[1][2]);
        let (a20, a21, a22) = (a[2][0], a[2][1], a[2][2]);

        let c00 = a11 * a22 - a12 * a21;
        let c01 = -(a10 * a22 - a12 * a20);
        let c02 = a10 * a21 - a11 * a20;
        let det = a00 * c00 + a01 * c01 + a02 * c02;
        let inv_det = if det.abs() < 1e-14 { 0.0 } else { 1.0 / det };

        let c10 = -(a01 * a22 - a02 * a21);
        let c11 = a00 * a22 - a02 * a20;
        let c12 = -(a00 * a21 - a01 * a20);
        let c20 = a01 * a12 - a02 * a11;
        let c21 = -(a00 * a12 - a02 * a10);
        let c22 = a00 * a11 - a01 * a10;

        // inverse of the 3x3 block is the transpose-of-cofactors / det
        let r = [
            [c00 * inv_det, c10 * inv_det, c20 * inv_det],
            [c01 * inv_det, c11 * inv_det, c21 * inv_det],
            [c02 * inv_det, c12 * inv_det, c22 * inv_det],
        ];
        let t = [a[0][3], a[1][3], a[2][3]];
        let new_t = [
            -(r[0][0] * t[0] + r[0][1] * t[1] + r[0][2] * t[2]),
            -(r[1][0] * t[0] + r[1][1] * t[1] + r[1][2] * t[2]),
            -(r[2][0] * t[0] + r[2][1] * t[1] + r[2][2] * t[2]),
        ];
        Mat4 {
            m: [
                [r[0][0], r[0][1], r[0][2], new_t[0]],
                [r[1][0], r[1][1], r[1][2], new_t[1]],
                [r[2][0], r[2][1], r[2][2], new_t[2]],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn transform_point(&self, p: Point3f) -> Point3f {
        let m = &self.m;
        Vector3f::new(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
            m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
        )
    }

    pub fn transform_vector(&self, v: Vector3f) -> Vector3f {
        let m = &self.m;
        Vector3f::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Normals must transform by the inverse-transpose. Callers that
    /// already hold the inverse of the forward transform should call
    /// this on *that* matrix's transpose; `ComponentBase` precomputes
    /// the right one so call sites never need to think about it.
    pub fn transform_normal(&self, n: Normal3f) -> Normal3f {
        let m = &self.m;
        Vector3f::new(
            m[0][0] * n.x + m[1][0] * n.y + m[2][0] * n.z,
            m[0][1] * n.x + m[1][1] * n.y + m[2][1] * n.z,
            m[0][2] * n.x + m[1][2] * n.y + m[2][2] * n.z,
        )
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::IDENTITY
    }
}

/// One light sample in flight. See spec.md §3 for the field-by-field
/// rationale; visualization fields are authoritative only on the
/// parent ray and are stripped by [`Ray::spawn_child`].
#[derive(Debug, Clone)]
pub struct Ray {
    pub o: Point3f,
    pub d: Vector3f,
    /// Wavelength in meters (SI), per spec.md §6's unit convention.
    pub wavelength_m: Float,
    pub intensity: Float,
    pub jones: JonesVector,
    /// Accumulated optical path length, millimeters.
    pub opl_mm: Float,
    pub footprint_radius: Float,
    pub coherence: Coherence,
    /// Set by the tracer once a hit is found; marks the segment length
    /// for this ray.
    pub interaction_distance: Option<Float>,
    pub entry_point: Option<Point3f>,
    pub internal_polyline: Vec<Point3f>,
    pub termination_point: Option<Point3f>,
    pub exit_surface_tag: Option<String>,
    pub is_main_ray: bool,
    pub source_id: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Coherence {
    Coherent,
    Incoherent,
}

impl Ray {
    pub fn is_valid(&self) -> bool {
        self.o.is_finite()
            && self.d.is_finite()
            && self.d.length_squared() > 1e-12
            && self.wavelength_m.is_finite()
            && self.wavelength_m > 0.0
    }

    /// Builds a child ray inheriting physical state from `self` but
    /// with interior visualization fields stripped, per spec.md §3's
    /// invariant.
    pub fn spawn_child(&self, origin: Point3f, direction: Vector3f) -> Ray {
        Ray {
            o: origin,
            d: direction.normalize(),
            wavelength_m: self.wavelength_m,
            intensity: self.intensity,
            jones: self.jones,
            opl_mm: self.opl_mm,
            footprint_radius: self.footprint_radius,
            coherence: self.coherence,
            interaction_distance: None,
            entry_point: None,
            internal_polyline: Vec::new(),
            termination_point: None,
            exit_surface_tag: None,
            is_main_ray: false,
            source_id: self.source_id.clone(),
        }
    }
}

/// A ray-surface intersection. Local-frame data is kept alongside the
/// world-frame data to avoid a repeated world<->local round trip.
#[derive(Debug, Clone)]
pub struct HitRecord {
    pub t: Float,
    pub point_world: Point3f,
    pub normal_world: Vector3f,
    pub point_local: Point3f,
    pub normal_local: Vector3f,
    pub direction_local: Vector3f,
    pub surface_index: Option<usize>,
}

/// The result of a component's `interact`: zero or more child rays,
/// optionally flagged as an uninterrupted refractive passthrough.
#[derive(Debug, Clone, Default)]
pub struct InteractionResult {
    pub rays: Vec<Ray>,
    pub passthrough: bool,
}

impl InteractionResult {
    pub fn absorbed() -> Self {
        InteractionResult::default()
    }

    pub fn single(ray: Ray) -> Self {
        InteractionResult {
            rays: vec![ray],
            passthrough: false,
        }
    }

    pub fn passthrough(ray: Ray) -> Self {
        InteractionResult {
            rays: vec![ray],
            passthrough: true,
        }
    }

    pub fn split(a: Ray, b: Ray) -> Self {
        InteractionResult {
            rays: vec![a, b],
            passthrough: false,
        }
    }
}

/// Wavelength (nm, visible-light convention) to an approximate sRGB
/// triple for chart tinting. Standard piecewise-linear CIE
/// approximation used across the optics-visualization literature.
pub fn wavelength_to_rgb(nm: Float) -> (Float, Float, Float) {
    let (mut r, mut g, mut b);
    if nm >= 380.0 && nm < 440.0 {
        r = -(nm - 440.0) / (440.0 - 380.0);
        g = 0.0;
        b = 1.0;
    } else if nm < 490.0 {
        r = 0.0;
        g = (nm - 440.0) / (490.0 - 440.0);
        b = 1.0;
    } else if nm < 510.0 {
        r = 0.0;
        g = 1.0;
        b = -(nm - 510.0) / (510.0 - 490.0);
    } else if nm < 580.0 {
        r = (nm - 510.0) / (580.0 - 510.0);
        g = 1.0;
        b = 0.0;
    } else if nm < 645.0 {
        r = 1.0;
        g = -(nm - 645.0) / (645.0 - 580.0);
        b = 0.0;
    } else if nm <= 780.0 {
        r = 1.0;
        g = 0.0;
        b = 0.0;
    } else {
        r = 0.0;
        g = 0.0;
        b = 0.0;
    }
    let factor = if nm >= 380.0 && nm < 420.0 {
        0.3 + 0.7 * (nm - 380.0) / (420.0 - 380.0)
    } else if nm >= 420.0 && nm < 701.0 {
        1.0
    } else if nm >= 701.0 && nm <= 780.0 {
        0.3 + 0.7 * (780.0 - nm) / (780.0 - 700.0)
    } else {
        0.0
    };
    r *= factor;
    g *= factor;
    b *= factor;
    (r.max(0.0).min(1.0), g.max(0.0).min(1.0), b.max(0.0).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reflect_normal_incidence_reverses_direction() {
        let i = Vector3f::new(0.0, 0.0, 1.0);
        let n = Vector3f::new(0.0, 0.0, -1.0);
        let r = reflect(i, n);
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(r.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(r.z, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn refract_tir_returns_none() {
        // going from dense to less-dense medium at a steep angle
        let i = Vector3f::new(0.99, 0.0, 0.141).normalize();
        let n = Vector3f::new(0.0, 0.0, -1.0);
        let eta = 1.5 / 1.0;
        assert!(refract(i, n, eta).is_none());
    }

    #[test]
    fn quadratic_two_roots_sorted() {
        let roots = solve_quadratic(1.0, -3.0, 2.0);
        assert_eq!(roots.len(), 2);
        assert_relative_eq!(roots[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(roots[1], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn aabb_slab_hits_through_box() {
        let b = Bounds3f::new(Vector3f::new(-1.0, -1.0, -1.0), Vector3f::new(1.0, 1.0, 1.0));
        let (hit, t_min, t_max) = b.intersect_ray(Vector3f::new(0.0, 0.0, -5.0), Vector3f::UNIT_Z);
        assert!(hit);
        assert_relative_eq!(t_min, 4.0, epsilon = 1e-9);
        assert_relative_eq!(t_max, 6.0, epsilon = 1e-9);
    }

    #[test]
    fn quaternion_round_trip_inverse() {
        let q = Quaternion::from_axis_angle(Vector3f::new(0.0, 1.0, 0.0), 1.234);
        let v = Vector3f::new(1.0, 2.0, 3.0);
        let rotated = q.apply(v);
        let back = q.conj().apply(rotated);
        assert_relative_eq!(back.x, v.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, v.y, epsilon = 1e-9);
        assert_relative_eq!(back.z, v.z, epsilon = 1e-9);
    }

    #[test]
    fn mat4_inverse_undoes_pose() {
        let pose = Mat4::from_pose(
            Vector3f::new(1.0, -2.0, 3.0),
            Quaternion::from_axis_angle(Vector3f::new(0.0, 0.0, 1.0), 0.4),
        );
        let inv = pose.inverse();
        let round = pose.mul(&inv);
        for i in 0..4 {
            for j in 0..4 {
                let expect = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(round.m[i][j], expect, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn clean_snaps_tiny_components() {
        let v = Vector3f::new(1e-13, 1.0, -1e-14).clean();
        assert_eq!(v.x, 0.0);
        assert_eq!(v.z, 0.0);
        assert_eq!(v.y, 1.0);
    }
}
