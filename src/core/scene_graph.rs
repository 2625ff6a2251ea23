//! `OpticalComponent` base: pose, lazily-maintained world/local
//! matrices, version counter, and the `chk_intersection` wrapper every
//! component gets for free (spec.md §4.3).
//!
//! Local axis convention, everywhere: the optical axis is local +Z,
//! the transverse plane is (X, Y).

use crate::core::geometry::{HitRecord, InteractionResult, Mat4, Point3f, Quaternion, Ray, Vector3f};
use crate::core::pbrt::{Float, EPSILON};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

/// Allocates a process-unique, monotonic component id. Stable for the
/// lifetime of the process; that's all spec.md §3 requires ("stable
/// id").
pub fn next_component_id() -> u64 {
    NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pose {
    pub position: Point3f,
    pub rotation: Quaternion,
}

impl Default for Pose {
    fn default() -> Self {
        Pose {
            position: Vector3f::ZERO,
            rotation: Quaternion::IDENTITY,
        }
    }
}

use crate::core::geometry::Bounds3f;

/// The data every concrete component embeds and delegates to. Not a
/// trait default method's `self` (Rust has no field inheritance) —
/// components hold a `ComponentBase` and forward the shared operations
/// to it, the same shape the teacher crate uses for its own
/// "inherited from X" base-class fields (see e.g. `PathIntegrator`'s
/// `pixel_bounds`, lifted verbatim from `SamplerIntegrator`).
#[derive(Debug, Clone)]
pub struct ComponentBase {
    pub id: u64,
    pub name: String,
    pose: Pose,
    local_to_world: Mat4,
    world_to_local: Mat4,
    pub version: u64,
    pub local_aabb: Bounds3f,
    pub absorption: Float,
}

impl ComponentBase {
    pub fn new(name: impl Into<String>, local_aabb: Bounds3f, absorption: Float) -> Self {
        let pose = Pose::default();
        ComponentBase {
            id: next_component_id(),
            name: name.into(),
            pose,
            local_to_world: Mat4::from_pose(pose.position, pose.rotation),
            world_to_local: Mat4::from_pose(pose.position, pose.rotation).inverse(),
            version: 0,
            local_aabb,
            absorption,
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn local_to_world(&self) -> &Mat4 {
        &self.local_to_world
    }

    pub fn world_to_local(&self) -> &Mat4 {
        &self.world_to_local
    }

    fn recompute_matrices(&mut self) {
        self.local_to_world = Mat4::from_pose(self.pose.position, self.pose.rotation);
        self.world_to_local = self.local_to_world.inverse();
        self.version += 1;
    }

    pub fn set_position(&mut self, position: Point3f) {
        self.pose.position = position;
        self.recompute_matrices();
    }

    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.pose.rotation = rotation.normalize();
        self.recompute_matrices();
    }

    /// Orients local +Z to point along `axis` (world space), leaving
    /// position untouched.
    pub fn point_along(&mut self, axis: Vector3f) {
        let axis = axis.normalize();
        let local_z = Vector3f::UNIT_Z;
        let dot = local_z.dot(axis).max(-1.0).min(1.0);
        let rotation = if (dot - 1.0).abs() < 1e-9 {
            Quaternion::IDENTITY
        } else if (dot + 1.0).abs() < 1e-9 {
            Quaternion::from_axis_angle(Vector3f::new(1.0, 0.0, 0.0), std::f64::consts::PI)
        } else {
            let axis_cross = local_z.cross(axis);
            Quaternion::from_axis_angle(axis_cross, dot.acos())
        };
        self.set_rotation(rotation);
    }
}

/// The uniform two-operation interaction contract every optical
/// element implements (spec.md §4.4), plus the capability surface
/// Solver 2 needs (`abcd`, `aperture_radius`) and the registry tag
/// (spec.md §9).
pub trait OpticalElement {
    fn base(&self) -> &ComponentBase;
    fn base_mut(&mut self) -> &mut ComponentBase;

    /// Intersect a ray already expressed in local coordinates.
    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord>;

    /// Given an incoming ray (world frame) and its hit, produce child
    /// rays. Empty = absorption.
    fn interact(&self, ray: &Ray, hit: &HitRecord) -> InteractionResult;

    /// Tangential/sagittal ABCD matrices for Solver 2. Identity for
    /// non-refractive, non-focusing elements.
    fn abcd(&self) -> AbcdPair {
        AbcdPair::identity()
    }

    /// Finite aperture radius (mm), if any, used by Solver 2's
    /// truncation model.
    fn aperture_radius(&self) -> Option<Float> {
        None
    }

    /// Separate tangential/sagittal half-apertures (mm) for elements
    /// whose clipping is asymmetric (e.g. a slit). Defaults to the
    /// isotropic `aperture_radius` in both planes.
    fn aperture_radii(&self) -> Option<(Float, Float)> {
        self.aperture_radius().map(|r| (r, r))
    }

    /// Stable type-name string for the external serialization
    /// round-trip registry (spec.md §6, §9).
    fn type_name(&self) -> &'static str;

    /// Wraps `intersect`: transforms the world ray into local space,
    /// delegates, then lifts the hit back to world coordinates while
    /// retaining the local point/normal/direction (spec.md §4.3).
    fn chk_intersection(&self, world_ray: &Ray) -> Option<HitRecord> {
        let base = self.base();
        let w2l = base.world_to_local();
        let local_origin = w2l.transform_point(world_ray.o);
        let local_dir = w2l.transform_vector(world_ray.d).normalize();
        if local_dir.length_squared() < 1e-12 {
            return None;
        }
        let local_ray = LocalRay {
            o: local_origin,
            d: local_dir,
        };
        let mut hit = self.intersect(&local_ray)?;
        if hit.t <= EPSILON {
            return None;
        }
        let l2w = base.local_to_world();
        hit.point_world = l2w.transform_point(hit.point_local);
        // normals transform by inverse-transpose; world_to_local is the
        // inverse of local_to_world, so its transpose is exactly that.
        hit.normal_world = transform_normal_by_inverse(w2l, hit.normal_local).normalize();
        hit.direction_local = local_dir;
        Some(hit)
    }
}

fn transform_normal_by_inverse(world_to_local: &Mat4, n: Vector3f) -> Vector3f {
    // (M^-1)^T applied to n, where world_to_local = M^-1 already.
    // transform_normal on a matrix A computes A^T * n using A's
    // rows-as-columns convention; feeding it world_to_local yields
    // (M^-1)^T * n as required.
    world_to_local.transform_normal(n)
}

/// A ray already transformed into a component's local frame — a
/// distinct type from [`crate::core::geometry::Ray`] so `intersect`
/// implementations can't accidentally read world-frame physical state
/// (wavelength, intensity, polarization) that isn't meaningful until
/// after the hit is found.
#[derive(Debug, Copy, Clone)]
pub struct LocalRay {
    pub o: Point3f,
    pub d: Vector3f,
}

/// Paraxial ABCD matrix pair: separate tangential (Y-Z) and sagittal
/// (X-Z) planes, since astigmatic elements (cylindrical lens, prism)
/// need them to differ. Non-astigmatic elements report equal planes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Abcd {
    pub a: Float,
    pub b: Float,
    pub c: Float,
    pub d: Float,
}

impl Abcd {
    pub const IDENTITY: Abcd = Abcd {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
    };

    pub fn translation(length_mm: Float) -> Abcd {
        Abcd {
            a: 1.0,
            b: length_mm,
            c: 0.0,
            d: 1.0,
        }
    }

    pub fn thin_lens(focal_length_mm: Float) -> Abcd {
        Abcd {
            a: 1.0,
            b: 0.0,
            c: -1.0 / focal_length_mm,
            d: 1.0,
        }
    }

    pub fn curved_mirror(radius_mm: Float) -> Abcd {
        Abcd {
            a: 1.0,
            b: 0.0,
            c: -2.0 / radius_mm,
            d: 1.0,
        }
    }

    /// Refraction at a spherical interface of radius `radius_mm`
    /// (positive if convex toward incoming light), `eta = n1/n2`.
    pub fn spherical_refraction(radius_mm: Float, n1: Float, n2: Float) -> Abcd {
        Abcd {
            a: 1.0,
            b: 0.0,
            c: (n1 - n2) / (n2 * radius_mm),
            d: n1 / n2,
        }
    }

    /// Refraction at a possibly-flat interface: `radius_mm = None`
    /// degenerates to the flat-window case (`A=1, B=0, C=0, D=n1/n2`),
    /// which is exactly what falls out of `spherical_refraction` as
    /// the radius goes to infinity.
    pub fn refraction(radius_mm: Option<Float>, n1: Float, n2: Float) -> Abcd {
        match radius_mm {
            Some(r) => Abcd::spherical_refraction(r, n1, n2),
            None => Abcd {
                a: 1.0,
                b: 0.0,
                c: 0.0,
                d: n1 / n2,
            },
        }
    }

    pub fn product(self, rhs: Abcd) -> Abcd {
        Abcd {
            a: self.a * rhs.a + self.b * rhs.c,
            b: self.a * rhs.b + self.b * rhs.d,
            c: self.c * rhs.a + self.d * rhs.c,
            d: self.c * rhs.b + self.d * rhs.d,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AbcdPair {
    pub tangential: Abcd,
    pub sagittal: Abcd,
}

impl AbcdPair {
    pub fn identity() -> Self {
        AbcdPair {
            tangential: Abcd::IDENTITY,
            sagittal: Abcd::IDENTITY,
        }
    }

    pub fn isotropic(abcd: Abcd) -> Self {
        AbcdPair {
            tangential: abcd,
            sagittal: abcd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_along_orients_local_z() {
        let mut base = ComponentBase::new("test", Bounds3f::empty(), 0.0);
        base.point_along(Vector3f::new(1.0, 0.0, 0.0));
        let world_z = base.local_to_world().transform_vector(Vector3f::UNIT_Z);
        assert!((world_z.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn version_bumps_on_mutation() {
        let mut base = ComponentBase::new("test", Bounds3f::empty(), 0.0);
        let v0 = base.version;
        base.set_position(Vector3f::new(1.0, 0.0, 0.0));
        assert_eq!(base.version, v0 + 1);
    }
}
