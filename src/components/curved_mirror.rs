//! Spherical cap reflector with a front (and optional flat back) face
//! plus a rim test; rim hits are absorbed via a sentinel normal
//! (spec.md §4.4). ABCD = `[1, 0; -2/R, 1]` for non-flat R.

use crate::core::geometry::{
    intersect_sphere, reflect, Bounds3f, HitRecord, InteractionResult, Point3f, Ray, Vector3f,
};
use crate::core::pbrt::Float;
use crate::core::scene_graph::{Abcd, AbcdPair, ComponentBase, LocalRay, OpticalElement};

/// `None` models a flat mirror (no curvature); `Some(r)` a spherical
/// cap of radius `r` (positive: concave toward -Z, the approach side).
pub struct CurvedMirror {
    pub base: ComponentBase,
    pub radius_mm: Option<Float>,
    pub aperture_radius_mm: Float,
}

impl CurvedMirror {
    pub fn new(name: impl Into<String>, radius_mm: Option<Float>, aperture_radius_mm: Float) -> Self {
        let sag = radius_mm
            .map(|r| r.abs() - (r * r - aperture_radius_mm * aperture_radius_mm).max(0.0).sqrt())
            .unwrap_or(0.0);
        let housing = Bounds3f::new(
            Vector3f::new(-aperture_radius_mm, -aperture_radius_mm, -sag.abs() - 0.5),
            Vector3f::new(aperture_radius_mm, aperture_radius_mm, 0.5),
        );
        CurvedMirror {
            base: ComponentBase::new(name, housing, 0.0),
            radius_mm,
            aperture_radius_mm,
        }
    }

    fn is_rim(&self, p: Point3f) -> bool {
        p.x * p.x + p.y * p.y > self.aperture_radius_mm * self.aperture_radius_mm
    }
}

impl OpticalElement for CurvedMirror {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let (t, p, normal) = match self.radius_mm {
            None => {
                let (t, p) = crate::core::geometry::intersect_z_plane(local_ray.o, local_ray.d)?;
                (t, p, Vector3f::new(0.0, 0.0, -1.0))
            }
            Some(r) => {
                // vertex at origin, sphere center on the axis at z = r
                let center = Vector3f::new(0.0, 0.0, r);
                let roots = intersect_sphere(local_ray.o, local_ray.d, center, r.abs());
                let t = roots.into_iter().find(|t| *t > 1e-9)?;
                let p = local_ray.o + local_ray.d * t;
                let mut normal = (p - center).normalize();
                if normal.dot(local_ray.d) > 0.0 {
                    normal = -normal;
                }
                (t, p, normal)
            }
        };
        if self.is_rim(p) {
            // rim hits are absorbed: sentinel zero normal signals the
            // interact step to terminate the branch instead of
            // reflecting.
            return Some(HitRecord {
                t,
                point_world: p,
                normal_world: Vector3f::ZERO,
                point_local: p,
                normal_local: Vector3f::ZERO,
                direction_local: local_ray.d,
                surface_index: Some(1),
            });
        }
        Some(HitRecord {
            t,
            point_world: p,
            normal_world: normal,
            point_local: p,
            normal_local: normal,
            direction_local: local_ray.d,
            surface_index: Some(0),
        })
    }

    fn interact(&self, ray: &Ray, hit: &HitRecord) -> InteractionResult {
        if hit.surface_index == Some(1) {
            return InteractionResult::absorbed();
        }
        let direction = reflect(ray.d, hit.normal_world);
        let mut child = ray.spawn_child(hit.point_world, direction);
        child.opl_mm += hit.t;
        child.jones = ray.jones.flip();
        child.is_main_ray = ray.is_main_ray;
        InteractionResult::single(child)
    }

    fn abcd(&self) -> AbcdPair {
        match self.radius_mm {
            None => AbcdPair::identity(),
            Some(r) => AbcdPair::isotropic(Abcd::curved_mirror(r)),
        }
    }

    fn aperture_radius(&self) -> Option<Float> {
        Some(self.aperture_radius_mm)
    }

    fn type_name(&self) -> &'static str {
        "CurvedMirror"
    }
}
