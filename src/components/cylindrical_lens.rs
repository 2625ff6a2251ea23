//! As the spherical lens, but curvature only in the tangential (Y-Z)
//! plane; the sagittal (X-Z) plane behaves as a flat glass window
//! (spec.md §4.4). Surfaces are cylinders with their axis along local
//! X rather than spheres.

use crate::core::geometry::{refract, solve_quadratic, Bounds3f, HitRecord, InteractionResult, Point3f, Ray, Vector3f};
use crate::core::pbrt::Float;
use crate::core::scene_graph::{Abcd, AbcdPair, ComponentBase, LocalRay, OpticalElement};

pub struct CylindricalLens {
    pub base: ComponentBase,
    pub r1_mm: Option<Float>,
    pub r2_mm: Option<Float>,
    pub half_width_mm: Float,
    pub aperture_radius_mm: Float,
    pub thickness_mm: Float,
    pub ior: Float,
}

struct CapHit {
    t: Float,
    point: Point3f,
    normal: Vector3f,
}

impl CylindricalLens {
    pub fn new(
        name: impl Into<String>,
        r1_mm: Option<Float>,
        r2_mm: Option<Float>,
        half_width_mm: Float,
        aperture_radius_mm: Float,
        thickness_mm: Float,
        ior: Float,
        absorption: Float,
    ) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-half_width_mm, -aperture_radius_mm, -aperture_radius_mm),
            Vector3f::new(half_width_mm, aperture_radius_mm, thickness_mm + aperture_radius_mm),
        );
        CylindricalLens {
            base: ComponentBase::new(name, housing, absorption),
            r1_mm,
            r2_mm,
            half_width_mm,
            aperture_radius_mm,
            thickness_mm,
            ior,
        }
    }

    fn cap_hit(&self, origin: Point3f, dir: Vector3f, is_front: bool) -> Option<CapHit> {
        let radius = if is_front { self.r1_mm } else { self.r2_mm };
        let vertex_z = if is_front { 0.0 } else { self.thickness_mm };
        match radius {
            Some(r) => {
                let center_z = vertex_z + r;
                let a = dir.y * dir.y + dir.z * dir.z;
                let b = 2.0 * (origin.y * dir.y + (origin.z - center_z) * dir.z);
                let c = origin.y * origin.y + (origin.z - center_z) * (origin.z - center_z) - r * r;
                let t = solve_quadratic(a, b, c)
                    .into_iter()
                    .filter(|t| *t > 1e-9)
                    .find(|t| {
                        let p = origin + dir * *t;
                        p.x.abs() <= self.half_width_mm && p.y.abs() <= self.aperture_radius_mm
                    })?;
                let p = origin + dir * t;
                let mut normal = Vector3f::new(0.0, p.y, p.z - center_z).normalize();
                if normal.dot(dir) > 0.0 {
                    normal = -normal;
                }
                Some(CapHit { t, point: p, normal })
            }
            None => {
                if dir.z.abs() < 1e-6 {
                    return None;
                }
                let t = (vertex_z - origin.z) / dir.z;
                if t <= 1e-9 {
                    return None;
                }
                let p = origin + dir * t;
                if p.x.abs() > self.half_width_mm || p.y.abs() > self.aperture_radius_mm {
                    return None;
                }
                let mut normal = Vector3f::new(0.0, 0.0, 1.0);
                if normal.dot(dir) > 0.0 {
                    normal = -normal;
                }
                Some(CapHit { t, point: p, normal })
            }
        }
    }
}

impl OpticalElement for CylindricalLens {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let front = self.cap_hit(local_ray.o, local_ray.d, true);
        let back = self.cap_hit(local_ray.o, local_ray.d, false);
        let (t, point, normal, idx) = match (front, back) {
            (Some(f), Some(b)) => {
                if f.t < b.t {
                    (f.t, f.point, f.normal, 0)
                } else {
                    (b.t, b.point, b.normal, 1)
                }
            }
            (Some(f), None) => (f.t, f.point, f.normal, 0),
            (None, Some(b)) => (b.t, b.point, b.normal, 1),
            (None, None) => return None,
        };
        Some(HitRecord {
            t,
            point_world: point,
            normal_world: normal,
            point_local: point,
            normal_local: normal,
            direction_local: local_ray.d,
            surface_index: Some(idx),
        })
    }

    fn interact(&self, ray: &Ray, hit: &HitRecord) -> InteractionResult {
        let entered_front = hit.surface_index == Some(0);
        let eta_in = 1.0 / self.ior;
        let refracted = match refract(hit.direction_local, hit.normal_local, eta_in) {
            Some(d) => d,
            None => return InteractionResult::absorbed(),
        };
        let exit_hit = match self.cap_hit(hit.point_local, refracted, !entered_front) {
            Some(h) => h,
            None => return InteractionResult::absorbed(),
        };
        let eta_out = self.ior / 1.0;
        let final_dir = match refract(refracted, -exit_hit.normal, eta_out) {
            Some(d) => d,
            None => return InteractionResult::absorbed(),
        };
        let chord_length = (exit_hit.point - hit.point_local).length();
        let transmission = (-self.base.absorption * chord_length).exp();

        let entry_world = self.base.local_to_world().transform_point(hit.point_local);
        let exit_world = self.base.local_to_world().transform_point(exit_hit.point);
        let final_dir_world = self.base.local_to_world().transform_vector(final_dir).normalize();

        let mut child = ray.spawn_child(exit_world, final_dir_world);
        child.opl_mm = ray.opl_mm + hit.t + chord_length * self.ior;
        child.intensity = ray.intensity * transmission;
        child.entry_point = Some(entry_world);
        child.internal_polyline = vec![exit_world];
        child.is_main_ray = ray.is_main_ray;
        InteractionResult::passthrough(child)
    }

    fn abcd(&self) -> AbcdPair {
        let tangential_entry = Abcd::refraction(self.r1_mm, 1.0, self.ior);
        let tangential_translate = Abcd::translation(self.thickness_mm / self.ior);
        let tangential_exit = Abcd::refraction(self.r2_mm, self.ior, 1.0);
        let tangential = tangential_exit.product(tangential_translate.product(tangential_entry));

        // sagittal plane: flat window regardless of r1/r2.
        let sagittal_entry = Abcd::refraction(None, 1.0, self.ior);
        let sagittal_translate = Abcd::translation(self.thickness_mm / self.ior);
        let sagittal_exit = Abcd::refraction(None, self.ior, 1.0);
        let sagittal = sagittal_exit.product(sagittal_translate.product(sagittal_entry));

        AbcdPair { tangential, sagittal }
    }

    fn aperture_radius(&self) -> Option<Float> {
        Some(self.aperture_radius_mm.min(self.half_width_mm))
    }

    fn type_name(&self) -> &'static str {
        "CylindricalLens"
    }
}
