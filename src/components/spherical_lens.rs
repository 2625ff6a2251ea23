//! Body generated from radii R1, R2, aperture radius, and thickness;
//! intersected as two spherical caps plus a cylindrical rim. A single
//! `interact` call on the entry cap walks the ray straight through to
//! the exit cap (passthrough), applying Snell refraction at both faces
//! and Beer-Lambert attenuation over the in-glass chord (spec.md
//! §4.4).

use crate::core::geometry::{
    intersect_sphere, intersect_z_plane, refract, Bounds3f, HitRecord, InteractionResult, Point3f, Ray,
    Vector3f,
};
use crate::core::pbrt::Float;
use crate::core::scene_graph::{Abcd, AbcdPair, ComponentBase, LocalRay, OpticalElement};

pub struct SphericalLens {
    pub base: ComponentBase,
    pub r1_mm: Option<Float>,
    pub r2_mm: Option<Float>,
    pub aperture_radius_mm: Float,
    pub thickness_mm: Float,
    pub ior: Float,
}

struct CapHit {
    t: Float,
    point: Point3f,
    /// Outward normal, oriented to face whichever direction the probe
    /// ray arrived from.
    normal: Vector3f,
    is_front: bool,
}

impl SphericalLens {
    pub fn new(
        name: impl Into<String>,
        r1_mm: Option<Float>,
        r2_mm: Option<Float>,
        aperture_radius_mm: Float,
        thickness_mm: Float,
        ior: Float,
        absorption: Float,
    ) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-aperture_radius_mm, -aperture_radius_mm, -aperture_radius_mm),
            Vector3f::new(
                aperture_radius_mm,
                aperture_radius_mm,
                thickness_mm + aperture_radius_mm,
            ),
        );
        SphericalLens {
            base: ComponentBase::new(name, housing, absorption),
            r1_mm,
            r2_mm,
            aperture_radius_mm,
            thickness_mm,
            ior,
        }
    }

    fn front_center(&self) -> Point3f {
        Vector3f::new(0.0, 0.0, self.r1_mm.unwrap_or(0.0))
    }

    fn back_center(&self) -> Point3f {
        Vector3f::new(0.0, 0.0, self.thickness_mm + self.r2_mm.unwrap_or(0.0))
    }

    fn cap_hit(&self, origin: Point3f, dir: Vector3f, is_front: bool) -> Option<CapHit> {
        let radius = if is_front { self.r1_mm } else { self.r2_mm };
        let vertex_z = if is_front { 0.0 } else { self.thickness_mm };
        let (t, p) = match radius {
            Some(r) => {
                let center = if is_front { self.front_center() } else { self.back_center() };
                let t = intersect_sphere(origin, dir, center, r.abs())
                    .into_iter()
                    .filter(|t| *t > 1e-9)
                    .find(|t| {
                        let p = origin + dir * *t;
                        p.x * p.x + p.y * p.y <= self.aperture_radius_mm * self.aperture_radius_mm
                    })?;
                (t, origin + dir * t)
            }
            None => {
                let local_origin = origin - Vector3f::new(0.0, 0.0, vertex_z);
                let (t, p_rel) = intersect_z_plane(local_origin, dir)?;
                let p = p_rel + Vector3f::new(0.0, 0.0, vertex_z);
                if p.x * p.x + p.y * p.y > self.aperture_radius_mm * self.aperture_radius_mm {
                    return None;
                }
                (t, p)
            }
        };
        let center = if is_front { self.front_center() } else { self.back_center() };
        let mut normal = match radius {
            Some(_) => (p - center).normalize(),
            None => Vector3f::new(0.0, 0.0, 1.0),
        };
        if normal.dot(dir) > 0.0 {
            normal = -normal;
        }
        Some(CapHit {
            t,
            point: p,
            normal,
            is_front,
        })
    }

    fn rim_hit(&self, origin: Point3f, dir: Vector3f) -> Option<Float> {
        let a = dir.x * dir.x + dir.y * dir.y;
        if a < 1e-14 {
            return None;
        }
        let b = 2.0 * (origin.x * dir.x + origin.y * dir.y);
        let c = origin.x * origin.x + origin.y * origin.y
            - self.aperture_radius_mm * self.aperture_radius_mm;
        crate::core::geometry::solve_quadratic(a, b, c)
            .into_iter()
            .find(|t| {
                if *t <= 1e-9 {
                    return false;
                }
                let z = (origin + dir * *t).z;
                z >= -1e-6 && z <= self.thickness_mm + 1e-6
            })
    }
}

impl OpticalElement for SphericalLens {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let front = self.cap_hit(local_ray.o, local_ray.d, true);
        let back = self.cap_hit(local_ray.o, local_ray.d, false);
        let rim = self.rim_hit(local_ray.o, local_ray.d);

        let mut best_t = Float::INFINITY;
        let mut surface_index = 2usize;
        let mut point = Vector3f::ZERO;
        let mut normal = Vector3f::ZERO;
        if let Some(ref hit) = front {
            if hit.t < best_t {
                best_t = hit.t;
                surface_index = 0;
                point = hit.point;
                normal = hit.normal;
            }
        }
        if let Some(ref hit) = back {
            if hit.t < best_t {
                best_t = hit.t;
                surface_index = 1;
                point = hit.point;
                normal = hit.normal;
            }
        }
        if let Some(t) = rim {
            if t < best_t {
                best_t = t;
                surface_index = 2;
                point = local_ray.o + local_ray.d * t;
                normal = Vector3f::ZERO;
            }
        }
        if !best_t.is_finite() {
            return None;
        }
        Some(HitRecord {
            t: best_t,
            point_world: point,
            normal_world: normal,
            point_local: point,
            normal_local: normal,
            direction_local: local_ray.d,
            surface_index: Some(surface_index),
        })
    }

    fn interact(&self, ray: &Ray, hit: &HitRecord) -> InteractionResult {
        if hit.surface_index == Some(2) {
            return InteractionResult::absorbed();
        }
        let entered_front = hit.surface_index == Some(0);
        let entry_normal = hit.normal_local;
        let eta_in = 1.0 / self.ior;
        let refracted = match refract(hit.direction_local, entry_normal, eta_in) {
            Some(d) => d,
            None => return InteractionResult::absorbed(),
        };
        let exit_hit = match self.cap_hit(hit.point_local, refracted, !entered_front) {
            Some(h) => h,
            None => return InteractionResult::absorbed(),
        };
        let eta_out = self.ior / 1.0;
        // `refract` expects the normal oriented against the incident
        // direction; the exit cap's normal as stored already points
        // outward (with the incident ray), so flip it for the call.
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
        let entry = Abcd::refraction(self.r1_mm, 1.0, self.ior);
        let translate = Abcd::translation(self.thickness_mm / self.ior);
        let exit = Abcd::refraction(self.r2_mm, self.ior, 1.0);
        let m = exit.product(translate.product(entry));
        AbcdPair::isotropic(m)
    }

    fn aperture_radius(&self) -> Option<Float> {
        Some(self.aperture_radius_mm)
    }

    fn type_name(&self) -> &'static str {
        "SphericalLens"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Coherence, JonesVector};

    fn probe_ray(origin: Point3f, dir: Vector3f) -> Ray {
        Ray {
            o: origin,
            d: dir,
            wavelength_m: 532e-9,
            intensity: 1.0,
            jones: JonesVector::default(),
            opl_mm: 0.0,
            footprint_radius: 0.1,
            coherence: Coherence::Coherent,
            interaction_distance: None,
            entry_point: None,
            internal_polyline: Vec::new(),
            termination_point: None,
            exit_surface_tag: None,
            is_main_ray: true,
            source_id: "test".into(),
        }
    }

    #[test]
    fn on_axis_ray_passes_through_symmetric_lens() {
        let lens = SphericalLens::new("L", Some(50.0), Some(-50.0), 10.0, 4.0, 1.5, 0.0001);
        let local_ray = LocalRay {
            o: Vector3f::new(0.0, 0.0, -10.0),
            d: Vector3f::UNIT_Z,
        };
        let hit = lens.intersect(&local_ray).expect("front hit");
        assert_eq!(hit.surface_index, Some(0));
        let ray = probe_ray(Vector3f::new(0.0, 0.0, -10.0), Vector3f::UNIT_Z);
        let result = lens.interact(&ray, &hit);
        assert!(result.passthrough);
        let child = &result.rays[0];
        // on-axis ray through a symmetric lens stays on-axis
        assert!(child.d.x.abs() < 1e-6);
        assert!(child.d.y.abs() < 1e-6);
    }
}
