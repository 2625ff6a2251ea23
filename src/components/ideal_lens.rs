//! Infinitely thin paraxial lens: refracts as `dir' = normalize(focal
//! point - hit point)` for positive focal length, or the mirror analog
//! for negative (diverging) focal length. ABCD = `[1, 0; -1/f, 1]`
//! (spec.md §4.4).

use crate::core::geometry::{intersect_z_plane, Bounds3f, HitRecord, InteractionResult, Ray, Vector3f};
use crate::core::pbrt::Float;
use crate::core::scene_graph::{Abcd, AbcdPair, ComponentBase, LocalRay, OpticalElement};

pub struct IdealLens {
    pub base: ComponentBase,
    pub focal_length_mm: Float,
    pub aperture_radius_mm: Float,
}

impl IdealLens {
    pub fn new(name: impl Into<String>, focal_length_mm: Float, aperture_radius_mm: Float) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-aperture_radius_mm, -aperture_radius_mm, -0.5),
            Vector3f::new(aperture_radius_mm, aperture_radius_mm, 0.5),
        );
        IdealLens {
            base: ComponentBase::new(name, housing, 0.0),
            focal_length_mm,
            aperture_radius_mm,
        }
    }
}

impl OpticalElement for IdealLens {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let (t, p) = intersect_z_plane(local_ray.o, local_ray.d)?;
        if p.x * p.x + p.y * p.y > self.aperture_radius_mm * self.aperture_radius_mm {
            return None;
        }
        let mut normal = Vector3f::new(0.0, 0.0, 1.0);
        if normal.dot(local_ray.d) > 0.0 {
            normal = -normal;
        }
        Some(HitRecord {
            t,
            point_world: p,
            normal_world: normal,
            point_local: p,
            normal_local: normal,
            direction_local: local_ray.d,
            surface_index: None,
        })
    }

    fn interact(&self, ray: &Ray, hit: &HitRecord) -> InteractionResult {
        // Thin-lens ray-transfer matrix [1, 0; -1/f, 1] applied to each
        // transverse slope (dx/dz, dy/dz) independently: a ray parallel
        // to the axis refracts through the back focal point, a ray
        // through the front focal point exits parallel, and the two
        // compose correctly for an arbitrary incoming angle (e.g. the
        // second lens of an afocal pair).
        let d = hit.direction_local;
        let p = hit.point_local;
        let new_dx = d.x - (p.x / self.focal_length_mm) * d.z;
        let new_dy = d.y - (p.y / self.focal_length_mm) * d.z;
        let new_dir_local = Vector3f::new(new_dx, new_dy, d.z).normalize();
        let new_dir_world = self.base.local_to_world().transform_vector(new_dir_local).normalize();
        let mut child = ray.spawn_child(hit.point_world, new_dir_world);
        child.opl_mm += hit.t;
        child.is_main_ray = ray.is_main_ray;
        InteractionResult::single(child)
    }

    fn abcd(&self) -> AbcdPair {
        AbcdPair::isotropic(Abcd::thin_lens(self.focal_length_mm))
    }

    fn aperture_radius(&self) -> Option<Float> {
        Some(self.aperture_radius_mm)
    }

    fn type_name(&self) -> &'static str {
        "IdealLens"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Coherence, JonesVector};

    fn probe(o: crate::core::geometry::Point3f, d: Vector3f) -> Ray {
        Ray {
            o,
            d,
            wavelength_m: 532e-9,
            intensity: 1.0,
            jones: JonesVector::default(),
            opl_mm: 0.0,
            footprint_radius: 2.0,
            coherence: Coherence::Coherent,
            interaction_distance: None,
            entry_point: None,
            internal_polyline: Vec::new(),
            termination_point: None,
            exit_surface_tag: None,
            is_main_ray: false,
            source_id: "s".into(),
        }
    }

    #[test]
    fn converging_lens_focuses_parallel_off_axis_ray() {
        let lens = IdealLens::new("L", 100.0, 25.0);
        let local_ray = LocalRay {
            o: Vector3f::new(5.0, 0.0, -10.0),
            d: Vector3f::UNIT_Z,
        };
        let hit = lens.intersect(&local_ray).unwrap();
        let ray = probe(Vector3f::new(5.0, 0.0, -10.0), Vector3f::UNIT_Z);
        let result = lens.interact(&ray, &hit);
        let child = &result.rays[0];
        // the child should cross the axis at z = 100 from the lens plane
        let t_axis = -5.0 / child.d.x;
        let z_at_axis = t_axis * child.d.z;
        assert!((z_at_axis - 100.0).abs() < 1e-6);
    }

    #[test]
    fn ray_through_front_focal_point_exits_parallel() {
        // A ray arriving at an angle, aimed through the lens's own
        // front focal point, must exit with zero slope: the second
        // half of the thin-lens reciprocity the parallel-ray test above
        // doesn't exercise.
        let lens = IdealLens::new("L", 100.0, 25.0);
        let incoming_dir = Vector3f::new(5.0, 0.0, 100.0).normalize();
        let local_ray = LocalRay {
            o: Vector3f::new(0.0, 0.0, -100.0),
            d: incoming_dir,
        };
        let hit = lens.intersect(&local_ray).unwrap();
        let ray = probe(Vector3f::new(0.0, 0.0, -100.0), incoming_dir);
        let result = lens.interact(&ray, &hit);
        let child = &result.rays[0];
        assert!(child.d.x.abs() < 1e-6);
    }
}
