//! Retarder plate: passes the ray direction through unchanged and
//! rotates its Jones vector by the waveplate's 2x2 Jones matrix, fast
//! axis at `fast_axis_rad` and retardance `retardance_rad` (spec.md
//! §4.4, §8).

use crate::core::geometry::{intersect_z_plane, Bounds3f, HitRecord, InteractionResult, Ray, Vector3f};
use crate::core::jones::JonesMatrix;
use crate::core::pbrt::Float;
use crate::core::scene_graph::{AbcdPair, ComponentBase, LocalRay, OpticalElement};

pub struct Waveplate {
    pub base: ComponentBase,
    pub aperture_radius_mm: Float,
    pub fast_axis_rad: Float,
    pub retardance_rad: Float,
}

impl Waveplate {
    pub fn new(name: impl Into<String>, aperture_radius_mm: Float, fast_axis_rad: Float, retardance_rad: Float) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-aperture_radius_mm, -aperture_radius_mm, -0.5),
            Vector3f::new(aperture_radius_mm, aperture_radius_mm, 0.5),
        );
        Waveplate {
            base: ComponentBase::new(name, housing, 0.0),
            aperture_radius_mm,
            fast_axis_rad,
            retardance_rad,
        }
    }
}

impl OpticalElement for Waveplate {
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
        Some(HitRecord {
            t,
            point_world: p,
            normal_world: Vector3f::new(0.0, 0.0, 1.0),
            point_local: p,
            normal_local: Vector3f::new(0.0, 0.0, 1.0),
            direction_local: local_ray.d,
            surface_index: None,
        })
    }

    fn interact(&self, ray: &Ray, hit: &HitRecord) -> InteractionResult {
        let jones_matrix = JonesMatrix::waveplate(self.fast_axis_rad, self.retardance_rad);
        let mut child = ray.spawn_child(hit.point_world, ray.d);
        child.opl_mm += hit.t;
        // a waveplate's Jones matrix is unitary: it rotates phase and
        // polarization but never attenuates, so intensity carries over.
        child.jones = jones_matrix.apply(ray.jones);
        child.is_main_ray = ray.is_main_ray;
        InteractionResult::single(child)
    }

    fn abcd(&self) -> AbcdPair {
        AbcdPair::identity()
    }

    fn aperture_radius(&self) -> Option<Float> {
        Some(self.aperture_radius_mm)
    }

    fn type_name(&self) -> &'static str {
        "Waveplate"
    }
}
