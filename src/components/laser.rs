//! Single-wavelength coherent source. An opaque AABB housing that
//! absorbs any external ray hitting it (spec.md §4.4).

use crate::core::geometry::{intersect_box_with_normal, Bounds3f, HitRecord, InteractionResult, Ray, Vector3f};
use crate::core::pbrt::Float;
use crate::core::scene_graph::{ComponentBase, LocalRay, OpticalElement};

pub struct Laser {
    pub base: ComponentBase,
    pub wavelength_m: Float,
    pub beam_radius_mm: Float,
    pub power: Float,
}

impl Laser {
    pub fn new(name: impl Into<String>, wavelength_m: Float, beam_radius_mm: Float, power: Float) -> Self {
        let housing_radius = beam_radius_mm.max(1.0) * 1.5;
        let housing = Bounds3f::new(
            Vector3f::new(-housing_radius, -housing_radius, -housing_radius * 2.0),
            Vector3f::new(housing_radius, housing_radius, 0.0),
        );
        Laser {
            base: ComponentBase::new(name, housing, 0.0),
            wavelength_m,
            beam_radius_mm,
            power,
        }
    }
}

impl OpticalElement for Laser {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let (t, p, n) = intersect_box_with_normal(&self.base.local_aabb, local_ray.o, local_ray.d)?;
        Some(HitRecord {
            t,
            point_world: p,
            normal_world: n,
            point_local: p,
            normal_local: n,
            direction_local: local_ray.d,
            surface_index: None,
        })
    }

    fn interact(&self, _ray: &Ray, _hit: &HitRecord) -> InteractionResult {
        InteractionResult::absorbed()
    }

    fn type_name(&self) -> &'static str {
        "Laser"
    }
}
