//! Linear polarizer: passes the ray direction through unchanged and
//! projects its Jones vector onto the transmission axis at
//! `axis_rad`, attenuating intensity by the projected fraction
//! (spec.md §4.4, §8).

use crate::core::geometry::{intersect_z_plane, Bounds3f, HitRecord, InteractionResult, Ray, Vector3f};
use crate::core::jones::JonesMatrix;
use crate::core::pbrt::Float;
use crate::core::scene_graph::{AbcdPair, ComponentBase, LocalRay, OpticalElement};

pub struct Polarizer {
    pub base: ComponentBase,
    pub aperture_radius_mm: Float,
    pub axis_rad: Float,
}

impl Polarizer {
    pub fn new(name: impl Into<String>, aperture_radius_mm: Float, axis_rad: Float) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-aperture_radius_mm, -aperture_radius_mm, -0.5),
            Vector3f::new(aperture_radius_mm, aperture_radius_mm, 0.5),
        );
        Polarizer {
            base: ComponentBase::new(name, housing, 0.0),
            aperture_radius_mm,
            axis_rad,
        }
    }
}

impl OpticalElement for Polarizer {
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
        let before = ray.jones.intensity().max(1e-12);
        let projected = JonesMatrix::polarizer(self.axis_rad).apply(ray.jones);
        let transmitted_fraction = projected.intensity() / before;
        if transmitted_fraction <= 1e-9 {
            return InteractionResult::absorbed();
        }
        let mut child = ray.spawn_child(hit.point_world, ray.d);
        child.opl_mm += hit.t;
        child.jones = projected;
        child.intensity = ray.intensity * transmitted_fraction;
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
        "Polarizer"
    }
}
