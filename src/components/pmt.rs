//! Photomultiplier tube: an absorbing point detector. No spatial
//! resolution, so Solver 1/2 visualization draws a single preview ray
//! along local +Z rather than a sensor grid (spec.md §4.4).

use crate::core::geometry::{intersect_z_plane, Bounds3f, HitRecord, InteractionResult, Ray, Vector3f};
use crate::core::pbrt::Float;
use crate::core::scene_graph::{AbcdPair, ComponentBase, LocalRay, OpticalElement};

pub struct Pmt {
    pub base: ComponentBase,
    pub active_radius_mm: Float,
}

impl Pmt {
    pub fn new(name: impl Into<String>, active_radius_mm: Float) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-active_radius_mm, -active_radius_mm, -0.5),
            Vector3f::new(active_radius_mm, active_radius_mm, 0.5),
        );
        Pmt {
            base: ComponentBase::new(name, housing, 0.0),
            active_radius_mm,
        }
    }

    /// The single preview ray drawn for this detector: local origin
    /// along local +Z.
    pub fn preview_ray_direction(&self) -> Vector3f {
        Vector3f::UNIT_Z
    }
}

impl OpticalElement for Pmt {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let (t, p) = intersect_z_plane(local_ray.o, local_ray.d)?;
        if p.x * p.x + p.y * p.y > self.active_radius_mm * self.active_radius_mm {
            return None;
        }
        Some(HitRecord {
            t,
            point_world: p,
            normal_world: Vector3f::new(0.0, 0.0, -1.0),
            point_local: p,
            normal_local: Vector3f::new(0.0, 0.0, -1.0),
            direction_local: local_ray.d,
            surface_index: None,
        })
    }

    fn interact(&self, _ray: &Ray, _hit: &HitRecord) -> InteractionResult {
        InteractionResult::absorbed()
    }

    fn abcd(&self) -> AbcdPair {
        AbcdPair::identity()
    }

    fn aperture_radius(&self) -> Option<Float> {
        Some(self.active_radius_mm)
    }

    fn type_name(&self) -> &'static str {
        "Pmt"
    }
}
