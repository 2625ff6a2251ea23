//! Viewing card: a probe surface that records where a ray landed
//! without terminating it. `interact` always returns a single
//! passthrough child (spec.md §4.4) so the beam continues past the
//! card exactly as if the card weren't there; the hit point itself is
//! what the viewport renders as the "spot on the card".

use crate::core::geometry::{intersect_z_plane, Bounds3f, HitRecord, InteractionResult, Ray, Vector3f};
use crate::core::pbrt::Float;
use crate::core::scene_graph::{AbcdPair, ComponentBase, LocalRay, OpticalElement};

pub struct Card {
    pub base: ComponentBase,
    pub half_width_mm: Float,
    pub half_height_mm: Float,
}

impl Card {
    pub fn new(name: impl Into<String>, half_width_mm: Float, half_height_mm: Float) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-half_width_mm, -half_height_mm, -0.5),
            Vector3f::new(half_width_mm, half_height_mm, 0.5),
        );
        Card {
            base: ComponentBase::new(name, housing, 0.0),
            half_width_mm,
            half_height_mm,
        }
    }
}

impl OpticalElement for Card {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let (t, p) = intersect_z_plane(local_ray.o, local_ray.d)?;
        if p.x.abs() > self.half_width_mm || p.y.abs() > self.half_height_mm {
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

    fn interact(&self, ray: &Ray, hit: &HitRecord) -> InteractionResult {
        let mut child = ray.spawn_child(hit.point_world, ray.d);
        child.opl_mm += hit.t;
        child.is_main_ray = ray.is_main_ray;
        InteractionResult::passthrough(child)
    }

    fn abcd(&self) -> AbcdPair {
        AbcdPair::identity()
    }

    fn aperture_radius(&self) -> Option<Float> {
        Some(self.half_width_mm.max(self.half_height_mm))
    }

    fn type_name(&self) -> &'static str {
        "Card"
    }
}
