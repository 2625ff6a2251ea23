//! A one-dimensional stop: blocks outside a band in Y only, passing
//! the full sagittal (X) extent. Used where Solver 2 needs asymmetric
//! tangential/sagittal clipping rather than a circular stop (spec.md
//! §4.4).

use crate::core::geometry::{intersect_z_plane, Bounds3f, HitRecord, InteractionResult, Ray, Vector3f};
use crate::core::pbrt::Float;
use crate::core::scene_graph::{AbcdPair, ComponentBase, LocalRay, OpticalElement};

pub struct SlitAperture {
    pub base: ComponentBase,
    pub half_width_y_mm: Float,
    pub plate_half_width_x_mm: Float,
}

impl SlitAperture {
    pub fn new(name: impl Into<String>, half_width_y_mm: Float, plate_half_width_x_mm: Float) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-plate_half_width_x_mm, -plate_half_width_x_mm, -0.5),
            Vector3f::new(plate_half_width_x_mm, plate_half_width_x_mm, 0.5),
        );
        SlitAperture {
            base: ComponentBase::new(name, housing, 0.0),
            half_width_y_mm,
            plate_half_width_x_mm,
        }
    }
}

impl OpticalElement for SlitAperture {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let (t, p) = intersect_z_plane(local_ray.o, local_ray.d)?;
        if p.x.abs() > self.plate_half_width_x_mm {
            return None;
        }
        if p.y.abs() <= self.half_width_y_mm {
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

    fn interact(&self, _ray: &Ray, _hit: &HitRecord) -> InteractionResult {
        InteractionResult::absorbed()
    }

    fn abcd(&self) -> AbcdPair {
        AbcdPair::identity()
    }

    fn aperture_radius(&self) -> Option<Float> {
        Some(self.half_width_y_mm)
    }

    fn aperture_radii(&self) -> Option<(Float, Float)> {
        Some((self.half_width_y_mm, self.plate_half_width_x_mm))
    }

    fn type_name(&self) -> &'static str {
        "SlitAperture"
    }
}
