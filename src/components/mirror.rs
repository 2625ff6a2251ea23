//! Circular or rectangular flat reflector. Reflects with a pi phase
//! shift (spec.md §4.4: "multiplies both Jones components by -1").

use crate::core::geometry::{intersect_z_plane, reflect, Bounds3f, HitRecord, InteractionResult, Point3f, Ray, Vector3f};
use crate::core::pbrt::Float;
use crate::core::scene_graph::{AbcdPair, ComponentBase, LocalRay, OpticalElement};

#[derive(Debug, Clone, Copy)]
pub enum MirrorAperture {
    Circular { radius_mm: Float },
    Rectangular { half_width_mm: Float, half_height_mm: Float },
}

impl MirrorAperture {
    fn contains(&self, p: Point3f) -> bool {
        match *self {
            MirrorAperture::Circular { radius_mm } => p.x * p.x + p.y * p.y <= radius_mm * radius_mm,
            MirrorAperture::Rectangular {
                half_width_mm,
                half_height_mm,
            } => p.x.abs() <= half_width_mm && p.y.abs() <= half_height_mm,
        }
    }

    fn bound_radius(&self) -> Float {
        match *self {
            MirrorAperture::Circular { radius_mm } => radius_mm,
            MirrorAperture::Rectangular {
                half_width_mm,
                half_height_mm,
            } => (half_width_mm * half_width_mm + half_height_mm * half_height_mm).sqrt(),
        }
    }
}

pub struct Mirror {
    pub base: ComponentBase,
    pub aperture: MirrorAperture,
}

impl Mirror {
    pub fn new(name: impl Into<String>, aperture: MirrorAperture) -> Self {
        let r = aperture.bound_radius();
        let housing = Bounds3f::new(Vector3f::new(-r, -r, -0.5), Vector3f::new(r, r, 0.5));
        Mirror {
            base: ComponentBase::new(name, housing, 0.0),
            aperture,
        }
    }
}

impl OpticalElement for Mirror {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let (t, p) = intersect_z_plane(local_ray.o, local_ray.d)?;
        if !self.aperture.contains(p) {
            return None;
        }
        let normal = Vector3f::new(0.0, 0.0, -1.0);
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
        let direction = reflect(ray.d, hit.normal_world);
        let mut child = ray.spawn_child(hit.point_world, direction);
        child.opl_mm += hit.t;
        child.jones = ray.jones.flip();
        child.is_main_ray = ray.is_main_ray;
        InteractionResult::single(child)
    }

    fn abcd(&self) -> AbcdPair {
        AbcdPair::identity()
    }

    fn type_name(&self) -> &'static str {
        "Mirror"
    }
}
