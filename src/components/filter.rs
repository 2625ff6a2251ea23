//! Same flat-plate geometry as [`crate::components::dichroic::DichroicMirror`],
//! but the reflected branch is discarded outright: only the
//! transmitted ray, scaled by `T(lambda)`, survives (spec.md §4.4).

use crate::core::geometry::{intersect_z_plane, Bounds3f, HitRecord, InteractionResult, Ray, Vector3f};
use crate::core::pbrt::Float;
use crate::core::scene_graph::{AbcdPair, ComponentBase, LocalRay, OpticalElement};
use crate::core::spectrum::SpectralProfile;
use crate::core::units::m_to_nm;

pub struct Filter {
    pub base: ComponentBase,
    pub aperture_radius_mm: Float,
    pub profile: SpectralProfile,
}

impl Filter {
    pub fn new(name: impl Into<String>, aperture_radius_mm: Float, profile: SpectralProfile) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-aperture_radius_mm, -aperture_radius_mm, -0.5),
            Vector3f::new(aperture_radius_mm, aperture_radius_mm, 0.5),
        );
        Filter {
            base: ComponentBase::new(name, housing, 0.0),
            aperture_radius_mm,
            profile,
        }
    }
}

impl OpticalElement for Filter {
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
        let transmission = self.profile.transmission(m_to_nm(ray.wavelength_m));
        if transmission <= 0.0 {
            return InteractionResult::absorbed();
        }
        let mut child = ray.spawn_child(hit.point_world, ray.d);
        child.opl_mm += hit.t;
        child.intensity = ray.intensity * transmission;
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
        "Filter"
    }
}
