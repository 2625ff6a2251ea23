//! Thin flat plate that always splits the incident ray into a
//! transmitted child (same direction, intensity scaled by `T`) and a
//! reflected child (mirror direction, intensity scaled by `1 - T`),
//! with `T` a fixed constant rather than wavelength-dependent (spec.md
//! §4.4; see [`crate::components::dichroic::DichroicMirror`] for the
//! spectral variant).

use crate::core::geometry::{intersect_z_plane, reflect, Bounds3f, HitRecord, InteractionResult, Ray, Vector3f};
use crate::core::pbrt::Float;
use crate::core::scene_graph::{AbcdPair, ComponentBase, LocalRay, OpticalElement};

pub struct BeamSplitter {
    pub base: ComponentBase,
    pub aperture_radius_mm: Float,
    pub transmission: Float,
}

impl BeamSplitter {
    pub fn new(name: impl Into<String>, aperture_radius_mm: Float, transmission: Float) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-aperture_radius_mm, -aperture_radius_mm, -0.5),
            Vector3f::new(aperture_radius_mm, aperture_radius_mm, 0.5),
        );
        BeamSplitter {
            base: ComponentBase::new(name, housing, 0.0),
            aperture_radius_mm,
            transmission,
        }
    }
}

impl OpticalElement for BeamSplitter {
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
        let mut transmitted = ray.spawn_child(hit.point_world, ray.d);
        transmitted.opl_mm += hit.t;
        transmitted.intensity = ray.intensity * self.transmission;
        transmitted.is_main_ray = ray.is_main_ray;

        let reflected_dir = reflect(ray.d, hit.normal_world);
        let mut reflected = ray.spawn_child(hit.point_world, reflected_dir);
        reflected.opl_mm += hit.t;
        reflected.intensity = ray.intensity * (1.0 - self.transmission);
        reflected.jones = ray.jones.flip();

        InteractionResult::split(transmitted, reflected)
    }

    fn abcd(&self) -> AbcdPair {
        AbcdPair::identity()
    }

    fn aperture_radius(&self) -> Option<Float> {
        Some(self.aperture_radius_mm)
    }

    fn type_name(&self) -> &'static str {
        "BeamSplitter"
    }
}
