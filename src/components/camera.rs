//! Imaging sensor: absorbs every ray it's handed, accumulating into a
//! rendered image buffer maintained by Solver 3 (this struct just
//! carries the sensor's geometric and sampling parameters it needs
//! back — spec.md §4.4, §7).

use crate::core::geometry::{intersect_z_plane, Bounds3f, HitRecord, InteractionResult, Ray, Vector3f};
use crate::core::pbrt::Float;
use crate::core::scene_graph::{AbcdPair, ComponentBase, LocalRay, OpticalElement};

pub struct Camera {
    pub base: ComponentBase,
    pub sensor_width_mm: Float,
    pub sensor_height_mm: Float,
    pub resolution_x: u32,
    pub resolution_y: u32,
    pub samples_per_pixel: u32,
    pub sensor_na: Float,
}

impl Camera {
    pub fn new(
        name: impl Into<String>,
        sensor_width_mm: Float,
        sensor_height_mm: Float,
        resolution_x: u32,
        resolution_y: u32,
        samples_per_pixel: u32,
        sensor_na: Float,
    ) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-sensor_width_mm / 2.0, -sensor_height_mm / 2.0, -0.5),
            Vector3f::new(sensor_width_mm / 2.0, sensor_height_mm / 2.0, 0.5),
        );
        Camera {
            base: ComponentBase::new(name, housing, 0.0),
            sensor_width_mm,
            sensor_height_mm,
            resolution_x,
            resolution_y,
            samples_per_pixel,
            sensor_na,
        }
    }

    /// Maps a local sensor-plane point to integer pixel coordinates,
    /// or `None` if it falls off the sensor.
    pub fn pixel_of(&self, local_point: Vector3f) -> Option<(u32, u32)> {
        let u = (local_point.x / self.sensor_width_mm) + 0.5;
        let v = (local_point.y / self.sensor_height_mm) + 0.5;
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return None;
        }
        let px = (u * self.resolution_x as Float) as u32;
        let py = (v * self.resolution_y as Float) as u32;
        Some((px.min(self.resolution_x - 1), py.min(self.resolution_y - 1)))
    }

    /// Inverse of [`Camera::pixel_of`]: the sensor-plane local point at
    /// the center of pixel `(px, py)`. World +Y maps to image +V.
    pub fn point_of_pixel(&self, px: u32, py: u32) -> Vector3f {
        let u = (px as Float + 0.5) / self.resolution_x as Float;
        let v = (py as Float + 0.5) / self.resolution_y as Float;
        Vector3f::new(
            (u - 0.5) * self.sensor_width_mm,
            (v - 0.5) * self.sensor_height_mm,
            0.0,
        )
    }
}

impl OpticalElement for Camera {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let (t, p) = intersect_z_plane(local_ray.o, local_ray.d)?;
        if p.x.abs() > self.sensor_width_mm / 2.0 || p.y.abs() > self.sensor_height_mm / 2.0 {
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
        Some((self.sensor_width_mm.max(self.sensor_height_mm)) / 2.0)
    }

    fn type_name(&self) -> &'static str {
        "Camera"
    }
}
