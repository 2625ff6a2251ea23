//! Compound objective: an ordered stack of internal spherical-lens
//! elements sharing one housing and exposing an aggregate focal length,
//! working distance, numerical aperture, and magnification (spec.md
//! §4.4). A single `interact` call walks the ray through every internal
//! element it still hits, in order, so the rest of the scene only ever
//! sees the ray that has exited the whole compound body — the `abcd()`
//! pair composes the same full stack.

use crate::core::geometry::{Bounds3f, HitRecord, InteractionResult, Ray, Vector3f};
use crate::core::pbrt::Float;
use crate::core::scene_graph::{AbcdPair, ComponentBase, LocalRay, OpticalElement};
use crate::components::spherical_lens::SphericalLens;

pub struct Objective {
    pub base: ComponentBase,
    pub elements: Vec<SphericalLens>,
    pub numerical_aperture: Float,
    pub magnification: Float,
    pub working_distance_mm: Float,
    pub parfocal_distance_mm: Float,
}

impl Objective {
    pub fn new(
        name: impl Into<String>,
        elements: Vec<SphericalLens>,
        aperture_radius_mm: Float,
        numerical_aperture: Float,
        magnification: Float,
        working_distance_mm: Float,
        parfocal_distance_mm: Float,
    ) -> Self {
        let housing = Bounds3f::new(
            Vector3f::new(-aperture_radius_mm, -aperture_radius_mm, -working_distance_mm),
            Vector3f::new(aperture_radius_mm, aperture_radius_mm, parfocal_distance_mm),
        );
        Objective {
            base: ComponentBase::new(name, housing, 0.0),
            elements,
            numerical_aperture,
            magnification,
            working_distance_mm,
            parfocal_distance_mm,
        }
    }

    fn nearest_element(&self, local_ray: &LocalRay, skip: Option<usize>) -> Option<(usize, HitRecord)> {
        let mut best: Option<(usize, HitRecord)> = None;
        for (index, element) in self.elements.iter().enumerate() {
            if Some(index) == skip {
                continue;
            }
            if let Some(hit) = element.intersect(local_ray) {
                let replace = match &best {
                    Some((_, existing)) => hit.t < existing.t,
                    None => true,
                };
                if replace {
                    best = Some((index, hit));
                }
            }
        }
        best
    }
}

impl OpticalElement for Objective {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn intersect(&self, local_ray: &LocalRay) -> Option<HitRecord> {
        let (index, mut hit) = self.nearest_element(local_ray, None)?;
        hit.surface_index = Some(index);
        Some(hit)
    }

    /// Walks every remaining internal element the ray still hits, in
    /// one call, so the scene's self-intersection skip (keyed on this
    /// whole component) never strands the ray on an element behind the
    /// first one. Stops at the first split/absorption, or once the ray
    /// clears the last internal surface.
    fn interact(&self, ray: &Ray, hit: &HitRecord) -> InteractionResult {
        let mut index = hit.surface_index.unwrap_or(0);
        let mut current_hit = hit.clone();
        let mut current_ray = ray.clone();

        loop {
            let element = match self.elements.get(index) {
                Some(element) => element,
                None => return InteractionResult::absorbed(),
            };
            let result = element.interact(&current_ray, &current_hit);
            if !result.passthrough || result.rays.len() != 1 {
                return result;
            }
            let child = &result.rays[0];
            let w2l = self.base.world_to_local();
            let local_ray = LocalRay {
                o: w2l.transform_point(child.o),
                d: w2l.transform_vector(child.d).normalize(),
            };
            match self.nearest_element(&local_ray, Some(index)) {
                Some((next_index, mut next_hit)) => {
                    next_hit.surface_index = Some(next_index);
                    index = next_index;
                    current_ray = child.clone();
                    current_hit = next_hit;
                }
                None => return result,
            }
        }
    }

    fn abcd(&self) -> AbcdPair {
        self.elements.iter().fold(AbcdPair::identity(), |acc, element| {
            let pair = element.abcd();
            AbcdPair {
                tangential: pair.tangential.product(acc.tangential),
                sagittal: pair.sagittal.product(acc.sagittal),
            }
        })
    }

    fn aperture_radius(&self) -> Option<Float> {
        self.elements
            .iter()
            .filter_map(|e| e.aperture_radius())
            .fold(None, |acc, r| Some(acc.map_or(r, |a: Float| a.min(r))))
    }

    fn type_name(&self) -> &'static str {
        "Objective"
    }
}
