//! The scene: an ordered sequence of components. Ordering doesn't
//! matter to the physics (nearest hit wins) but must be stable for
//! deterministic tie-breaks (spec.md §3, §4.5).

use crate::components::Component;
use crate::core::geometry::{HitRecord, Ray};
use crate::core::pbrt::EPSILON;
use crate::core::scene_graph::OpticalElement;
use std::sync::Arc;

pub struct Scene {
    pub components: Vec<Arc<Component>>,
}

impl Scene {
    pub fn new(components: Vec<Arc<Component>>) -> Self {
        Scene { components }
    }

    /// Finds the nearest hit with `t > EPSILON` across every component,
    /// breaking ties by stable scene order (spec.md §4.5 step 2).
    /// Returns the winning component's index alongside its hit.
    pub fn nearest_hit(&self, ray: &Ray, skip_index: Option<usize>) -> Option<(usize, HitRecord)> {
        let mut best: Option<(usize, HitRecord)> = None;
        for (index, component) in self.components.iter().enumerate() {
            if Some(index) == skip_index {
                continue;
            }
            if let Some(hit) = component.chk_intersection(ray) {
                if hit.t <= EPSILON {
                    continue;
                }
                let better = match &best {
                    None => true,
                    Some((_, best_hit)) => hit.t < best_hit.t,
                };
                if better {
                    best = Some((index, hit));
                }
            }
        }
        best
    }
}
