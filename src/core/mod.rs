//! Shared scalar/vector math, units, spectral profiles, and the
//! scene-graph base that every optical component builds on.
//!
//! Mirrors the teacher crate's `core` module: a grab-bag of the small
//! foundational pieces every higher-level module depends on, not a
//! single abstraction.

pub mod pbrt;
pub mod geometry;
pub mod units;
pub mod error;
pub mod spectrum;
pub mod jones;
pub mod scene_graph;
pub mod scene;
