//! The small set of genuine error conditions at the API boundary.
//!
//! Per spec.md §7, the solvers themselves are infallible: invalid rays
//! are logged and skipped, numerical edge cases return sentinels, and
//! depth/throughput exhaustion is just the branch ending. `CoreError`
//! only covers construction- and lookup-time mistakes made by the
//! external collaborator (unknown registry type name, unknown
//! animatable property path) — it is never returned from `trace`,
//! `propagate`, or `render`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no component constructor registered for type name `{0}`")]
    UnknownComponentType(String),

    #[error("component `{0}` has no animatable property `{1}`")]
    UnknownProperty(String, String),

    #[error("animation channel references unknown component id `{0}`")]
    UnknownComponentId(String),

    #[error("invalid spectral profile parameters: {0}")]
    InvalidSpectralProfile(String),
}
