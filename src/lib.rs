#![deny(
    rust_2018_compatibility,
    rust_2018_idioms,
    nonstandard_style,
    future_incompatible,
    non_camel_case_types,
    unused_parens,
    non_upper_case_globals,
    bare_trait_objects,
    ellipsis_inclusive_range_patterns,
    elided_lifetimes_in_paths
)]
#![warn(clippy::explicit_into_iter_loop)]

//! Perforates a closed triangle mesh with a lattice of cylindrical holes.
//!
//! The crate's single entry point is [`driver::perforate`]; everything else
//! is the machinery it is built from (settings coercion, lattice generation,
//! the analytic hole SDF, the mesh SDF sampler, slab composition and
//! isosurface extraction). The surrounding HTTP API, job store, queue and
//! snapshot renderer are out of scope: this crate only models their
//! boundary, as the [`progress::ProgressSink`] and [`collaborators`] traits.

pub mod collaborators;
pub mod compose;
pub mod driver;
pub mod hole_sdf;
pub mod isosurface;
pub mod lattice;
pub mod mesh;
pub mod mesh_sdf;
pub mod presets;
pub mod progress;
pub mod settings;
pub mod volume;

pub mod prelude {
    pub use crate::DesolidifyError;
    pub use crate::driver::perforate;
    pub use crate::mesh::Mesh;
    pub use crate::progress::{ControlFlow, ProgressSink};
    pub use crate::settings::Settings;
}

/// The crate-wide error taxonomy. Every fallible operation in this crate
/// returns one of these variants; see `SPEC_FULL.md` §7 for the propagation
/// policy (only `OutOfMemory` is ever retried, and only by the driver).
#[derive(thiserror::Error, Debug)]
pub enum DesolidifyError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Empty geometry: {0}")]
    EmptyGeometry(String),

    #[error("Sampling grid too small: {0}")]
    GridTooSmall(String),

    #[error("Out of memory: {0}")]
    OutOfMemory(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::collections::TryReserveError> for DesolidifyError {
    fn from(e: std::collections::TryReserveError) -> Self {
        DesolidifyError::OutOfMemory(format!("allocation failed: {e}"))
    }
}
