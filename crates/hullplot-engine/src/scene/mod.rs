//! Scene: ordered primitive batches + camera + projection.
//!
//! Responsibilities:
//! - turn add-calls into GPU-resident batches (one batch per call)
//! - keep batches in insertion order; they are never removed or mutated
//! - run the per-frame draw protocol against a `RenderBackend`

mod batch;
mod plot;

pub use batch::PrimitiveBatch;
pub use plot::{Plot, PlotConfig};

pub use crate::render::DrawMode;
