use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by a [`RenderBackend`](crate::render::RenderBackend).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("failed to compile/link shader program: {0}")]
    ProgramLink(String),

    #[error("failed to create buffer")]
    BufferAllocation,
}

/// Errors surfaced by [`Plot`](crate::scene::Plot).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlotError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("expected one color per vertex: {vertices} vertices, {colors} colors")]
    ColorCountMismatch { vertices: usize, colors: usize },
}

/// Errors produced while loading a dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataset contains no points")]
    Empty,

    #[error("facet {facet} references point {index}, but the cloud has {len} points")]
    IndexOutOfRange { facet: usize, index: usize, len: usize },
}
