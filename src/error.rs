use std::io;

use thiserror::Error;

/// Errors from the layers around the control loop (scenario loading, hull geometry).
///
/// The guidance tick itself has no failure path.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read scenario: {0}")]
    Io(#[from] io::Error),

    #[error("invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("degenerate polygon: {vertices} vertices, area {area:.3e}")]
    DegeneratePolygon { vertices: usize, area: f64 },

    #[error("hull has no parts")]
    EmptyHull,
}

pub type Result<T> = std::result::Result<T, Error>;
