use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core and its collaborators.
///
/// Physics branches that simply find no collision are not errors; they are
/// expressed as `Option::None` by the prediction routines.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// The sampler could not fit the requested particles without overlap.
    #[error(
        "placement infeasible: placed {placed} of {requested} particles before exhausting {attempts} attempts"
    )]
    PlacementInfeasible {
        placed: usize,
        requested: usize,
        attempts: usize,
    },

    /// Numerical or geometric issue (e.g., coincident centers at contact).
    #[error("numerical error: {0}")]
    MathError(String),

    /// Propagated I/O errors from frame recorders.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Propagated JSON errors from summary export.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
