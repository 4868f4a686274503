use thiserror::Error;

use crate::core::types::YAxis;

pub type GraphResult<T> = Result<T, GraphError>;

/// Error taxonomy for the plotting engine.
///
/// Only `InvalidViewport`, `InvalidData`, and `Backend` are structural and
/// abort a render cycle. The remaining variants describe conditions the
/// engine recovers from locally; they exist so recovery can be reported to
/// the caller instead of happening silently.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("incompatible units on {axis:?} axis: `{first}` vs `{second}`")]
    UnitsIncompatible {
        axis: YAxis,
        first: String,
        second: String,
    },

    #[error("no label set satisfies the requested count for range [{min}, {max}]")]
    NoLabelsFound { min: f64, max: f64 },

    #[error("series `{0}` has no visible data")]
    EmptyOrMissingData(String),

    #[error("analysis provider failed: {0}")]
    AnalysisFailure(String),

    #[error("render backend error: {0}")]
    Backend(String),
}

impl GraphError {
    /// True for errors a render cycle must abort on.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::InvalidViewport { .. } | Self::InvalidData(_) | Self::Backend(_)
        )
    }
}
