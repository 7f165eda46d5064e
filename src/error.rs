use thiserror::Error;

use crate::{
    geometry::{Contour, GeometryError},
    influence::Family,
    system::SolveError,
};

/// Invalid solver settings, detected before anything is solved
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("panel count must be at least {min}, got {n}")]
    PanelCount { n: usize, min: usize },
    #[error("the NACA contour needs an even panel count, got {0}")]
    OddPanelCount(usize),
    #[error("freestream speed must be finite and positive, got {0}")]
    Speed(f64),
    #[error("angle of attack must be finite, got {0}")]
    Alpha(f64),
    #[error("method needs a {expected:?} contour, got {found:?}")]
    Contour { expected: Contour, found: Contour },
    #[error("influence set has no {0:?} matrix")]
    MissingFamily(Family),
    #[error("{what}: expected {expected}, got {found}")]
    Dimension {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Solve(#[from] SolveError),
}

impl PanelError {
    /// `true` when the caller supplied bad geometry or settings,
    /// `false` when the system itself could not be solved
    pub fn is_input_error(&self) -> bool {
        !matches!(self, PanelError::Solve(_))
    }
}
