//! Two-dimensional potential-flow panel methods for airfoils.
//!
//! A [`PanelGeometry`] is compiled once into a [`ThinSolver`] or [`ThickSolver`], which
//! keeps the geometry-only influence matrices and their factorization, and is then solved
//! for any number of [`FreeStream`] conditions.
//!
//! ```no_run
//! use panelfoil::{naca::Naca4, FreeStream, PanelGeometry, ThickMethod, ThickSolver};
//!
//! # fn main() -> Result<(), panelfoil::PanelError> {
//! let contour = Naca4::parse("2412")?.closed_contour(100)?;
//! let geometry = PanelGeometry::closed(contour.view(), 100)?;
//! let solver = ThickSolver::new(&geometry, ThickMethod::LinearVortex)?;
//! let solution = solver.solve(&FreeStream::from_degrees(8.0))?;
//! println!("cl = {}", solution.cl());
//! # Ok(())
//! # }
//! ```

use ndarray::{array, Array2};

pub mod error;
pub mod geometry;
pub mod influence;
pub mod kernel;
pub mod naca;
pub mod solution;
pub mod solver;
pub mod system;
pub mod vector;

pub use error::{ConfigError, PanelError};
pub use geometry::{GeometryError, PanelGeometry};
pub use solution::{ThickSolution, ThinSolution};
pub use solver::{ThickMethod, ThickSolver, ThinSolver};
pub use vector::Vector;

/// 2d rotation matrix for angle phi (in radians)
fn rot_mat(phi: f64) -> Array2<f64> {
    array![[phi.cos(), (-phi).sin()], [phi.sin(), phi.cos()],]
}

/// Uniform onset flow: speed and angle of attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeStream {
    speed: f64,
    alpha: f64,
}

impl FreeStream {
    /// unit-speed freestream at an angle of attack given in degrees
    pub fn from_degrees(alpha: f64) -> Self {
        Self::from_radians(alpha.to_radians())
    }

    /// unit-speed freestream at an angle of attack given in radians
    pub fn from_radians(alpha: f64) -> Self {
        FreeStream { speed: 1.0, alpha }
    }

    /// update the freestream speed
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// angle of attack in radians
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn velocity(&self) -> Vector {
        Vector::from_local(self.speed, 0.0, self.alpha)
    }

    /// reject non-finite angles and non-finite or non-positive speeds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.alpha.is_finite() {
            return Err(ConfigError::Alpha(self.alpha));
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(ConfigError::Speed(self.speed));
        }
        Ok(())
    }
}
