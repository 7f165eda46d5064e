//! Post-processed results of a single solve.

use ndarray::{s, Array1, Array2, ArrayView1};
use ndarray_interp::interp1d::{Interp1D, Linear};

use crate::{
    geometry::{GeometryError, PanelGeometry},
    solver::ThickMethod,
    FreeStream, PanelError,
};

/// Result of a [`ThinSolver`](crate::ThinSolver) solve.
///
/// The thin method reports a discrete-vorticity loading instead of a surface pressure, see
/// [`ThinSolution::loading`].
#[derive(Debug, Clone)]
pub struct ThinSolution<'a> {
    geometry: &'a PanelGeometry,
    freestream: FreeStream,
    gamma: Array1<f64>,
}

impl<'a> ThinSolution<'a> {
    pub(crate) fn new(geometry: &'a PanelGeometry, freestream: FreeStream, gamma: Array1<f64>) -> Self {
        ThinSolution {
            geometry,
            freestream,
            gamma,
        }
    }

    pub fn freestream(&self) -> &FreeStream {
        &self.freestream
    }

    /// lumped circulation of every panel, counter-clockwise positive
    pub fn gamma(&self) -> ArrayView1<'_, f64> {
        self.gamma.view()
    }

    /// Pressure jump across each panel, `ΔCp_i = -2 Γ_i / (V∞ l_i)`, lower minus upper.
    pub fn loading(&self) -> Array1<f64> {
        let speed = self.freestream.speed();
        self.geometry
            .panels()
            .iter()
            .zip(self.gamma.iter())
            .map(|(panel, gamma)| -2.0 * gamma / (speed * panel.length()))
            .collect()
    }

    /// total circulation, counter-clockwise positive
    pub fn circulation(&self) -> f64 {
        self.gamma.sum()
    }

    /// lift coefficient from the Kutta–Joukowski theorem
    pub fn cl(&self) -> f64 {
        -2.0 * self.circulation() / (self.freestream.speed() * self.geometry.chord())
    }

    pub fn control_points(&self) -> Array2<f64> {
        self.geometry.control_points()
    }
}

/// Side of a closed contour, split at the leading-edge node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Upper,
    Lower,
}

/// Control-point x and pressure coefficient of one surface, sorted by x
#[derive(Debug, Clone)]
pub struct SurfaceDistribution {
    pub x: Array1<f64>,
    pub cp: Array1<f64>,
}

/// Pressure-integrated force and moment coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub cl: f64,
    /// pressure drag, zero in the limit of fine panelling
    pub cd: f64,
    /// pitching moment about the quarter chord, nose up positive
    pub cm: f64,
}

/// Result of a [`ThickSolver`](crate::ThickSolver) solve
#[derive(Debug, Clone)]
pub struct ThickSolution<'a> {
    geometry: &'a PanelGeometry,
    freestream: FreeStream,
    method: ThickMethod,
    strengths: Array1<f64>,
    tangential_velocity: Array1<f64>,
    cp: Array1<f64>,
    circulation: f64,
}

impl<'a> ThickSolution<'a> {
    pub(crate) fn new(
        geometry: &'a PanelGeometry,
        freestream: FreeStream,
        method: ThickMethod,
        strengths: Array1<f64>,
        tangential_velocity: Array1<f64>,
        circulation: f64,
    ) -> Self {
        let speed = freestream.speed();
        let cp = tangential_velocity.mapv(|v| 1.0 - (v / speed).powi(2));
        ThickSolution {
            geometry,
            freestream,
            method,
            strengths,
            tangential_velocity,
            cp,
            circulation,
        }
    }

    pub fn freestream(&self) -> &FreeStream {
        &self.freestream
    }

    pub fn method(&self) -> ThickMethod {
        self.method
    }

    /// Solved strengths divided by 2π.
    ///
    /// For [`ThickMethod::LinearVortex`] the `n + 1` node vorticities, for
    /// [`ThickMethod::SourceVortex`] the `n` panel source strengths followed by the shared
    /// vorticity.
    pub fn strengths(&self) -> ArrayView1<'_, f64> {
        self.strengths.view()
    }

    /// surface velocity at every control point, positive along the panel direction
    pub fn tangential_velocity(&self) -> ArrayView1<'_, f64> {
        self.tangential_velocity.view()
    }

    /// pressure coefficient at every control point, in panel order
    pub fn cp(&self) -> ArrayView1<'_, f64> {
        self.cp.view()
    }

    /// total circulation, clockwise positive
    pub fn circulation(&self) -> f64 {
        self.circulation
    }

    /// lift coefficient from the Kutta–Joukowski theorem
    pub fn cl(&self) -> f64 {
        2.0 * self.circulation / (self.freestream.speed() * self.geometry.chord())
    }

    pub fn control_points(&self) -> Array2<f64> {
        self.geometry.control_points()
    }

    /// How far the solution is from the Kutta condition.
    ///
    /// Sum of the two trailing-edge node vorticities for the linear vortex, of the two
    /// trailing-edge tangential velocities for the source+vortex method.
    pub fn kutta_residual(&self) -> f64 {
        match self.method {
            ThickMethod::LinearVortex => self.strengths[0] + self.strengths[self.strengths.len() - 1],
            ThickMethod::SourceVortex => {
                self.tangential_velocity[0]
                    + self.tangential_velocity[self.tangential_velocity.len() - 1]
            }
        }
    }

    /// Integrate the surface pressure into lift, pressure drag and quarter-chord moment.
    pub fn coefficients(&self) -> Coefficients {
        let chord = self.geometry.chord();
        let le = self.geometry.nodes().row(self.geometry.leading_edge()).to_owned();
        let (x_ref, y_ref) = (le[0] + 0.25 * chord, le[1]);

        let (fx, fy, moment) = self
            .geometry
            .panels()
            .iter()
            .zip(self.cp.iter())
            .fold((0.0, 0.0, 0.0), |(fx, fy, m), (panel, cp)| {
                let force = panel.normal().scale(-cp * panel.length());
                let at = panel.control_point();
                let arm = (at.x() - x_ref) * force.y() - (at.y() - y_ref) * force.x();
                (fx + force.x(), fy + force.y(), m - arm)
            });
        let (sin, cos) = self.freestream.alpha().sin_cos();
        Coefficients {
            cl: (fy * cos - fx * sin) / chord,
            cd: (fx * cos + fy * sin) / chord,
            cm: moment / chord.powi(2),
        }
    }

    /// Pressure distribution of one surface, sorted by x.
    pub fn surface(&self, surface: Surface) -> SurfaceDistribution {
        let le = self.geometry.leading_edge();
        let x = self.geometry.control_points().column(0).to_owned();
        match surface {
            Surface::Lower => SurfaceDistribution {
                x: x.slice(s![..le;-1]).to_owned(),
                cp: self.cp.slice(s![..le;-1]).to_owned(),
            },
            Surface::Upper => SurfaceDistribution {
                x: x.slice(s![le..]).to_owned(),
                cp: self.cp.slice(s![le..]).to_owned(),
            },
        }
    }

    /// Linearly interpolated pressure coefficient on `surface` at chord station `x`.
    ///
    /// Stations outside the control points are extrapolated. A surface with fewer than two
    /// control points, or whose control points do not advance in x, is a
    /// [`GeometryError::Surface`].
    pub fn cp_at(&self, surface: Surface, x: f64) -> Result<f64, PanelError> {
        let SurfaceDistribution { x: xs, cp } = self.surface(surface);
        let interp = Interp1D::builder(cp)
            .x(xs)
            .strategy(Linear::new().extrapolate(true))
            .build()
            .map_err(|e| GeometryError::Surface(format!("{e:?}")))?;
        Ok(interp
            .interp_scalar(x)
            .map_err(|e| GeometryError::Surface(format!("{e:?}")))?)
    }
}
