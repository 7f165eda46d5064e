use std::f64::consts::PI;

use log::{debug, info};
use ndarray::{s, Array1, Array2, ArrayView2, Zip};

use crate::{
    error::ConfigError,
    geometry::{Contour, PanelGeometry},
    influence::InfluenceSet,
    solution::{ThickSolution, ThinSolution},
    system::{
        linear_vortex_matrix, linear_vortex_tangential, lumped_vortex_matrix, normal_freestream,
        source_vortex_matrix, source_vortex_tangential, tangential_freestream, LinearSystem,
        SINGULAR_TOLERANCE,
    },
    FreeStream, PanelError,
};

/// Singularity distribution of the thick (closed-body) methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThickMethod {
    /// Linearly varying vortex sheet, one vorticity per node, Kutta on the two
    /// trailing-edge node vorticities
    LinearVortex,
    /// Constant source per panel plus one constant vortex shared by all panels, Kutta on the
    /// tangential velocity of the two trailing-edge panels
    SourceVortex,
}

fn check_contour(geometry: &PanelGeometry, expected: Contour) -> Result<(), ConfigError> {
    if geometry.contour() != expected {
        return Err(ConfigError::Contour {
            expected,
            found: geometry.contour(),
        });
    }
    Ok(())
}

/// Lumped-vortex solver for camber lines and single surfaces
#[derive(Debug, Clone)]
pub struct ThinSolver<'a> {
    geometry: &'a PanelGeometry,
    influence: InfluenceSet,
    system: LinearSystem,
}

impl<'a> ThinSolver<'a> {
    /// compile the geometry with the default singular tolerance
    pub fn new(geometry: &'a PanelGeometry) -> Result<Self, PanelError> {
        Self::with_tolerance(geometry, SINGULAR_TOLERANCE)
    }

    pub fn with_tolerance(geometry: &'a PanelGeometry, tolerance: f64) -> Result<Self, PanelError> {
        check_contour(geometry, Contour::Open)?;
        let influence = InfluenceSet::lumped_vortex(geometry)?;
        let system = LinearSystem::factor(lumped_vortex_matrix(geometry, &influence)?, tolerance)?;
        Ok(ThinSolver {
            geometry,
            influence,
            system,
        })
    }

    pub fn influence(&self) -> &InfluenceSet {
        &self.influence
    }

    /// the `n × n` system matrix
    pub fn matrix(&self) -> ArrayView2<'_, f64> {
        self.system.matrix()
    }

    pub fn rhs(&self, freestream: &FreeStream) -> Result<Array1<f64>, PanelError> {
        freestream.validate()?;
        Ok(normal_freestream(self.geometry, freestream))
    }

    pub fn solve(&self, freestream: &FreeStream) -> Result<ThinSolution<'a>, PanelError> {
        let rhs = self.rhs(freestream)?;
        let gamma = self.system.solve(rhs.view())?;
        info!(
            "thin solve at alpha = {}° with {} panels",
            freestream.alpha().to_degrees(),
            self.geometry.len()
        );
        Ok(ThinSolution::new(self.geometry, *freestream, gamma))
    }
}

/// Settings for a [`ThickSolver`], with the following defaults:
///
/// - `method = ThickMethod::LinearVortex`
/// - `singular_tolerance = 1e-12` smallest accepted ratio of LU pivots
/// - `influence = None` influence matrices are computed from the geometry
#[derive(Debug)]
pub struct ThickSolverBuilder<'a> {
    geometry: &'a PanelGeometry,
    method: ThickMethod,
    singular_tolerance: f64,
    influence: Option<InfluenceSet>,
}

impl<'a> ThickSolverBuilder<'a> {
    pub fn method(mut self, method: ThickMethod) -> Self {
        self.method = method;
        self
    }

    pub fn singular_tolerance(mut self, tolerance: f64) -> Self {
        self.singular_tolerance = tolerance;
        self
    }

    /// Use precomputed influence matrices instead of building them.
    ///
    /// The set must hold the families of the chosen method, sized for this geometry.
    pub fn influence(mut self, influence: InfluenceSet) -> Self {
        self.influence = Some(influence);
        self
    }

    pub fn build(self) -> Result<ThickSolver<'a>, PanelError> {
        let ThickSolverBuilder {
            geometry,
            method,
            singular_tolerance,
            influence,
        } = self;
        check_contour(geometry, Contour::Closed)?;

        let influence = match influence {
            Some(set) => set,
            None => match method {
                ThickMethod::LinearVortex => InfluenceSet::linear_vortex(geometry)?,
                ThickMethod::SourceVortex => InfluenceSet::constant_source_vortex(geometry)?,
            },
        };
        let (matrix, tangential) = match method {
            ThickMethod::LinearVortex => (
                linear_vortex_matrix(geometry, &influence)?,
                linear_vortex_tangential(geometry, &influence)?,
            ),
            ThickMethod::SourceVortex => (
                source_vortex_matrix(geometry, &influence)?,
                source_vortex_tangential(geometry, &influence)?,
            ),
        };
        let system = LinearSystem::factor(matrix, singular_tolerance)?;
        debug!(
            "compiled {:?} solver with {} unknowns",
            method,
            system.size()
        );
        Ok(ThickSolver {
            geometry,
            method,
            influence,
            system,
            tangential,
        })
    }
}

/// Closed-body solver, compiled once per geometry and reused for every freestream
#[derive(Debug, Clone)]
pub struct ThickSolver<'a> {
    geometry: &'a PanelGeometry,
    method: ThickMethod,
    influence: InfluenceSet,
    system: LinearSystem,
    /// tangential velocity per unit strength, one row per panel (plus an empty Kutta row
    /// for the linear vortex)
    tangential: Array2<f64>,
}

impl<'a> ThickSolver<'a> {
    pub fn builder(geometry: &'a PanelGeometry) -> ThickSolverBuilder<'a> {
        ThickSolverBuilder {
            geometry,
            method: ThickMethod::LinearVortex,
            singular_tolerance: SINGULAR_TOLERANCE,
            influence: None,
        }
    }

    pub fn new(geometry: &'a PanelGeometry, method: ThickMethod) -> Result<Self, PanelError> {
        Self::builder(geometry).method(method).build()
    }

    pub fn method(&self) -> ThickMethod {
        self.method
    }

    pub fn geometry(&self) -> &'a PanelGeometry {
        self.geometry
    }

    pub fn influence(&self) -> &InfluenceSet {
        &self.influence
    }

    /// the `(n + 1)²` system matrix, Kutta condition in the last row
    pub fn matrix(&self) -> ArrayView2<'_, f64> {
        self.system.matrix()
    }

    /// tangential velocity coefficients of the unknowns
    pub fn tangential(&self) -> ArrayView2<'_, f64> {
        self.tangential.view()
    }

    /// Right-hand side: `-V∞ · n_i` per panel followed by the Kutta target.
    pub fn rhs(&self, freestream: &FreeStream) -> Result<Array1<f64>, PanelError> {
        freestream.validate()?;
        let normal = normal_freestream(self.geometry, freestream);
        let kutta = match self.method {
            ThickMethod::LinearVortex => 0.0,
            ThickMethod::SourceVortex => {
                let tangential = tangential_freestream(self.geometry, freestream);
                -(tangential[0] + tangential[tangential.len() - 1])
            }
        };
        let n = self.geometry.len();
        let mut rhs = Array1::zeros(n + 1);
        rhs.slice_mut(s![..n]).assign(&normal);
        rhs[n] = kutta;
        Ok(rhs)
    }

    pub fn solve(&self, freestream: &FreeStream) -> Result<ThickSolution<'a>, PanelError> {
        let rhs = self.rhs(freestream)?;
        let strengths = self.system.solve(rhs.view())?;
        let n = self.geometry.len();

        let tangential_velocity = tangential_freestream(self.geometry, freestream)
            + self.tangential.slice(s![..n, ..]).dot(&strengths);

        let circulation = match self.method {
            ThickMethod::LinearVortex => {
                2.0 * PI
                    * self
                        .geometry
                        .panels()
                        .iter()
                        .enumerate()
                        .map(|(j, panel)| 0.5 * (strengths[j] + strengths[j + 1]) * panel.length())
                        .sum::<f64>()
            }
            ThickMethod::SourceVortex => 2.0 * PI * strengths[n] * self.geometry.perimeter(),
        };
        info!(
            "{:?} solve at alpha = {}° with {} panels, circulation {}",
            self.method,
            freestream.alpha().to_degrees(),
            n,
            circulation
        );

        Ok(ThickSolution::new(
            self.geometry,
            *freestream,
            self.method,
            strengths,
            tangential_velocity,
            circulation,
        ))
    }

    /// Solve every freestream condition in parallel, keeping the input order.
    pub fn sweep(&self, freestreams: &[FreeStream]) -> Result<Vec<ThickSolution<'a>>, PanelError> {
        info!("sweeping {} freestream conditions", freestreams.len());
        let conditions = Array1::from(freestreams.to_vec());
        Zip::from(&conditions)
            .par_map_collect(|freestream| self.solve(freestream))
            .into_raw_vec()
            .into_iter()
            .collect()
    }
}
