//! Assembly and dense solution of the panel-method linear systems.

use log::{debug, warn};
use nalgebra::{linalg::LU, DMatrix, DVector, Dyn};
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use thiserror::Error;

use crate::{
    error::ConfigError,
    geometry::PanelGeometry,
    influence::{Family, InfluenceSet, Node, Projection, Singularity},
    FreeStream, PanelError,
};

/// Default ratio of the smallest to the largest LU pivot below which a matrix is singular
pub const SINGULAR_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolveError {
    #[error("system matrix is singular (pivot ratio {ratio:e}), check for duplicate or degenerate panels")]
    Singular { ratio: f64 },
    #[error("solution contains non-finite strengths")]
    NonFinite,
}

/// A square system matrix together with its LU factorization
#[derive(Debug, Clone)]
pub struct LinearSystem {
    matrix: Array2<f64>,
    lu: LU<f64, Dyn, Dyn>,
}

impl LinearSystem {
    /// Factorize `matrix`, failing on non-square or (near) singular matrices.
    pub fn factor(matrix: Array2<f64>, tolerance: f64) -> Result<Self, PanelError> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(ConfigError::Dimension {
                what: "system matrix columns",
                expected: rows,
                found: cols,
            }
            .into());
        }
        let lu = DMatrix::from_fn(rows, cols, |i, j| matrix[[i, j]]).lu();

        let (min, max) = lu
            .u()
            .diagonal()
            .iter()
            .fold((f64::INFINITY, 0.0f64), |(min, max), p| {
                (min.min(p.abs()), max.max(p.abs()))
            });
        let ratio = min / max;
        if !(ratio > tolerance) {
            return Err(SolveError::Singular { ratio }.into());
        }
        if ratio < tolerance.sqrt() {
            warn!("system matrix is poorly conditioned, pivot ratio {ratio:e}");
        }
        debug!("factorized {rows}x{cols} system, pivot ratio {ratio:e}");
        Ok(LinearSystem { matrix, lu })
    }

    pub fn size(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn matrix(&self) -> ArrayView2<'_, f64> {
        self.matrix.view()
    }

    pub fn solve(&self, rhs: ArrayView1<f64>) -> Result<Array1<f64>, PanelError> {
        if rhs.len() != self.size() {
            return Err(ConfigError::Dimension {
                what: "right-hand side length",
                expected: self.size(),
                found: rhs.len(),
            }
            .into());
        }
        let b = DVector::from_iterator(rhs.len(), rhs.iter().copied());
        let x = self.lu.solve(&b).ok_or(SolveError::Singular { ratio: 0.0 })?;
        if !x.iter().all(|v| v.is_finite()) {
            return Err(SolveError::NonFinite.into());
        }
        Ok(Array1::from_iter(x.iter().copied()))
    }

    /// `matrix · x - rhs`
    pub fn residual(&self, x: ArrayView1<f64>, rhs: ArrayView1<f64>) -> Array1<f64> {
        self.matrix.dot(&x) - rhs
    }
}

fn family(set: &InfluenceSet, family: Family) -> Result<ArrayView2<'_, f64>, ConfigError> {
    set.get(family).ok_or(ConfigError::MissingFamily(family))
}

fn check_panels(geometry: &PanelGeometry, set: &InfluenceSet) -> Result<(), ConfigError> {
    if set.n_panels() != geometry.len() {
        return Err(ConfigError::Dimension {
            what: "influence matrix size",
            expected: geometry.len(),
            found: set.n_panels(),
        });
    }
    Ok(())
}

/// `-V∞ · n_i` for every panel
pub fn normal_freestream(geometry: &PanelGeometry, freestream: &FreeStream) -> Array1<f64> {
    let velocity = freestream.velocity();
    geometry
        .panels()
        .iter()
        .map(|p| -velocity.dot(&p.normal()))
        .collect()
}

/// `V∞ · t_i` for every panel
pub fn tangential_freestream(geometry: &PanelGeometry, freestream: &FreeStream) -> Array1<f64> {
    let velocity = freestream.velocity();
    geometry
        .panels()
        .iter()
        .map(|p| velocity.dot(&p.tangent()))
        .collect()
}

/// The thin-method matrix, one lumped vortex per panel
pub fn lumped_vortex_matrix(
    geometry: &PanelGeometry,
    set: &InfluenceSet,
) -> Result<Array2<f64>, ConfigError> {
    check_panels(geometry, set)?;
    Ok(family(
        set,
        Family::new(Singularity::Vortex, Projection::Normal, Node::Uniform),
    )?
    .to_owned())
}

/// Combine start- and end-node coefficients into `n × (n + 1)` node coefficients.
///
/// Node `k` is shared by the end of panel `k - 1` and the start of panel `k`.
pub fn nodal(start: ArrayView2<f64>, end: ArrayView2<f64>) -> Array2<f64> {
    let n = start.nrows();
    let mut out = Array2::zeros((n, n + 1));
    out.slice_mut(s![.., ..n]).assign(&start);
    out.slice_mut(s![.., 1..]).zip_mut_with(&end, |o, &e| *o += e);
    out
}

/// The `(n + 1)²` linear-vortex matrix: `AN` with the Kutta row `γ_0 + γ_n = 0` appended.
pub fn linear_vortex_matrix(
    geometry: &PanelGeometry,
    set: &InfluenceSet,
) -> Result<Array2<f64>, ConfigError> {
    check_panels(geometry, set)?;
    let n = geometry.len();
    let mut matrix = Array2::zeros((n + 1, n + 1));
    matrix
        .slice_mut(s![..n, ..])
        .assign(&nodal(family(set, Family::CN1)?, family(set, Family::CN2)?));
    matrix[[n, 0]] = 1.0;
    matrix[[n, n]] = 1.0;
    Ok(matrix)
}

/// `AT`: node coefficients of the tangential velocity, with an empty Kutta row
pub fn linear_vortex_tangential(
    geometry: &PanelGeometry,
    set: &InfluenceSet,
) -> Result<Array2<f64>, ConfigError> {
    check_panels(geometry, set)?;
    let n = geometry.len();
    let mut matrix = Array2::zeros((n + 1, n + 1));
    matrix
        .slice_mut(s![..n, ..])
        .assign(&nodal(family(set, Family::CT1)?, family(set, Family::CT2)?));
    Ok(matrix)
}

/// Tangential coefficients of the source+vortex unknowns, `n × (n + 1)`:
/// the source columns followed by the summed vortex column.
pub fn source_vortex_tangential(
    geometry: &PanelGeometry,
    set: &InfluenceSet,
) -> Result<Array2<f64>, ConfigError> {
    check_panels(geometry, set)?;
    let uniform = |s, p| Family::new(s, p, Node::Uniform);
    Ok(shared_column(
        family(set, uniform(Singularity::Source, Projection::Tangential))?,
        family(set, uniform(Singularity::Vortex, Projection::Tangential))?,
    ))
}

/// `[sources | Σ_j vortex]`, the vortex strength being shared by all panels
fn shared_column(sources: ArrayView2<f64>, vortex: ArrayView2<f64>) -> Array2<f64> {
    let n = sources.nrows();
    let mut out = Array2::zeros((n, n + 1));
    out.slice_mut(s![.., ..n]).assign(&sources);
    out.column_mut(n).assign(&vortex.sum_axis(Axis(1)));
    out
}

/// The `(n + 1)²` source+vortex matrix: flow tangency on every panel and the Kutta row
/// `Vt_0 + Vt_{n-1} = 0` on the two trailing-edge panels.
pub fn source_vortex_matrix(
    geometry: &PanelGeometry,
    set: &InfluenceSet,
) -> Result<Array2<f64>, ConfigError> {
    check_panels(geometry, set)?;
    let n = geometry.len();
    let uniform = |s, p| Family::new(s, p, Node::Uniform);
    let normal = shared_column(
        family(set, uniform(Singularity::Source, Projection::Normal))?,
        family(set, uniform(Singularity::Vortex, Projection::Normal))?,
    );
    let tangential = source_vortex_tangential(geometry, set)?;

    let mut matrix = Array2::zeros((n + 1, n + 1));
    matrix.slice_mut(s![..n, ..]).assign(&normal);
    let kutta = &tangential.row(0) + &tangential.row(n - 1);
    matrix.row_mut(n).assign(&kutta);
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn node_coefficients_share_inner_nodes() {
        let start = array![[1.0, 2.0], [3.0, 4.0]];
        let end = array![[10.0, 20.0], [30.0, 40.0]];
        assert_eq!(
            nodal(start.view(), end.view()),
            array![[1.0, 12.0, 20.0], [3.0, 34.0, 40.0]]
        );
    }

    #[test]
    fn solves_and_rejects_wrong_rhs_length() {
        let system = LinearSystem::factor(array![[2.0, 1.0], [1.0, 3.0]], SINGULAR_TOLERANCE).unwrap();
        let rhs = array![3.0, 5.0];
        let x = system.solve(rhs.view()).unwrap();
        assert!(system.residual(x.view(), rhs.view()).iter().all(|r| r.abs() < 1e-14));
        let err = system.solve(array![1.0, 2.0, 3.0].view()).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn singular_matrix_is_a_solve_error() {
        let err = LinearSystem::factor(array![[1.0, 2.0], [2.0, 4.0]], SINGULAR_TOLERANCE).unwrap_err();
        assert!(matches!(err, PanelError::Solve(SolveError::Singular { .. })));
        assert!(!err.is_input_error());
        let err = LinearSystem::factor(Array2::zeros((2, 3)), SINGULAR_TOLERANCE).unwrap_err();
        assert!(err.is_input_error());
    }
}
