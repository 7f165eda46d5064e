//! Discretization of airfoil outlines into straight panels.
//!
//! Closed contours run clockwise, trailing edge → lower surface → leading edge → upper
//! surface → trailing edge, which puts every panel normal on the flow side of the body.
//! Open contours (camber lines, single surfaces) run from the leading to the trailing edge.

use itertools::Itertools;
use log::debug;
use ndarray::{concatenate, s, Array2, ArrayView2, Axis};
use thiserror::Error;

use crate::{error::ConfigError, vector::Vector, PanelError};

/// Panels shorter than this are rejected as degenerate
pub const MIN_PANEL_LENGTH: f64 = 1e-12;

/// Largest gap between the first and last point of a closed contour
pub const CLOSURE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("{0}")]
    Shape(String),
    #[error("coordinate row {0} is not finite")]
    NonFinite(usize),
    #[error("panel {index} is degenerate (length {length:e})")]
    DegeneratePanel { index: usize, length: f64 },
    #[error("contour is not closed, first and last points are {gap:e} apart")]
    OpenContour { gap: f64 },
    #[error("{0}")]
    Orientation(String),
    #[error("control point of panel {target} coincides with the singularity of panel {panel}")]
    CoincidentPoints { target: usize, panel: usize },
    #[error("invalid NACA 4-digit designation {0:?}")]
    Designation(String),
    #[error("surface cannot be interpolated along x: {0}")]
    Surface(String),
}

/// Where the boundary condition is enforced and where the singularity sits on a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// control point and singularity point at mid-length
    Midpoint,
    /// point vortex at a quarter of the panel, control point at three quarters
    LumpedVortex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contour {
    Closed,
    Open,
}

/// A straight segment of the airfoil surface
#[derive(Debug, Clone)]
pub struct Panel {
    start: Vector,
    end: Vector,
    length: f64,
    theta: f64,
    control_point: Vector,
    singularity_point: Vector,
}

impl Panel {
    /// Build the panel from `start` to `end`.
    ///
    /// The length is not checked here, [`PanelGeometry`] rejects degenerate panels
    /// before any are built.
    pub fn new(start: Vector, end: Vector, placement: Placement) -> Self {
        let delta = &end - &start;
        let length = delta.magnitude();
        let theta = delta.y().atan2(delta.x());
        let (control_point, singularity_point) = match placement {
            Placement::Midpoint => {
                let mid = start.lerp(&end, 0.5);
                (mid.clone(), mid)
            }
            Placement::LumpedVortex => (start.lerp(&end, 0.75), start.lerp(&end, 0.25)),
        };
        Panel {
            start,
            end,
            length,
            theta,
            control_point,
            singularity_point,
        }
    }

    pub fn start(&self) -> &Vector {
        &self.start
    }

    pub fn end(&self) -> &Vector {
        &self.end
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// inclination of the panel against the chord line in radians, in [-π, π]
    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn control_point(&self) -> &Vector {
        &self.control_point
    }

    pub fn singularity_point(&self) -> &Vector {
        &self.singularity_point
    }

    /// unit normal, left of the traversal direction
    pub fn normal(&self) -> Vector {
        Vector::from_local(0.0, 1.0, self.theta)
    }

    /// unit tangent along the traversal direction
    pub fn tangent(&self) -> Vector {
        Vector::from_local(1.0, 0.0, self.theta)
    }
}

/// An ordered sequence of panels built from one surface-coordinate sequence
#[derive(Debug, Clone)]
pub struct PanelGeometry {
    nodes: Array2<f64>,
    panels: Vec<Panel>,
    contour: Contour,
}

impl PanelGeometry {
    /// Panel a closed clockwise contour of `n_panels + 1` points (first == last).
    ///
    /// Panels use [`Placement::Midpoint`].
    pub fn closed(coordinates: ArrayView2<f64>, n_panels: usize) -> Result<Self, PanelError> {
        Self::build(coordinates, n_panels, Contour::Closed)
    }

    /// Panel an open polyline of `n_panels + 1` points running from leading to trailing edge.
    ///
    /// Panels use [`Placement::LumpedVortex`].
    pub fn open(coordinates: ArrayView2<f64>, n_panels: usize) -> Result<Self, PanelError> {
        Self::build(coordinates, n_panels, Contour::Open)
    }

    fn build(
        coordinates: ArrayView2<f64>,
        n_panels: usize,
        contour: Contour,
    ) -> Result<Self, PanelError> {
        let min = match contour {
            Contour::Closed => 3,
            Contour::Open => 1,
        };
        if n_panels < min {
            return Err(ConfigError::PanelCount { n: n_panels, min }.into());
        }
        if coordinates.ncols() != 2 {
            return Err(GeometryError::Shape(format!(
                "coordinates must have 2 columns, got {}",
                coordinates.ncols()
            ))
            .into());
        }
        if coordinates.nrows() != n_panels + 1 {
            return Err(GeometryError::Shape(format!(
                "{} panels need {} coordinates, got {}",
                n_panels,
                n_panels + 1,
                coordinates.nrows()
            ))
            .into());
        }
        if let Some(row) = coordinates
            .outer_iter()
            .position(|p| !p.iter().all(|v| v.is_finite()))
        {
            return Err(GeometryError::NonFinite(row).into());
        }

        let placement = match contour {
            Contour::Closed => {
                check_closed(coordinates)?;
                Placement::Midpoint
            }
            Contour::Open => {
                check_open(coordinates)?;
                Placement::LumpedVortex
            }
        };

        let panels = coordinates
            .outer_iter()
            .map(|p| Vector::new(p[0], p[1]))
            .tuple_windows()
            .enumerate()
            .map(|(index, (start, end))| {
                let length = (&end - &start).magnitude();
                if length > MIN_PANEL_LENGTH {
                    Ok(Panel::new(start, end, placement))
                } else {
                    Err(GeometryError::DegeneratePanel { index, length })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("built {} panels for a {:?} contour", panels.len(), contour);
        Ok(PanelGeometry {
            nodes: coordinates.to_owned(),
            panels,
            contour,
        })
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn contour(&self) -> Contour {
        self.contour
    }

    /// the `n_panels + 1` panel end points as rows `[x, y]`
    pub fn nodes(&self) -> ArrayView2<'_, f64> {
        self.nodes.view()
    }

    /// control points as rows `[x, y]`, in panel order
    pub fn control_points(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.len(), 2), |(i, k)| {
            let p = self.panels[i].control_point();
            if k == 0 {
                p.x()
            } else {
                p.y()
            }
        })
    }

    /// extent of the nodes along x
    pub fn chord(&self) -> f64 {
        let x = self.nodes.column(0);
        let (min, max) = x
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &x| {
                (min.min(x), max.max(x))
            });
        max - min
    }

    /// index of the node with the smallest x, the first one on ties
    pub fn leading_edge(&self) -> usize {
        self.nodes
            .column(0)
            .iter()
            .enumerate()
            .fold((0, f64::INFINITY), |(idx, min), (i, &x)| {
                if x < min {
                    (i, x)
                } else {
                    (idx, min)
                }
            })
            .0
    }

    /// sum of all panel lengths
    pub fn perimeter(&self) -> f64 {
        self.panels.iter().map(Panel::length).sum()
    }
}

/// Join two surfaces into one closed clockwise contour.
///
/// Both `upper` and `lower` run from the leading edge to the trailing edge and start at
/// the same leading-edge point. The result starts at the lower trailing edge, runs forward
/// along the lower surface and back along the upper one.
pub fn join_surfaces(
    upper: ArrayView2<f64>,
    lower: ArrayView2<f64>,
) -> Result<Array2<f64>, GeometryError> {
    if upper.ncols() != 2 || lower.ncols() != 2 {
        return Err(GeometryError::Shape(
            "surface coordinates must have 2 columns".into(),
        ));
    }
    if upper.nrows() < 2 || lower.nrows() < 2 {
        return Err(GeometryError::Shape(
            "each surface needs at least 2 points".into(),
        ));
    }
    let gap = ((upper[[0, 0]] - lower[[0, 0]]).powi(2) + (upper[[0, 1]] - lower[[0, 1]]).powi(2))
        .sqrt();
    if gap > CLOSURE_TOLERANCE {
        return Err(GeometryError::Shape(format!(
            "upper and lower surface must share the leading edge, gap is {gap:e}"
        )));
    }
    let joined = concatenate(
        Axis(0),
        &[lower.slice(s![..;-1, ..]), upper.slice(s![1.., ..])],
    )
    .map_err(|e| GeometryError::Shape(e.to_string()))?;
    Ok(joined)
}

/// shoelace area, negative for clockwise traversal
fn signed_area(nodes: ArrayView2<f64>) -> f64 {
    nodes
        .outer_iter()
        .tuple_windows()
        .map(|(a, b)| a[0] * b[1] - b[0] * a[1])
        .sum::<f64>()
        / 2.0
}

fn check_closed(coordinates: ArrayView2<f64>) -> Result<(), GeometryError> {
    let last = coordinates.nrows() - 1;
    let gap = ((coordinates[[0, 0]] - coordinates[[last, 0]]).powi(2)
        + (coordinates[[0, 1]] - coordinates[[last, 1]]).powi(2))
    .sqrt();
    if gap > CLOSURE_TOLERANCE {
        return Err(GeometryError::OpenContour { gap });
    }
    let area = signed_area(coordinates);
    if area >= 0.0 {
        return Err(GeometryError::Orientation(format!(
            "closed contour must run clockwise, signed area is {area:e}"
        )));
    }
    // the Kutta condition sits on the first and last panel
    let x_start = coordinates[[0, 0]];
    if let Some(row) = coordinates
        .column(0)
        .iter()
        .position(|&x| x > x_start + CLOSURE_TOLERANCE)
    {
        return Err(GeometryError::Orientation(format!(
            "closed contour must start at the trailing edge, node {row} lies further aft than the first node"
        )));
    }
    Ok(())
}

fn check_open(coordinates: ArrayView2<f64>) -> Result<(), GeometryError> {
    let last = coordinates.nrows() - 1;
    if coordinates[[last, 0]] <= coordinates[[0, 0]] {
        return Err(GeometryError::Orientation(
            "open contour must run from the leading edge to the trailing edge".into(),
        ));
    }
    Ok(())
}
