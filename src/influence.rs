//! Influence coefficient matrices for a fixed panel geometry.

use std::collections::BTreeMap;

use log::debug;
use ndarray::{Array2, ArrayView2};

use crate::{
    error::ConfigError,
    geometry::{GeometryError, PanelGeometry},
    kernel::{
        constant_panel, lumped_vortex_self, point_vortex, LinearVortexTerms, CONSTANT_PANEL_SELF,
        LINEAR_VORTEX_SELF,
    },
    PanelError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Singularity {
    Source,
    Vortex,
}

/// Direction on the evaluating panel the induced velocity is projected on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Projection {
    Normal,
    Tangential,
}

/// Which part of the strength distribution of the inducing panel the coefficient belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Node {
    /// constant strength, or a point singularity
    Uniform,
    /// the start-node strength of a linear distribution
    Start,
    /// the end-node strength of a linear distribution
    End,
}

/// Key of one coefficient matrix inside an [`InfluenceSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Family {
    pub singularity: Singularity,
    pub projection: Projection,
    pub node: Node,
}

impl Family {
    pub const fn new(singularity: Singularity, projection: Projection, node: Node) -> Self {
        Family {
            singularity,
            projection,
            node,
        }
    }

    /// `CN1`: normal velocity per unit start-node vorticity
    pub const CN1: Family = Family::new(Singularity::Vortex, Projection::Normal, Node::Start);
    /// `CN2`: normal velocity per unit end-node vorticity
    pub const CN2: Family = Family::new(Singularity::Vortex, Projection::Normal, Node::End);
    /// `CT1`: tangential velocity per unit start-node vorticity
    pub const CT1: Family = Family::new(Singularity::Vortex, Projection::Tangential, Node::Start);
    /// `CT2`: tangential velocity per unit end-node vorticity
    pub const CT2: Family = Family::new(Singularity::Vortex, Projection::Tangential, Node::End);
}

/// The coefficient matrices of one geometry, keyed by [`Family`].
///
/// Every matrix is `n_panels × n_panels`, entry `(i, j)` is the velocity a unit strength on
/// panel `j` induces at the control point of panel `i`.
#[derive(Debug, Clone)]
pub struct InfluenceSet {
    n_panels: usize,
    families: BTreeMap<Family, Array2<f64>>,
}

impl InfluenceSet {
    pub fn new(n_panels: usize) -> Self {
        InfluenceSet {
            n_panels,
            families: BTreeMap::new(),
        }
    }

    pub fn n_panels(&self) -> usize {
        self.n_panels
    }

    /// Add a coefficient matrix, replacing any earlier one of the same family.
    pub fn insert(&mut self, family: Family, matrix: Array2<f64>) -> Result<&mut Self, ConfigError> {
        for (axis, found) in matrix.shape().iter().enumerate() {
            if *found != self.n_panels {
                return Err(ConfigError::Dimension {
                    what: if axis == 0 {
                        "influence matrix rows"
                    } else {
                        "influence matrix columns"
                    },
                    expected: self.n_panels,
                    found: *found,
                });
            }
        }
        self.families.insert(family, matrix);
        Ok(self)
    }

    pub fn get(&self, family: Family) -> Option<ArrayView2<'_, f64>> {
        self.families.get(&family).map(|m| m.view())
    }

    pub fn families(&self) -> impl Iterator<Item = &Family> {
        self.families.keys()
    }

    /// Point-vortex influence for the thin method: one `Vortex/Normal/Uniform` family.
    ///
    /// The diagonal is the analytic lumped-vortex self term, the kernel is never evaluated
    /// on its own panel.
    pub fn lumped_vortex(geometry: &PanelGeometry) -> Result<Self, PanelError> {
        let panels = geometry.panels();
        let n = panels.len();
        let mut matrix = Array2::zeros((n, n));
        for (i, target) in panels.iter().enumerate() {
            let normal = target.normal();
            for (j, source) in panels.iter().enumerate() {
                matrix[[i, j]] = if i == j {
                    lumped_vortex_self(target)
                } else {
                    point_vortex(target.control_point(), source.singularity_point())
                        .ok_or(GeometryError::CoincidentPoints { target: i, panel: j })?
                        .dot(&normal)
                };
            }
        }
        debug!("lumped vortex influence for {n} panels");

        let mut set = InfluenceSet::new(n);
        set.insert(
            Family::new(Singularity::Vortex, Projection::Normal, Node::Uniform),
            matrix,
        )?;
        Ok(set)
    }

    /// Linear-vortex influence: the four families [`Family::CN1`], [`Family::CN2`],
    /// [`Family::CT1`] and [`Family::CT2`].
    pub fn linear_vortex(geometry: &PanelGeometry) -> Result<Self, PanelError> {
        let panels = geometry.panels();
        let n = panels.len();
        let pairs = Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j {
                LINEAR_VORTEX_SELF
            } else {
                LinearVortexTerms::new(&panels[i], &panels[j]).coefficients()
            }
        });
        debug!("linear vortex influence for {n} panels");

        let mut set = InfluenceSet::new(n);
        for (k, family) in [Family::CN1, Family::CN2, Family::CT1, Family::CT2]
            .into_iter()
            .enumerate()
        {
            set.insert(family, pairs.map(|c| c[k]))?;
        }
        Ok(set)
    }

    /// Constant source and constant vortex influence: source and vortex, each projected on
    /// the normal and the tangent, all with [`Node::Uniform`].
    pub fn constant_source_vortex(geometry: &PanelGeometry) -> Result<Self, PanelError> {
        let panels = geometry.panels();
        let n = panels.len();
        let pairs = Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j {
                CONSTANT_PANEL_SELF
            } else {
                constant_panel(&panels[i], &panels[j])
            }
        });
        debug!("constant source/vortex influence for {n} panels");

        let family = |s, p| Family::new(s, p, Node::Uniform);
        let mut set = InfluenceSet::new(n);
        set.insert(
            family(Singularity::Source, Projection::Normal),
            pairs.map(|c| c.source_normal),
        )?
        .insert(
            family(Singularity::Source, Projection::Tangential),
            pairs.map(|c| c.source_tangential),
        )?
        .insert(
            family(Singularity::Vortex, Projection::Normal),
            pairs.map(|c| c.vortex_normal),
        )?
        .insert(
            family(Singularity::Vortex, Projection::Tangential),
            pairs.map(|c| c.vortex_tangential),
        )?;
        Ok(set)
    }
}
