//! Induced-velocity kernels for point and distributed singularities.
//!
//! Distributed-panel kernels return velocities multiplied by 2π, so that a unit strength
//! in the normalized frame corresponds to a physical strength of 2π.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::{geometry::Panel, vector::Vector};

/// Squared distance below which two points are treated as coincident
const COINCIDENT: f64 = 1e-24;

/// Velocity induced at `at` by a unit point vortex at `vortex`, counter-clockwise positive.
///
/// Returns `None` when both points coincide, where the kernel is undefined.
pub fn point_vortex(at: &Vector, vortex: &Vector) -> Option<Vector> {
    let r = at - vortex;
    let r_sq = r.x().powi(2) + r.y().powi(2);
    if r_sq < COINCIDENT {
        return None;
    }
    Some(Vector::new(-r.y(), r.x()).scale(1.0 / (2.0 * PI * r_sq)))
}

/// Velocity induced at `at` by a unit point source at `source`.
///
/// Returns `None` when both points coincide.
pub fn point_source(at: &Vector, source: &Vector) -> Option<Vector> {
    let r = at - source;
    let r_sq = r.x().powi(2) + r.y().powi(2);
    if r_sq < COINCIDENT {
        return None;
    }
    Some(r.scale(1.0 / (2.0 * PI * r_sq)))
}

/// Normal velocity a lumped vortex induces at the control point of its own panel.
///
/// The vortex sits half a panel length behind the control point, so this is
/// `1 / (2π · l/2)` along the panel normal.
pub fn lumped_vortex_self(panel: &Panel) -> f64 {
    1.0 / (PI * panel.length())
}

/// Geometric terms of the linear-vortex influence of panel `j` on the control point of
/// panel `i`, named after the classic vortex panel formulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearVortexTerms {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub g: f64,
    pub p: f64,
    pub q: f64,
    /// length of the inducing panel
    pub s: f64,
}

impl LinearVortexTerms {
    pub fn new(target: &Panel, source: &Panel) -> Self {
        let cp = target.control_point();
        let dx = cp.x() - source.start().x();
        let dy = cp.y() - source.start().y();
        let (theta_i, theta_j) = (target.theta(), source.theta());
        let s = source.length();

        // (x, y) of the control point in the local frame of panel j is (-a, e)
        let a = -dx * theta_j.cos() - dy * theta_j.sin();
        let b = dx.powi(2) + dy.powi(2);
        let c = (theta_i - theta_j).sin();
        let d = (theta_i - theta_j).cos();
        let e = dx * theta_j.sin() - dy * theta_j.cos();
        let f = (1.0 + s * (s + 2.0 * a) / b).ln();
        let g = (e * s).atan2(b + a * s);
        let p = dx * (theta_i - 2.0 * theta_j).sin() + dy * (theta_i - 2.0 * theta_j).cos();
        let q = dx * (theta_i - 2.0 * theta_j).cos() - dy * (theta_i - 2.0 * theta_j).sin();
        LinearVortexTerms {
            a,
            b,
            c,
            d,
            e,
            f,
            g,
            p,
            q,
            s,
        }
    }

    /// `[cn1, cn2, ct1, ct2]`: normal and tangential velocity per unit start/end-node vorticity
    pub fn coefficients(&self) -> [f64; 4] {
        let LinearVortexTerms {
            a,
            c,
            d,
            e,
            f,
            g,
            p,
            q,
            s,
            ..
        } = *self;
        let cn2 = d + 0.5 * q * f / s - (a * c + d * e) * g / s;
        let cn1 = 0.5 * d * f + c * g - cn2;
        let ct2 = c + 0.5 * p * f / s + (a * d - c * e) * g / s;
        let ct1 = 0.5 * c * f - d * g - ct2;
        [cn1, cn2, ct1, ct2]
    }
}

/// `[cn1, cn2, ct1, ct2]` of a linearly varying vortex sheet on its own control point
pub const LINEAR_VORTEX_SELF: [f64; 4] = [-1.0, 1.0, FRAC_PI_2, FRAC_PI_2];

/// Influence of constant-strength source and vortex sheets, see [`constant_panel`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantPanelCoefficients {
    pub source_normal: f64,
    pub source_tangential: f64,
    pub vortex_normal: f64,
    pub vortex_tangential: f64,
}

/// closed-form limit of [`constant_panel`] on a panel's own control point (flow side)
pub const CONSTANT_PANEL_SELF: ConstantPanelCoefficients = ConstantPanelCoefficients {
    source_normal: PI,
    source_tangential: 0.0,
    vortex_normal: 0.0,
    vortex_tangential: PI,
};

/// Velocity induced at the control point of `target` by a unit constant source sheet and a
/// unit constant clockwise vortex sheet on `source`, projected on the normal and tangent of
/// `target`.
///
/// The vortex is clockwise positive so a positive strength drives the flow along the
/// traversal direction on the outside of a clockwise contour.
pub fn constant_panel(target: &Panel, source: &Panel) -> ConstantPanelCoefficients {
    let (x, y) = (target.control_point() - source.start()).to_local(source.theta());
    let s = source.length();

    let r_start = (x.powi(2) + y.powi(2)).sqrt();
    let r_end = ((x - s).powi(2) + y.powi(2)).sqrt();
    let log_ratio = (r_start / r_end).ln();
    // signed angle subtended by the source panel, seen from the control point
    let beta = (y * s).atan2(x * (x - s) + y.powi(2));

    let delta = target.theta() - source.theta();
    let (sin, cos) = delta.sin_cos();
    ConstantPanelCoefficients {
        source_normal: -sin * log_ratio + cos * beta,
        source_tangential: cos * log_ratio + sin * beta,
        vortex_normal: -sin * beta - cos * log_ratio,
        vortex_tangential: cos * beta - sin * log_ratio,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::Placement;

    /// integrate the point kernel along `source` with the midpoint rule, weighted by `w(t)`
    fn quadrature(
        target: &Panel,
        source: &Panel,
        kernel: fn(&Vector, &Vector) -> Option<Vector>,
        w: impl Fn(f64) -> f64,
    ) -> Vector {
        let n = 20_000;
        let ds = source.length() / n as f64;
        (0..n)
            .map(|k| {
                let t = (k as f64 + 0.5) / n as f64;
                let at = source.start().lerp(source.end(), t);
                kernel(target.control_point(), &at)
                    .unwrap()
                    .scale(w(t) * ds * 2.0 * PI)
            })
            .fold(Vector::new(0.0, 0.0), |acc, v| acc + v)
    }

    fn pair() -> (Panel, Panel) {
        let target = Panel::new(Vector::new(0.3, 0.35), Vector::new(0.9, 0.1), Placement::Midpoint);
        let source = Panel::new(Vector::new(0.8, -0.2), Vector::new(0.1, -0.05), Placement::Midpoint);
        (target, source)
    }

    #[test]
    fn point_vortex_is_perpendicular_and_decays() {
        let v = point_vortex(&Vector::new(2.0, 0.0), &Vector::new(0.0, 0.0)).unwrap();
        assert_relative_eq!(v.x(), 0.0);
        assert_relative_eq!(v.y(), 1.0 / (4.0 * PI));
        assert!(point_vortex(&Vector::new(1.0, 1.0), &Vector::new(1.0, 1.0)).is_none());
        let s = point_source(&Vector::new(0.0, -2.0), &Vector::new(0.0, 0.0)).unwrap();
        assert_relative_eq!(s.y(), -1.0 / (4.0 * PI));
    }

    #[test]
    fn linear_vortex_matches_quadrature() {
        let (target, source) = pair();
        let [cn1, cn2, ct1, ct2] = LinearVortexTerms::new(&target, &source).coefficients();
        // the classic formulation takes the vortex sheet clockwise positive
        let start = quadrature(&target, &source, point_vortex, |t| -(1.0 - t));
        let end = quadrature(&target, &source, point_vortex, |t| -t);
        assert_relative_eq!(cn1, start.dot(&target.normal()), max_relative = 1e-6);
        assert_relative_eq!(cn2, end.dot(&target.normal()), max_relative = 1e-6);
        assert_relative_eq!(ct1, start.dot(&target.tangent()), max_relative = 1e-6);
        assert_relative_eq!(ct2, end.dot(&target.tangent()), max_relative = 1e-6);
    }

    #[test]
    fn constant_panel_matches_quadrature() {
        let (target, source) = pair();
        let coefficients = constant_panel(&target, &source);
        let sigma = quadrature(&target, &source, point_source, |_| 1.0);
        let gamma = quadrature(&target, &source, point_vortex, |_| -1.0);
        assert_relative_eq!(
            coefficients.source_normal,
            sigma.dot(&target.normal()),
            max_relative = 1e-6
        );
        assert_relative_eq!(
            coefficients.source_tangential,
            sigma.dot(&target.tangent()),
            max_relative = 1e-6
        );
        assert_relative_eq!(
            coefficients.vortex_normal,
            gamma.dot(&target.normal()),
            max_relative = 1e-6
        );
        assert_relative_eq!(
            coefficients.vortex_tangential,
            gamma.dot(&target.tangent()),
            max_relative = 1e-6
        );
    }

    #[test]
    fn constant_panel_approaches_self_term_from_flow_side() {
        let panel = Panel::new(Vector::new(1.0, 0.0), Vector::new(0.0, 0.0), Placement::Midpoint);
        // the normal of a panel running towards -x points down
        let probe = Panel::new(
            Vector::new(0.6, -1e-9),
            Vector::new(0.4, -1e-9),
            Placement::Midpoint,
        );
        let near = constant_panel(&probe, &panel);
        assert_relative_eq!(near.source_normal, CONSTANT_PANEL_SELF.source_normal, max_relative = 1e-6);
        assert_relative_eq!(
            near.vortex_tangential,
            CONSTANT_PANEL_SELF.vortex_tangential,
            max_relative = 1e-6
        );
    }
}
