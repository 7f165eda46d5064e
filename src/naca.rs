//! NACA 4-digit section outlines.
//!
//! Surfaces are offset from the mean line along its local normal by the half thickness, the
//! thickness polynomial uses the closed trailing-edge coefficient so both surfaces meet.

use std::f64::consts::PI;

use ndarray::{Array, Array1, Array2};

use crate::{
    error::ConfigError,
    geometry::{join_surfaces, GeometryError},
    PanelError,
};

/// Thickness polynomial coefficients with the closed trailing edge (`-0.1036`)
const THICKNESS: [f64; 5] = [0.2969, -0.1260, -0.3516, 0.2843, -0.1036];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Naca4 {
    /// maximum camber, fraction of chord
    m: f64,
    /// chordwise position of maximum camber, fraction of chord
    p: f64,
    /// maximum thickness, fraction of chord
    t: f64,
}

impl Naca4 {
    /// parse a designation like `"2412"`
    pub fn parse(designation: &str) -> Result<Self, GeometryError> {
        let invalid = || GeometryError::Designation(designation.to_string());
        if designation.len() != 4 || !designation.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let digit = |i: usize| designation[i..i + 1].parse::<f64>().map_err(|_| invalid());
        let m = digit(0)? / 100.0;
        let p = digit(1)? / 10.0;
        let t = designation[2..].parse::<f64>().map_err(|_| invalid())? / 100.0;
        if t <= 0.0 || (m > 0.0 && p == 0.0) {
            return Err(invalid());
        }
        Ok(Naca4 { m, p, t })
    }

    pub fn is_symmetric(&self) -> bool {
        self.m == 0.0
    }

    /// mean line height and slope at `x`
    pub fn camber(&self, x: f64) -> (f64, f64) {
        let Naca4 { m, p, .. } = *self;
        if m == 0.0 {
            (0.0, 0.0)
        } else if x < p {
            (m / p.powi(2) * (2.0 * p * x - x.powi(2)), 2.0 * m / p.powi(2) * (p - x))
        } else {
            (
                m / (1.0 - p).powi(2) * ((1.0 - 2.0 * p) + 2.0 * p * x - x.powi(2)),
                2.0 * m / (1.0 - p).powi(2) * (p - x),
            )
        }
    }

    /// half thickness at `x`
    pub fn half_thickness(&self, x: f64) -> f64 {
        let [a0, a1, a2, a3, a4] = THICKNESS;
        5.0 * self.t * (a0 * x.sqrt() + a1 * x + a2 * x.powi(2) + a3 * x.powi(3) + a4 * x.powi(4))
    }

    /// upper and lower surface points at chord station `x`
    pub fn surface_points(&self, x: f64) -> ([f64; 2], [f64; 2]) {
        let (yc, slope) = self.camber(x);
        let yt = self.half_thickness(x);
        let angle = slope.atan();
        let (dx, dy) = (yt * angle.sin(), yt * angle.cos());
        ([x - dx, yc + dy], [x + dx, yc - dy])
    }

    /// mean line through `n_panels + 1` cosine-spaced stations
    pub fn camber_line(&self, n_panels: usize) -> Result<Array2<f64>, PanelError> {
        let x = cosine_spacing(n_panels)?;
        Ok(Array2::from_shape_fn((x.len(), 2), |(i, k)| {
            if k == 0 {
                x[i]
            } else {
                self.camber(x[i]).0
            }
        }))
    }

    /// upper and lower surfaces, both from leading to trailing edge, `n_panels + 1` points each
    pub fn surfaces(&self, n_panels: usize) -> Result<(Array2<f64>, Array2<f64>), PanelError> {
        let x = cosine_spacing(n_panels)?;
        let mut upper = Array2::zeros((x.len(), 2));
        let mut lower = Array2::zeros((x.len(), 2));
        for (i, &x) in x.iter().enumerate() {
            let ([xu, yu], [xl, yl]) = self.surface_points(x);
            upper[[i, 0]] = xu;
            upper[[i, 1]] = yu;
            lower[[i, 0]] = xl;
            lower[[i, 1]] = yl;
        }
        Ok((upper, lower))
    }

    /// Closed clockwise contour with `n_panels` panels, half of them on each surface.
    pub fn closed_contour(&self, n_panels: usize) -> Result<Array2<f64>, PanelError> {
        if n_panels % 2 != 0 {
            return Err(ConfigError::OddPanelCount(n_panels).into());
        }
        let (upper, lower) = self.surfaces(n_panels / 2)?;
        Ok(join_surfaces(upper.view(), lower.view())?)
    }
}

/// `n + 1` stations in [0, 1] clustered at both ends
pub fn cosine_spacing(n: usize) -> Result<Array1<f64>, ConfigError> {
    if n == 0 {
        return Err(ConfigError::PanelCount { n, min: 1 });
    }
    Ok(Array::linspace(0.0, PI, n + 1).mapv(|beta| 0.5 * (1.0 - beta.cos())))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn parses_designations() {
        let foil = Naca4::parse("2412").unwrap();
        assert_abs_diff_eq!(foil.m, 0.02);
        assert_abs_diff_eq!(foil.p, 0.4);
        assert_abs_diff_eq!(foil.t, 0.12);
        assert!(Naca4::parse("0012").unwrap().is_symmetric());
        assert!(Naca4::parse("24a2").is_err());
        assert!(Naca4::parse("241").is_err());
        assert!(Naca4::parse("2012").is_err());
    }

    #[test]
    fn closed_contour_starts_and_ends_at_trailing_edge() {
        let contour = Naca4::parse("2412").unwrap().closed_contour(10).unwrap();
        assert_eq!(contour.dim(), (11, 2));
        assert_abs_diff_eq!(contour[[0, 0]], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(contour[[10, 0]], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(contour[[0, 1]], contour[[10, 1]], epsilon = 1e-15);
        // leading edge in the middle, lower surface first
        assert_abs_diff_eq!(contour[[5, 0]], 0.0);
        assert!(contour[[2, 1]] < 0.0 && contour[[8, 1]] > 0.0);
        assert_abs_diff_eq!(contour[[1, 0]], 0.9037769342296041, epsilon = 1e-12);
        assert_abs_diff_eq!(contour[[1, 1]], -0.007190947548681061, epsilon = 1e-12);
        assert_abs_diff_eq!(contour[[7, 0]], 0.3446799907251953, epsilon = 1e-12);
        assert_abs_diff_eq!(contour[[7, 1]], 0.07917983840371742, epsilon = 1e-12);
    }

    #[test]
    fn odd_panel_count_is_rejected() {
        let err = Naca4::parse("0012").unwrap().closed_contour(11).unwrap_err();
        assert!(matches!(err, PanelError::Config(ConfigError::OddPanelCount(11))));
    }
}
