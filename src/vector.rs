use std::ops::{Add, Sub};

use ndarray::{array, Array1};

use crate::rot_mat;

/// A point or direction in the chord-normalized airfoil frame
#[derive(Debug, Clone, PartialEq)]
pub struct Vector(Array1<f64>);

impl Vector {
    pub fn new(x: f64, y: f64) -> Self {
        Self(array![x, y])
    }

    /// build a global vector from components given in a frame rotated by `theta`
    pub fn from_local(x: f64, y: f64, theta: f64) -> Self {
        Vector(rot_mat(theta).dot(&array![x, y]))
    }

    /// components of this vector in a frame rotated by `theta`
    pub fn to_local(&self, theta: f64) -> (f64, f64) {
        let target = rot_mat(-theta).dot(&self.0);
        (target[0], target[1])
    }

    pub fn x(&self) -> f64 {
        self.0[0]
    }

    pub fn y(&self) -> f64 {
        self.0[1]
    }

    pub fn dot(&self, other: &Vector) -> f64 {
        self.0.dot(&other.0)
    }

    pub fn magnitude(&self) -> f64 {
        (self.0[0].powi(2) + self.0[1].powi(2)).sqrt()
    }

    pub fn scale(&self, factor: f64) -> Self {
        Vector(&self.0 * factor)
    }

    /// the point at fraction `t` on the way from `self` to `other`
    pub fn lerp(&self, other: &Vector, t: f64) -> Self {
        Vector(&self.0 + &((&other.0 - &self.0) * t))
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        let Vector(lhs) = self;
        let Vector(rhs) = rhs;
        Vector(lhs - rhs)
    }
}

impl<'a> Sub<&'a Vector> for &'a Vector {
    type Output = Vector;

    fn sub(self, rhs: &'a Vector) -> Self::Output {
        Vector(&self.0 - &rhs.0)
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let Vector(lhs) = self;
        let Vector(rhs) = rhs;
        Vector(lhs + rhs)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn local_frame_round_trip_keeps_direction() {
        let v = Vector::new(0.3, -1.2);
        let (x, y) = v.to_local(0.7);
        let back = Vector::from_local(x, y, 0.7);
        assert_abs_diff_eq!(back.x(), v.x(), epsilon = 1e-14);
        assert_abs_diff_eq!(back.y(), v.y(), epsilon = 1e-14);
    }

    #[test]
    fn quarter_turn_maps_x_axis_onto_y_axis() {
        let v = Vector::from_local(1.0, 0.0, FRAC_PI_2);
        assert_abs_diff_eq!(v.x(), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(v.y(), 1.0, epsilon = 1e-15);
        let (x, y) = Vector::new(0.0, 1.0).to_local(FRAC_PI_2);
        assert_abs_diff_eq!(x, 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-15);
    }
}
