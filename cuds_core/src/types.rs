//! Core geometric types shared by CUDS containers and visualization datasets.
//!
//! Provides the 3D point/vector type and the column-major node index helpers
//! used by lattices and structured grids.

use core::ops::{Add, Div, Mul, Neg, Sub};

/// A 3D point (or vector) with named fields for clarity.
///
/// Provides arithmetic operations and conversions to/from arrays.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl Point3 {
    /// Create a new Point3.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a Point3 with all components set to the same value.
    #[inline]
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// The origin.
    #[inline]
    pub const fn zero() -> Self {
        Self::splat(0.0)
    }

    /// Convert to an array.
    #[inline]
    pub const fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Component by axis (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn axis(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Dot product with another point (treating both as vectors).
    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product with another point (treating both as vectors).
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Squared length of the vector.
    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Length (magnitude) of the vector.
    #[inline]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Cosine of the angle between two vectors.
    ///
    /// Returns NaN when either vector has zero length.
    #[inline]
    pub fn cos_angle(self, other: Self) -> f64 {
        self.dot(other) / (self.length() * other.length())
    }

    /// Component-wise approximate equality with an absolute tolerance.
    #[inline]
    pub fn approx_eq(self, other: Self, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
    }

    /// True if every component is finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Point3 {
    #[inline]
    fn from(arr: [f64; 3]) -> Self {
        Self {
            x: arr[0],
            y: arr[1],
            z: arr[2],
        }
    }
}

impl From<Point3> for [f64; 3] {
    #[inline]
    fn from(p: Point3) -> Self {
        p.as_array()
    }
}

impl From<(f64, f64, f64)> for Point3 {
    #[inline]
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self { x, y, z }
    }
}

impl Add for Point3 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Point3 {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f64> for Point3 {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Mul<Point3> for f64 {
    type Output = Point3;

    #[inline]
    fn mul(self, point: Point3) -> Point3 {
        point * self
    }
}

impl Div<f64> for Point3 {
    type Output = Self;

    #[inline]
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl Neg for Point3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Integer index of a lattice node / structured grid point.
pub type NodeIndex = [usize; 3];

/// Flatten a node index into a point id using column-major order
/// (`x` varies fastest): `id = i + nx * (j + ny * k)`.
///
/// Returns `None` when any component is outside `size`.
#[inline]
pub fn ravel_index(index: NodeIndex, size: [usize; 3]) -> Option<usize> {
    if index[0] >= size[0] || index[1] >= size[1] || index[2] >= size[2] {
        return None;
    }
    Some(index[0] + size[0] * (index[1] + size[1] * index[2]))
}

/// Inverse of [`ravel_index`].
///
/// Returns `None` when `flat` is not below `size[0] * size[1] * size[2]`.
#[inline]
pub fn unravel_index(flat: usize, size: [usize; 3]) -> Option<NodeIndex> {
    let total = size[0] * size[1] * size[2];
    if flat >= total {
        return None;
    }
    let plane = size[0] * size[1];
    Some([flat % size[0], (flat / size[0]) % size[1], flat / plane])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point3_arithmetic() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Point3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Point3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Point3::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, Point3::new(2.0, 4.0, 6.0));
        assert_eq!(b / 2.0, Point3::new(2.0, 2.5, 3.0));
        assert_eq!(-a, Point3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn test_point3_dot_cross() {
        let a = Point3::new(1.0, 0.0, 0.0);
        let b = Point3::new(0.0, 1.0, 0.0);

        assert_eq!(a.dot(b), 0.0);
        assert_eq!(a.cross(b), Point3::new(0.0, 0.0, 1.0));
        assert!((Point3::new(3.0, 4.0, 0.0).length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_cos_angle() {
        let a = Point3::new(1.0, 0.0, 0.0);
        let b = Point3::new(1.0, 1.0, 0.0);
        assert!((a.cos_angle(b) - core::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert!(a.cos_angle(Point3::zero()).is_nan());
    }

    #[test]
    fn test_ravel_unravel() {
        let size = [5, 10, 12];
        assert_eq!(ravel_index([0, 0, 0], size), Some(0));
        assert_eq!(ravel_index([1, 0, 0], size), Some(1));
        assert_eq!(ravel_index([0, 1, 0], size), Some(5));
        assert_eq!(ravel_index([0, 0, 1], size), Some(50));
        assert_eq!(ravel_index([2, 3, 4], size), Some(2 + 5 * (3 + 10 * 4)));
        assert_eq!(ravel_index([5, 0, 0], size), None);

        for flat in 0..600 {
            let index = unravel_index(flat, size).unwrap();
            assert_eq!(ravel_index(index, size), Some(flat));
        }
        assert_eq!(unravel_index(600, size), None);
    }
}
