//! Core geometry types for epicycle.
//!
//! ## Rust Lesson #1: Structs & Derives
//!
//! In JS (p5.js) the original kept points as a `Point` class with drawing
//! methods mixed in. In Rust we define a plain data `struct` and keep
//! drawing out of the core entirely.
//!
//! The `#[derive(...)]` macro auto-generates common functionality:
//! - `Debug` = like console.log, lets you print with `{:?}`
//! - `Clone` / `Copy` = small stack value, copied implicitly
//! - `PartialEq` = can compare with `==`

/// A 2D point with x,y coordinates.
///
/// `f64` = 64-bit float (like JS's `number` but explicitly sized)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point. This is the common pattern instead of constructors.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Endpoint of a stick of the given length attached at this point.
    ///
    /// The angle is in degrees and is measured from the vertical axis, so
    /// the x component uses `sin` and the y component uses `cos`. This is
    /// the rotating-vector step of the epicycle chain: each harmonic's tip
    /// is `base.polar_offset(phase, amplitude)`.
    #[inline]
    pub fn polar_offset(&self, angle_degrees: f64, length: f64) -> Point {
        let angle = angle_degrees.to_radians();
        Point::new(self.x + length * angle.sin(), self.y + length * angle.cos())
    }

    /// Linear interpolation between two points (`t` in [0,1]).
    #[inline]
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert_eq!(p1.distance(p2), 5.0); // 3-4-5 triangle
    }

    #[test]
    fn polar_offset_zero_degrees_is_vertical() {
        // Angle measured from the vertical axis: 0° points along +y.
        let p = Point::new(1.0, 1.0).polar_offset(0.0, 2.0);
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!((p.y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn polar_offset_ninety_degrees_is_horizontal() {
        let p = Point::new(0.0, 0.0).polar_offset(90.0, 2.0);
        assert!((p.x - 2.0).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
    }

    #[test]
    fn lerp_midpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, -4.0);
        let mid = a.lerp(b, 0.5);
        assert_eq!(mid, Point::new(5.0, -2.0));
    }
}
