//! Minimal 2D point in normalized view space

use serde::{Deserialize, Serialize};

/// A position in normalized view space (top-left origin, x and y in [0, 1])
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Vector from `other` to `self`
    pub fn sub(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Arithmetic mean of a set of points, `None` when empty
    pub fn centroid<'a, I>(points: I) -> Option<Point>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut sum = Point::default();
        let mut count = 0usize;
        for p in points {
            sum.x += p.x;
            sum.y += p.y;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(Point::new(sum.x / count as f32, sum.y / count as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.3, 0.4);
        assert!((a.distance(&b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_centroid() {
        let pts = [Point::new(0.0, 0.0), Point::new(1.0, 0.5)];
        let c = Point::centroid(pts.iter()).unwrap();
        assert!((c.x - 0.5).abs() < 1e-6);
        assert!((c.y - 0.25).abs() < 1e-6);
        assert!(Point::centroid([].iter()).is_none());
    }
}
