//! Circle layout - maps a participant index onto a point of the circle.

use serde::{Deserialize, Serialize};

/// Default circle radius in pixels
pub const DEFAULT_RADIUS: f64 = 300.0;

/// A position in renderer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Places `total` participants evenly around a circle, starting at angle 0 and
/// moving towards positive y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleLayout {
    radius: f64,
    origin: Point,
}

impl CircleLayout {
    /// Circle of `radius` centred on the origin.
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            origin: Point::default(),
        }
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn position(&self, index: usize, total: usize) -> Point {
        if total == 0 {
            return self.origin;
        }
        let segment = 360.0 / total as f64;
        let angle = (segment * index as f64).to_radians();
        Point {
            x: angle.cos() * self.radius + self.origin.x,
            y: angle.sin() * self.radius + self.origin.y,
        }
    }

    /// Positions of every participant in circle order
    pub fn positions(&self, total: usize) -> Vec<Point> {
        (0..total).map(|index| self.position(index, total)).collect()
    }
}

impl Default for CircleLayout {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS)
    }
}
