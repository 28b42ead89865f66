use serde::{Deserialize, Serialize};

/// A pixel coordinate in the normalized image. Serializes as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point(pub f32, pub f32);

/// Four corners enclosing one recognized line, in the order the engine
/// reported them (top-left, top-right, bottom-right, bottom-left for
/// axis-aligned boxes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingPolygon(pub [Point; 4]);

impl BoundingPolygon {
    /// Axis-aligned rectangle from its top-left corner and extent.
    pub fn from_rect(left: f32, top: f32, width: f32, height: f32) -> Self {
        let (right, bottom) = (left + width, top + height);
        BoundingPolygon([
            Point(left, top),
            Point(right, top),
            Point(right, bottom),
            Point(left, bottom),
        ])
    }

    pub fn points(&self) -> &[Point; 4] {
        &self.0
    }
}

impl Default for BoundingPolygon {
    fn default() -> Self {
        BoundingPolygon::from_rect(0.0, 0.0, 0.0, 0.0)
    }
}
