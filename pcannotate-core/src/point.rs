//! Point types and related functionality

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// An RGB color with components in `[0, 1]`
pub type Rgb = [f32; 3];

/// How a display should draw the points of an instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointStyle {
    pub color: Rgb,
    /// Point size in screen pixels
    pub size: f32,
}

impl PointStyle {
    /// Green points, drawn large enough to judge an instance at a glance
    pub fn annotation() -> Self {
        Self {
            color: [0.0, 0.5, 0.0],
            size: 4.0,
        }
    }

    /// Green points, drawn smaller for stepping through a whole file
    pub fn browsing() -> Self {
        Self {
            size: 2.0,
            ..Self::annotation()
        }
    }

    /// Replace the point size
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }
}

impl Default for PointStyle {
    fn default() -> Self {
        Self::annotation()
    }
}
