//! Point cloud container and the instance type built on it

use crate::error::{Error, Result};
use crate::point::Point3f;
use serde::{Deserialize, Serialize};
use std::ops::Index;
use std::path::Path;

/// A generic point cloud container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloud<T> {
    pub points: Vec<T>,
}

/// One decoded point cloud, the unit that gets labeled or viewed
pub type Instance = PointCloud<Point3f>;

impl<T> PointCloud<T> {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a point cloud with room for `capacity` points
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Create a point cloud from a vector of points
    pub fn from_points(points: Vec<T>) -> Self {
        Self { points }
    }

    /// Number of points in the cloud
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: T) {
        self.points.push(point);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.points.iter()
    }
}

impl PointCloud<Point3f> {
    /// Reshape a flat row of coordinates into `(x, y, z)` triples.
    ///
    /// `source` only names the file in the error when the row length is not
    /// a multiple of three.
    pub fn from_flat(values: &[f32], source: &Path) -> Result<Self> {
        if values.len() % 3 != 0 {
            return Err(Error::decode(
                source,
                format!(
                    "row of {} values cannot be reshaped into 3 columns",
                    values.len()
                ),
            ));
        }
        Ok(values
            .chunks_exact(3)
            .map(|xyz| Point3f::new(xyz[0], xyz[1], xyz[2]))
            .collect())
    }
}

impl<T> Default for PointCloud<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for PointCloud<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<'a, T> IntoIterator for &'a PointCloud<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<T> Extend<T> for PointCloud<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

impl<T> FromIterator<T> for PointCloud<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            points: Vec::from_iter(iter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flat_reshapes_into_triples() {
        let cloud = Instance::from_flat(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], Path::new("a.h5")).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud[0], Point3f::new(0.0, 1.0, 2.0));
        assert_eq!(cloud[1], Point3f::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_from_flat_rejects_ragged_rows() {
        let err = Instance::from_flat(&[0.0, 1.0, 2.0, 3.0], Path::new("a.h5")).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_from_flat_empty_row_is_empty_cloud() {
        let cloud = Instance::from_flat(&[], Path::new("a.h5")).unwrap();
        assert!(cloud.is_empty());
    }
}
