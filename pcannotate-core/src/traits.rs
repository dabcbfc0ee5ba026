//! Core traits for pcannotate

use crate::{error::Result, point::*, point_cloud::*};

/// Trait for drawable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        Point3f::new(
            (min.x + max.x) / 2.0,
            (min.y + max.y) / 2.0,
            (min.z + max.z) / 2.0,
        )
    }

    /// Radius of the sphere around [`Drawable::center`] enclosing the bounding box
    fn extent(&self) -> f32 {
        let (min, max) = self.bounding_box();
        (max - min).norm() / 2.0
    }
}

impl Drawable for PointCloud<Point3f> {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        let Some(first) = self.points.first() else {
            return (Point3f::origin(), Point3f::origin());
        };

        let mut min = *first;
        let mut max = *first;

        for p in &self.points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);

            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        (min, max)
    }
}

/// Input reported by a display while it is being pumped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    /// A registered key was pressed
    Key(char),
    /// The user closed the window
    Closed,
}

/// Rendering capability the sessions drive.
///
/// Implementations own the window and everything drawn in it. Sessions hand
/// over points to show, declare which keys they care about, and then call
/// [`Display::pump_events`] repeatedly until one of their flags changes; that
/// loop is the only place a session waits.
pub trait Display {
    /// Replace whatever is shown with `points`
    fn show_points(&mut self, points: &Instance, style: &PointStyle) -> Result<()>;

    /// Report presses of `key` from now on
    fn register_key(&mut self, key: char);

    /// Process pending window input and redraw.
    ///
    /// Returns the registered key presses and close requests seen during
    /// this pump, in order.
    fn pump_events(&mut self) -> Result<Vec<DisplayEvent>>;

    /// Tear down the window. Further pumps return no events.
    fn close(&mut self);
}

impl<D: Display + ?Sized> Display for &mut D {
    fn show_points(&mut self, points: &Instance, style: &PointStyle) -> Result<()> {
        (**self).show_points(points, style)
    }

    fn register_key(&mut self, key: char) {
        (**self).register_key(key)
    }

    fn pump_events(&mut self) -> Result<Vec<DisplayEvent>> {
        (**self).pump_events()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounding_box_and_center() {
        let cloud = Instance::from_points(vec![
            Point3f::new(-1.0, 0.0, 1.0),
            Point3f::new(3.0, 4.0, -1.0),
            Point3f::new(1.0, 1.0, 0.0),
        ]);
        let (min, max) = cloud.bounding_box();
        assert_eq!(min, Point3f::new(-1.0, 0.0, -1.0));
        assert_eq!(max, Point3f::new(3.0, 4.0, 1.0));

        let center = cloud.center();
        assert_relative_eq!(center.x, 1.0);
        assert_relative_eq!(center.y, 2.0);
        assert_relative_eq!(center.z, 0.0);
        assert_relative_eq!(cloud.extent(), 3.0);
    }

    #[test]
    fn test_empty_cloud_has_degenerate_box() {
        let cloud = Instance::new();
        assert_eq!(cloud.bounding_box(), (Point3f::origin(), Point3f::origin()));
        assert_relative_eq!(cloud.extent(), 0.0);
    }
}
