//! Orbit camera for inspecting one instance at a time

use nalgebra::{Matrix4, Perspective3, Point3, Vector3};
use pcannotate_core::Drawable;

/// nalgebra projects depth to `[-1, 1]`, wgpu expects `[0, 1]`
#[rustfmt::skip]
pub fn opengl_to_wgpu_matrix() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

const DEFAULT_YAW: f32 = 0.6;
const DEFAULT_PITCH: f32 = 0.4;
const MAX_PITCH: f32 = 1.55;

/// A camera orbiting around a target point
#[derive(Debug, Clone)]
pub struct Camera {
    pub target: Point3<f32>,
    pub distance: f32,
    /// Rotation around the up axis, radians
    pub yaw: f32,
    /// Elevation above the horizontal plane, radians
    pub pitch: f32,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Camera looking at `target` from `distance`
    pub fn new(target: Point3<f32>, distance: f32, aspect_ratio: f32) -> Self {
        let mut camera = Self {
            target,
            distance,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::FRAC_PI_4,
            aspect_ratio,
            near: 0.01,
            far: 100.0,
        };
        camera.update_clip_planes(distance);
        camera
    }

    /// Eye position derived from target, distance and angles
    pub fn position(&self) -> Point3<f32> {
        let direction = Vector3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        self.target + direction * self.distance
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position(), &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far).into_inner()
    }

    /// Projection times view, in wgpu clip space
    pub fn view_projection(&self) -> Matrix4<f32> {
        opengl_to_wgpu_matrix() * self.projection_matrix() * self.view_matrix()
    }

    /// Point at `object` from a distance that fits all of it in view,
    /// restoring the default angles
    pub fn frame<D: Drawable + ?Sized>(&mut self, object: &D) {
        let radius = object.extent().max(1e-3);
        self.target = object.center();
        self.distance = radius / (self.fov / 2.0).tan() * 1.2;
        self.yaw = DEFAULT_YAW;
        self.pitch = DEFAULT_PITCH;
        self.update_clip_planes(radius);
    }

    /// Rotate the camera around the target
    pub fn orbit(&mut self, horizontal: f32, vertical: f32) {
        self.yaw -= horizontal;
        self.pitch = (self.pitch + vertical).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Move toward (`steps > 0`) or away from the target
    pub fn zoom(&mut self, steps: f32) {
        self.distance = (self.distance * 0.9f32.powf(steps)).max(self.near * 2.0);
    }

    fn update_clip_planes(&mut self, radius: f32) {
        self.near = (self.distance - radius * 4.0).max(self.distance * 1e-3).max(1e-4);
        self.far = self.distance + radius * 4.0;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Point3::origin(), 5.0, 4.0 / 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pcannotate_core::{Instance, Point3f};

    #[test]
    fn test_frame_centers_on_instance() {
        let cloud = Instance::from_points(vec![
            Point3f::new(10.0, 0.0, 0.0),
            Point3f::new(12.0, 2.0, 2.0),
        ]);
        let mut camera = Camera::default();
        camera.orbit(1.0, 0.5);
        camera.frame(&cloud);

        assert_relative_eq!(camera.target.x, 11.0);
        assert_relative_eq!(camera.target.y, 1.0);
        assert_relative_eq!(camera.yaw, DEFAULT_YAW);
        assert!(camera.distance > cloud.extent());
        assert!(camera.near < camera.distance - cloud.extent());
        assert!(camera.far > camera.distance + cloud.extent());
    }

    #[test]
    fn test_orbit_keeps_distance_and_clamps_pitch() {
        let mut camera = Camera::default();
        camera.orbit(0.3, 10.0);
        assert_relative_eq!(camera.pitch, MAX_PITCH);
        let eye = camera.position();
        assert_relative_eq!((eye - camera.target).norm(), camera.distance, epsilon = 1e-4);
    }

    #[test]
    fn test_zoom_moves_closer() {
        let mut camera = Camera::default();
        let before = camera.distance;
        camera.zoom(1.0);
        assert!(camera.distance < before);
        camera.zoom(-2.0);
        assert!(camera.distance > before);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let camera = Camera::new(Point3::new(1.0, 2.0, 3.0), 4.0, 1.0);
        let clip = camera.view_projection() * camera.target.to_homogeneous();
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth));
    }
}
