//! Perspective camera.

use glam::Mat4;

use crate::core::Id;
use crate::math::Vector3;

/// A perspective projection camera.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Unique ID.
    id: Id,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Camera position.
    pub position: Vector3,
    /// Camera target (look-at point).
    pub target: Vector3,
    /// Up vector.
    pub up: Vector3,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(25.0, 1.0, 0.1, 100.0)
    }
}

impl PerspectiveCamera {
    /// Create a new perspective camera looking at the origin.
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            id: Id::new(),
            fov,
            aspect,
            near,
            far,
            position: Vector3::new(1.5, 0.0, 6.0),
            target: Vector3::ZERO,
            up: Vector3::UP,
        }
    }

    /// Get the unique ID.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Set the camera position.
    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    /// Look at a target from the current position.
    pub fn look_at(&mut self, target: Vector3) {
        self.target = target;
    }

    /// Set the aspect ratio. Non-positive or non-finite values are ignored.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// World to view.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position.into(), self.target.into(), self.up.into())
    }

    /// View to clip, with depth in `[0, 1]`.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    /// World to clip.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Maps NDC at the far plane to world-space view rays, ignoring translation.
    pub fn inverse_ray_matrix(&self) -> Mat4 {
        let mut rotation = self.view_matrix();
        rotation.w_axis = glam::Vec4::W;
        (self.projection_matrix() * rotation).inverse()
    }

    /// Get the forward direction.
    pub fn forward(&self) -> Vector3 {
        (self.target - self.position).normalized()
    }

    /// Distance from position to target.
    pub fn distance(&self) -> f32 {
        self.position.distance_to(&self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_defaults() {
        let camera = PerspectiveCamera::default();
        assert_eq!(camera.fov, 25.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 100.0);
        assert_eq!(camera.position, Vector3::new(1.5, 0.0, 6.0));
        assert_eq!(camera.target, Vector3::ZERO);
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = PerspectiveCamera::default();
        let clip = camera.view_projection_matrix() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_view_space_depth_is_negative() {
        let camera = PerspectiveCamera::default();
        let view = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!((view.z + camera.distance()).abs() < 1e-5);
    }

    #[test]
    fn test_center_ray_points_forward() {
        let camera = PerspectiveCamera::default();
        let far = camera.inverse_ray_matrix() * glam::Vec4::new(0.0, 0.0, 1.0, 1.0);
        let ray = (far.truncate() / far.w).normalize();
        let forward: Vec3 = camera.forward().into();
        assert!(ray.dot(forward) > 0.9999);
    }

    #[test]
    fn test_set_aspect_rejects_invalid() {
        let mut camera = PerspectiveCamera::default();
        camera.set_aspect(2.0);
        camera.set_aspect(0.0);
        camera.set_aspect(f32::NAN);
        assert_eq!(camera.aspect, 2.0);
    }
}
