//! Orbit controls for rotating camera around a target.

use crate::camera::PerspectiveCamera;
use crate::math::{consts, Spherical, Vector3};

/// Per-step zoom factor for one wheel notch.
const ZOOM_BASE: f32 = 0.95;

/// Orbit controls allowing camera rotation around a target point.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Target point to orbit around.
    pub target: Vector3,
    /// Minimum distance from target.
    pub min_distance: f32,
    /// Maximum distance from target.
    pub max_distance: f32,
    /// Minimum polar angle (radians, 0 = top).
    pub min_polar_angle: f32,
    /// Maximum polar angle (radians, PI = bottom).
    pub max_polar_angle: f32,
    /// Enable rotation.
    pub enable_rotate: bool,
    /// Enable zooming.
    pub enable_zoom: bool,
    /// Rotation speed multiplier.
    pub rotate_speed: f32,
    /// Zoom speed multiplier.
    pub zoom_speed: f32,
    /// Enable damping (smooth movement).
    pub enable_damping: bool,
    /// Fraction of the pending rotation applied per update.
    pub damping_factor: f32,
    // Pending rotation, drained by `update`.
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vector3::ZERO,
            min_distance: 0.1,
            max_distance: 1000.0,
            min_polar_angle: 0.0,
            max_polar_angle: consts::PI,
            enable_rotate: true,
            enable_zoom: true,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            enable_damping: true,
            damping_factor: 0.05,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }
}

impl OrbitControls {
    /// Create new orbit controls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create orbit controls with a target.
    pub fn with_target(target: Vector3) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Set the damping factor. Values outside `(0, 1]` disable damping.
    pub fn with_damping(mut self, damping_factor: f32) -> Self {
        if damping_factor > 0.0 && damping_factor <= 1.0 {
            self.damping_factor = damping_factor;
            self.enable_damping = true;
        } else {
            self.enable_damping = false;
        }
        self
    }

    /// Queue a rotation: `delta_theta` around the up axis, `delta_phi` towards the pole.
    pub fn rotate(&mut self, delta_theta: f32, delta_phi: f32) {
        if self.enable_rotate && delta_theta.is_finite() && delta_phi.is_finite() {
            self.delta_theta -= delta_theta * self.rotate_speed;
            self.delta_phi -= delta_phi * self.rotate_speed;
        }
    }

    /// Rotate from a pointer drag. A drag across the full viewport height is one turn.
    pub fn rotate_by_pixels(&mut self, delta_x: f32, delta_y: f32, screen_height: f32) {
        if screen_height <= 0.0 {
            return;
        }
        let per_pixel = consts::TWO_PI / screen_height;
        self.rotate(delta_x * per_pixel, delta_y * per_pixel);
    }

    /// Zoom by `steps` notches; positive moves closer.
    pub fn zoom(&mut self, steps: f32) {
        if self.enable_zoom && steps.is_finite() {
            self.scale *= ZOOM_BASE.powf(steps * self.zoom_speed);
        }
    }

    /// Zoom from a wheel event; scrolling up (negative delta) moves closer.
    pub fn zoom_by_wheel(&mut self, delta_y: f32) {
        if delta_y < 0.0 {
            self.zoom(1.0);
        } else if delta_y > 0.0 {
            self.zoom(-1.0);
        }
    }

    /// Apply pending input to the camera. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - self.target;
        let mut spherical = Spherical::from_cartesian(offset.x, offset.y, offset.z);

        if self.enable_damping {
            spherical.theta += self.delta_theta * self.damping_factor;
            spherical.phi += self.delta_phi * self.damping_factor;
        } else {
            spherical.theta += self.delta_theta;
            spherical.phi += self.delta_phi;
        }

        spherical.phi = spherical.phi.clamp(self.min_polar_angle, self.max_polar_angle);
        spherical.make_safe();
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;

        let position = self.target + Vector3::from_spherical(&spherical);
        let moved = (position - camera.position).length_squared() > consts::EPSILON;
        camera.set_position(position);
        camera.look_at(self.target);
        moved
    }

    /// Drop pending input.
    pub fn reset(&mut self) {
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_update_keeps_camera() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::new();
        let before = camera.position;
        assert!(!controls.update(&mut camera));
        assert!(camera.position.approx_eq(&before, 1e-4));
    }

    #[test]
    fn test_damped_rotation_converges() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::new();
        let start = Spherical::from_cartesian(camera.position.x, camera.position.y, camera.position.z);

        controls.rotate(-0.5, 0.0);
        assert!(controls.update(&mut camera));
        let first = Spherical::from_cartesian(camera.position.x, camera.position.y, camera.position.z);
        assert!(((first.theta - start.theta) - 0.5 * 0.05).abs() < 1e-4);

        for _ in 0..500 {
            controls.update(&mut camera);
        }
        let end = Spherical::from_cartesian(camera.position.x, camera.position.y, camera.position.z);
        assert!(((end.theta - start.theta) - 0.5).abs() < 1e-3);
        assert!((end.radius - start.radius).abs() < 1e-3);
    }

    #[test]
    fn test_undamped_rotation_is_immediate() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls {
            enable_damping: false,
            ..OrbitControls::new()
        };
        let start = Spherical::from_cartesian(camera.position.x, camera.position.y, camera.position.z);
        controls.rotate(-0.25, 0.0);
        controls.update(&mut camera);
        let end = Spherical::from_cartesian(camera.position.x, camera.position.y, camera.position.z);
        assert!(((end.theta - start.theta) - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_wheel_zoom() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::new();
        let start = camera.distance();

        controls.zoom_by_wheel(-100.0);
        controls.update(&mut camera);
        assert!((camera.distance() - start * 0.95).abs() < 1e-4);

        controls.zoom_by_wheel(100.0);
        controls.update(&mut camera);
        assert!((camera.distance() - start).abs() < 1e-4);
    }

    #[test]
    fn test_polar_clamp() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls {
            enable_damping: false,
            ..OrbitControls::new()
        };
        controls.rotate(0.0, 10.0);
        controls.update(&mut camera);
        assert!(camera.position.is_finite());
        assert!(camera.position.y > 0.0);
        assert!((camera.distance() - 6.184_658).abs() < 1e-3);
        assert_eq!(camera.target, Vector3::ZERO);
    }

    #[test]
    fn test_with_damping() {
        let controls = OrbitControls::with_target(Vector3::new(0.0, 1.0, 0.0)).with_damping(0.2);
        assert_eq!(controls.damping_factor, 0.2);
        assert!(controls.enable_damping);
        assert_eq!(controls.target, Vector3::new(0.0, 1.0, 0.0));

        let controls = OrbitControls::new().with_damping(0.0);
        assert!(!controls.enable_damping);
    }

    #[test]
    fn test_distance_limits() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls {
            max_distance: 7.0,
            ..OrbitControls::new()
        };
        controls.zoom(-50.0);
        controls.update(&mut camera);
        assert!((camera.distance() - 7.0).abs() < 1e-4);
    }
}
