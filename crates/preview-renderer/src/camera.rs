//! Orbit camera around the previewed model.
//!
//! Spherical coordinates relative to a target point: `theta` turns around
//! the Y axis, `phi` is measured from +Y.

use std::f32::consts::{FRAC_PI_3, FRAC_PI_4, PI};

use glam::{Mat4, Vec3};

use crate::scene::BoundingBox;

const MIN_PHI: f32 = 0.01;
const MAX_PHI: f32 = PI - 0.01;
const MIN_RADIUS: f32 = 0.1;
const MAX_RADIUS: f32 = 100.0;

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera orbits around and looks at
    pub target: Vec3,
    /// Distance from target
    pub radius: f32,
    /// Azimuth in radians
    pub theta: f32,
    /// Polar angle from +Y in radians
    pub phi: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            radius: 5.0,
            theta: FRAC_PI_4,
            phi: FRAC_PI_3,
            fov_y: 45f32.to_radians(),
            near: 0.05,
            far: 200.0,
        }
    }
}

impl OrbitCamera {
    pub fn set_fov_degrees(&mut self, degrees: f32) {
        self.fov_y = degrees.clamp(10.0, 120.0).to_radians();
    }

    /// Place the camera at the given angles, keeping target and distance.
    pub fn set_view(&mut self, theta: f32, phi: f32) {
        self.theta = theta;
        self.phi = phi.clamp(MIN_PHI, MAX_PHI);
    }

    pub fn eye_position(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.target
            + self.radius * Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(1e-3), self.near, self.far)
    }

    pub fn view_projection_matrix(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Orbit around the target. `phi` stays clear of the poles.
    pub fn orbit(&mut self, delta_theta: f32, delta_phi: f32) {
        self.theta = (self.theta + delta_theta).rem_euclid(2.0 * PI);
        self.phi = (self.phi + delta_phi).clamp(MIN_PHI, MAX_PHI);
    }

    /// Multiplicative zoom; positive `delta` moves closer.
    pub fn zoom(&mut self, delta: f32) {
        let factor = (1.0 - delta * 0.1).max(0.1);
        self.radius = (self.radius * factor).clamp(MIN_RADIUS, MAX_RADIUS);
    }

    /// Center on `bounds` at a distance that keeps the whole box in view.
    pub fn focus_on(&mut self, bounds: &BoundingBox) {
        self.target = bounds.center();
        let half_diagonal = bounds.size().length() * 0.5;
        let distance = half_diagonal / (self.fov_y * 0.5).sin();
        self.radius = distance.clamp(MIN_RADIUS, MAX_RADIUS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_eye_position_front_view() {
        let mut camera = OrbitCamera::default();
        camera.set_view(0.0, std::f32::consts::FRAC_PI_2);
        let eye = camera.eye_position();
        assert_relative_eq!(eye.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(eye.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(eye.z, camera.radius, epsilon = 1e-5);
    }

    #[test]
    fn test_eye_keeps_radius_while_orbiting() {
        let mut camera = OrbitCamera::default();
        for _ in 0..10 {
            camera.orbit(0.7, 0.3);
            let distance = (camera.eye_position() - camera.target).length();
            assert_relative_eq!(distance, camera.radius, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_orbit_clamps_at_poles() {
        let mut camera = OrbitCamera::default();
        camera.orbit(0.0, 10.0);
        assert_relative_eq!(camera.phi, MAX_PHI);
        camera.orbit(0.0, -10.0);
        assert_relative_eq!(camera.phi, MIN_PHI);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.zoom(1.0);
        assert!(camera.radius < 5.0);
        for _ in 0..100 {
            camera.zoom(5.0);
        }
        assert_relative_eq!(camera.radius, MIN_RADIUS);
        for _ in 0..100 {
            camera.zoom(-5.0);
        }
        assert_relative_eq!(camera.radius, MAX_RADIUS);
    }

    #[test]
    fn test_focus_on_bounds() {
        let mut camera = OrbitCamera::default();
        let bounds = BoundingBox::new(Vec3::new(-0.4, 0.0, -0.4), Vec3::new(0.4, 1.0, 0.4));
        camera.focus_on(&bounds);

        assert_eq!(camera.target, Vec3::new(0.0, 0.5, 0.0));
        let half_diagonal = bounds.size().length() * 0.5;
        assert!(camera.radius > half_diagonal);
    }
}
