//! Orbit camera circling the cube field.

use glam::{Mat4, Vec3};

use crate::params::OrbitParams;

/// Perspective camera on a horizontal circle, always aimed at a fixed target
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    params: OrbitParams,
    position: Vec3,
    target: Vec3,
    aspect: f32,
    projection: Mat4,
}

impl OrbitCamera {
    /// Create camera at its t = 0 orbit position
    pub fn new(params: OrbitParams, aspect: f32) -> Self {
        let target = Vec3::from_array(params.target);
        let mut camera = Self {
            position: Vec3::new(0.0, params.height, params.distance),
            target,
            aspect,
            projection: Mat4::IDENTITY,
            params,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Orbit position for a given elapsed time
    ///
    /// # Arguments
    /// * `time_s` - Seconds since the clock started
    ///
    /// # Returns
    /// Eye position with `x² + z² = distance²`; y stays at the current height
    pub fn orbit_position(&self, time_s: f32) -> Vec3 {
        let angle = time_s * self.params.angular_speed_deg_per_s.to_radians();
        Vec3::new(
            self.params.distance * angle.sin(),
            self.position.y,
            self.params.distance * angle.cos(),
        )
    }

    /// Move the camera along the orbit and re-aim it at the target
    pub fn orbit(&mut self, time_s: f32) {
        self.position = self.orbit_position(time_s);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Recompute the projection from fov, aspect and clip planes
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.params.fov_degrees.to_radians(),
            self.aspect,
            self.params.near_plane,
            self.params.far_plane,
        );
    }

    pub fn view_matrix(&self) -> Mat4 {
        // Always keep Y as up vector (camera never rolls)
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Create view-projection matrix for rendering
    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn distance(&self) -> f32 {
        self.params.distance
    }
}
