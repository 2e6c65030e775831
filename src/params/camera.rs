//! Orbit camera configuration.

/// Orbit camera parameters (horizontal circle around the origin)
#[derive(Debug, Clone)]
pub struct OrbitParams {
    /// Orbit radius (world units); also the side of the cube field's bounding box
    pub distance: f32,

    /// Angular speed around the Y axis (degrees per second)
    pub angular_speed_deg_per_s: f32,

    /// Constant camera height (world units)
    pub height: f32,

    /// Look-at target (world units)
    pub target: [f32; 3],

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            distance: 5000.0,
            angular_speed_deg_per_s: 10.0,
            height: 0.0,
            target: [0.0, 0.0, 0.0],
            fov_degrees: 45.0,
            near_plane: 0.1,
            far_plane: 10000.0,
        }
    }
}
