//! Field of cubes with per-element placement and shader parameters.

use glam::{DVec3, EulerRot, Mat4, Quat, Vec3};
use rand::Rng;
use std::f64::consts::TAU;

/// Per-element shader parameter block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderParams {
    /// 1-based element index
    pub id: u32,
    /// Number of elements in the field
    pub total_count: u32,
    /// Audio-driven color shift
    pub color_offset: f32,
}

/// Parameters shared by every element (single writer: the animation driver)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SharedUniforms {
    /// Seconds since the clock started
    pub time: f32,
    /// Drawing-buffer size (physical pixels)
    pub resolution: [f32; 2],
}

/// One cube in the field
#[derive(Debug, Clone, PartialEq)]
pub struct VisualElement {
    /// Fixed at creation
    pub position: Vec3,
    /// Euler angles (radians, XYZ order), accumulated every frame
    ///
    /// Kept in f64 so per-frame increments still land after hours of spinning.
    pub rotation: DVec3,
    /// Always uniform on all three axes
    pub scale: Vec3,
    pub params: ShaderParams,
}

impl VisualElement {
    /// World transform (scale, then rotation, then translation)
    pub fn model_matrix(&self) -> Mat4 {
        // Wrap before narrowing so large accumulated angles keep their precision
        let angle = |radians: f64| radians.rem_euclid(TAU) as f32;
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            angle(self.rotation.x),
            angle(self.rotation.y),
            angle(self.rotation.z),
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

/// Fixed-size collection of cubes sharing one mesh
#[derive(Debug, Clone)]
pub struct ElementField {
    elements: Vec<VisualElement>,
}

impl ElementField {
    /// Scatter `count` cubes uniformly inside a cube of side `extent` centred at the origin
    ///
    /// Each element gets a random X/Y rotation in `[0, 2π)` and a 1-based id.
    pub fn build<R: Rng>(count: usize, extent: f32, rng: &mut R) -> Self {
        let half = extent / 2.0;
        let random_coord = |rng: &mut R| rng.random::<f32>() * extent - half;

        let elements = (0..count)
            .map(|i| {
                let position = Vec3::new(
                    random_coord(rng),
                    random_coord(rng),
                    random_coord(rng),
                );
                let rotation = DVec3::new(
                    rng.random_range(0.0..TAU),
                    rng.random_range(0.0..TAU),
                    0.0,
                );

                VisualElement {
                    position,
                    rotation,
                    scale: Vec3::ONE,
                    params: ShaderParams {
                        id: i as u32 + 1,
                        total_count: count as u32,
                        color_offset: 0.0,
                    },
                }
            })
            .collect();

        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[VisualElement] {
        &self.elements
    }

    /// Mutable access to elements; the count itself cannot change
    pub fn elements_mut(&mut self) -> &mut [VisualElement] {
        &mut self.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_count() {
        let field = ElementField::build(400, 5000.0, &mut rand::rng());
        assert_eq!(field.len(), 400);
    }

    #[test]
    fn test_build_shader_params() {
        let field = ElementField::build(25, 5000.0, &mut rand::rng());

        for (i, element) in field.elements().iter().enumerate() {
            assert_eq!(element.params.id, i as u32 + 1);
            assert_eq!(element.params.total_count, 25);
            assert_eq!(element.params.color_offset, 0.0);
        }
    }

    #[test]
    fn test_build_placement_bounds() {
        let extent = 5000.0;
        let field = ElementField::build(400, extent, &mut rand::rng());

        for element in field.elements() {
            for coord in element.position.to_array() {
                assert!(
                    (-extent / 2.0..extent / 2.0).contains(&coord),
                    "coordinate {} outside field",
                    coord
                );
            }
            assert!((0.0..TAU).contains(&element.rotation.x));
            assert!((0.0..TAU).contains(&element.rotation.y));
            assert_eq!(element.rotation.z, 0.0);
            assert_eq!(element.scale, Vec3::ONE);
        }
    }

    #[test]
    fn test_model_matrix_translation_and_scale() {
        let element = VisualElement {
            position: Vec3::new(10.0, -20.0, 30.0),
            rotation: DVec3::ZERO,
            scale: Vec3::splat(2.0),
            params: ShaderParams {
                id: 1,
                total_count: 1,
                color_offset: 0.0,
            },
        };

        let moved = element.model_matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!((moved - Vec3::new(12.0, -20.0, 30.0)).length() < 1e-5);
    }

    #[test]
    fn test_model_matrix_wraps_large_angles() {
        let turns = 20_000.0 * TAU;
        let base = VisualElement {
            position: Vec3::ZERO,
            rotation: DVec3::new(0.75, 1.25, 0.0),
            scale: Vec3::ONE,
            params: ShaderParams {
                id: 1,
                total_count: 1,
                color_offset: 0.0,
            },
        };
        let spun = VisualElement {
            rotation: base.rotation + DVec3::new(turns, turns, 0.0),
            ..base.clone()
        };

        let point = Vec3::new(1.0, 2.0, 3.0);
        let a = base.model_matrix().transform_point3(point);
        let b = spun.model_matrix().transform_point3(point);
        assert!((a - b).length() < 1e-3, "{} vs {}", a, b);
    }
}
