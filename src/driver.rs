//! Per-frame animation: audio drive value to cube motion and camera orbit.

use crate::audio::FrequencySnapshot;
use crate::camera::OrbitCamera;
use crate::clock::FrameTime;
use crate::field::{ElementField, SharedUniforms};
use crate::params::DriveMapping;

/// Maps one analysis bin to uniform scale, spin and color of every cube
#[derive(Debug, Clone, Default)]
pub struct AnimationDriver {
    mapping: DriveMapping,
}

impl AnimationDriver {
    pub fn new(mapping: DriveMapping) -> Self {
        Self { mapping }
    }

    /// Drive value of a snapshot: `clamp(bin / 255 * gain, min, max)`
    pub fn drive_value(&self, snapshot: &FrequencySnapshot) -> f32 {
        self.mapping.drive_value(snapshot.bin(self.mapping.bin))
    }

    /// Advance the scene by one frame
    ///
    /// Every element gets the same scale and spin; the camera moves along its
    /// orbit and the shared time uniform is updated.
    ///
    /// # Returns
    /// The drive value applied this frame
    pub fn step(
        &self,
        frame: FrameTime,
        snapshot: &FrequencySnapshot,
        field: &mut ElementField,
        camera: &mut OrbitCamera,
        uniforms: &mut SharedUniforms,
    ) -> f32 {
        let v = self.drive_value(snapshot);
        let spin = f64::from(frame.delta) * f64::from(v) * f64::from(self.mapping.spin_rate);

        for (i, element) in field.elements_mut().iter_mut().enumerate() {
            element.scale.x = v;
            element.scale.y = v;
            element.scale.z = v;

            element.rotation.x += spin;
            element.rotation.y += spin;

            // Already set at build time; re-stamped every frame all the same
            element.params.id = i as u32 + 1;
            element.params.color_offset = v * self.mapping.color_offset_scale;
        }

        camera.orbit(frame.elapsed);
        uniforms.time = frame.elapsed;

        v
    }
}
