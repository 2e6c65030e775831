//! Drawing-surface sizing.

use log::debug;

use crate::camera::OrbitCamera;

/// Drawing-buffer size and pixel ratio of the drawing surface
///
/// The window reports physical pixels, so the drawing buffer is stored as-is
/// and the logical canvas size is derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    buffer_width: u32,
    buffer_height: u32,
    pixel_ratio: f64,
}

impl Viewport {
    pub fn new(buffer_width: u32, buffer_height: u32, pixel_ratio: f64) -> Self {
        Self {
            buffer_width,
            buffer_height,
            pixel_ratio,
        }
    }

    /// Match the window and refresh the camera projection
    ///
    /// Takes the window's physical size. Zero-sized windows (minimized) are
    /// ignored. Returns whether anything changed.
    pub fn resize(
        &mut self,
        buffer_width: u32,
        buffer_height: u32,
        pixel_ratio: f64,
        camera: &mut OrbitCamera,
    ) -> bool {
        if buffer_width == 0 || buffer_height == 0 {
            debug!("Ignoring resize to {}x{}", buffer_width, buffer_height);
            return false;
        }

        self.pixel_ratio = pixel_ratio;
        self.buffer_width = buffer_width;
        self.buffer_height = buffer_height;

        camera.set_aspect(self.aspect_ratio());
        camera.update_projection_matrix();
        true
    }

    /// Canvas size in logical pixels
    pub fn size(&self) -> (f64, f64) {
        (
            self.buffer_width as f64 / self.pixel_ratio,
            self.buffer_height as f64 / self.pixel_ratio,
        )
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.buffer_width as f32 / self.buffer_height as f32
    }

    /// Drawing-buffer size in physical pixels, identical to the surface size
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        (self.buffer_width, self.buffer_height)
    }
}
