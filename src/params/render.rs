//! Window, rendering and scene lighting configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Initial window width (logical pixels)
    pub window_width: u32,

    /// Initial window height (logical pixels)
    pub window_height: u32,

    /// Borderless fullscreen on the current monitor
    pub fullscreen: bool,

    /// Background color (linear RGB)
    pub clear_color: [f32; 3],

    /// MSAA sample count (1 disables antialiasing)
    pub msaa_samples: u32,

    /// Distance where fog starts (world units)
    pub fog_near: f32,

    /// Distance where fog fully hides geometry (world units)
    pub fog_far: f32,

    pub lights: LightRig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fullscreen: false,
            clear_color: [0.0, 0.0, 0.0],
            msaa_samples: 4,
            fog_near: 1.0,
            fog_far: 10000.0,
            lights: LightRig::default(),
        }
    }
}

/// Scene lights (directional + ambient + hemisphere)
#[derive(Debug, Clone)]
pub struct LightRig {
    /// Direction towards the directional light
    pub directional_dir: [f32; 3],
    pub directional_intensity: f32,

    pub ambient_intensity: f32,

    /// Hemisphere light colors (sky above, ground below)
    pub hemisphere_sky: [f32; 3],
    pub hemisphere_ground: [f32; 3],
    pub hemisphere_intensity: f32,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            directional_dir: [0.0, 1.0, 1.0],
            directional_intensity: 0.5,
            ambient_intensity: 0.5,
            hemisphere_sky: [1.0, 1.0, 1.0],
            hemisphere_ground: [0.2, 0.2, 0.2], // 0x333333
            hemisphere_intensity: 0.5,
        }
    }
}
