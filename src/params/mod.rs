//! Parameter definitions with units and documented semantics.
//!
//! All tunable numbers live here with:
//! - Units (world units, seconds, degrees, decibels)
//! - Defaults matching the reference look of the piece
//! - Validation before anything is opened

mod audio;
mod camera;
mod field;
mod render;

// Re-export all types
pub use audio::AnalyserConfig;
pub use camera::OrbitParams;
pub use field::{DriveMapping, FieldConfig};
pub use render::{LightRig, RenderConfig};

use crate::error::ConfigError;

/// Complete visualizer configuration
#[derive(Debug, Clone, Default)]
pub struct VisualizerConfig {
    pub analyser: AnalyserConfig,
    pub field: FieldConfig,
    pub drive: DriveMapping,
    pub orbit: OrbitParams,
    pub render: RenderConfig,
}

impl VisualizerConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analyser.validate()?;
        self.drive.validate(self.analyser.frequency_bin_count())?;

        if self.field.box_count == 0 {
            return Err(ConfigError::BoxCount);
        }
        if self.orbit.distance.is_nan() || self.orbit.distance <= 0.0 {
            return Err(ConfigError::Distance(self.orbit.distance));
        }
        if self.render.window_width == 0 || self.render.window_height == 0 {
            return Err(ConfigError::WindowSize {
                width: self.render.window_width,
                height: self.render.window_height,
            });
        }
        Ok(())
    }
}
