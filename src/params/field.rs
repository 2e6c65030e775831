//! Cube field layout and audio-to-motion mapping.

use crate::error::ConfigError;

/// Cube field parameters
#[derive(Debug, Clone)]
pub struct FieldConfig {
    /// Number of cubes (fixed for the whole run)
    pub box_count: usize,

    /// Cube edge length (world units)
    pub box_size: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            box_count: 400,
            box_size: 100.0,
        }
    }
}

/// Mapping from one analysis bin to the per-frame drive value
///
/// `v = clamp(bin / 255 * gain, min_drive, max_drive)`
#[derive(Debug, Clone)]
pub struct DriveMapping {
    /// Analysis bin sampled each frame
    pub bin: usize,

    /// Scale applied to the normalized bin magnitude
    pub gain: f32,

    /// Lower clamp of the drive value
    pub min_drive: f32,

    /// Upper clamp of the drive value
    pub max_drive: f32,

    /// Rotation rate per unit drive (radians per second)
    pub spin_rate: f32,

    /// Shader color offset per unit drive
    pub color_offset_scale: f32,
}

impl Default for DriveMapping {
    fn default() -> Self {
        Self {
            bin: 10,
            gain: 3.0,
            min_drive: 0.5,
            max_drive: 3.0,
            spin_rate: 2.0,
            color_offset_scale: 0.1,
        }
    }
}

impl DriveMapping {
    /// Drive value for a raw bin magnitude
    pub fn drive_value(&self, magnitude: u8) -> f32 {
        (magnitude as f32 / 255.0 * self.gain).clamp(self.min_drive, self.max_drive)
    }

    pub fn validate(&self, bin_count: usize) -> Result<(), ConfigError> {
        if self.bin >= bin_count {
            return Err(ConfigError::DriveBin {
                bin: self.bin,
                bins: bin_count,
            });
        }
        if self.min_drive > self.max_drive {
            return Err(ConfigError::DriveRange {
                min: self.min_drive,
                max: self.max_drive,
            });
        }
        Ok(())
    }
}
