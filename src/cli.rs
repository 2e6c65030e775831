//! Command-line argument parsing.

use clap::Parser;

use crate::params::VisualizerConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "cubepulse")]
#[command(about = "Microphone-reactive field of spinning cubes", long_about = None)]
pub struct Args {
    /// Number of cubes in the field
    #[arg(long, value_name = "N", default_value_t = 400)]
    pub boxes: usize,

    /// Camera orbit radius, also the side of the field's bounding cube
    #[arg(long, value_name = "UNITS", default_value_t = 5000.0)]
    pub distance: f32,

    /// Camera orbit speed
    #[arg(long, value_name = "DEG_PER_S", default_value_t = 10.0)]
    pub orbit_speed: f32,

    /// Input device (substring of its name); default input when omitted
    #[arg(long, value_name = "NAME")]
    pub device: Option<String>,

    /// Initial window width (logical pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 1280)]
    pub width: u32,

    /// Initial window height (logical pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 720)]
    pub height: u32,

    /// Borderless fullscreen on the current monitor
    #[arg(long)]
    pub fullscreen: bool,

    /// Print available input devices and exit
    #[arg(long)]
    pub list_devices: bool,
}

impl Args {
    /// Build the visualizer configuration from defaults and flags
    pub fn to_config(&self) -> VisualizerConfig {
        let mut config = VisualizerConfig::default();
        config.field.box_count = self.boxes;
        config.orbit.distance = self.distance;
        config.orbit.angular_speed_deg_per_s = self.orbit_speed;
        config.render.window_width = self.width;
        config.render.window_height = self.height;
        config.render.fullscreen = self.fullscreen;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_params() {
        let args = Args::parse_from(["cubepulse"]);
        let config = args.to_config();

        assert_eq!(config.field.box_count, 400);
        assert_eq!(config.orbit.distance, 5000.0);
        assert_eq!(config.orbit.angular_speed_deg_per_s, 10.0);
        assert_eq!(config.render.window_width, 1280);
        assert!(!config.render.fullscreen);
        assert!(args.device.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_override() {
        let args = Args::parse_from([
            "cubepulse",
            "--boxes",
            "64",
            "--distance",
            "1200",
            "--device",
            "USB",
            "--fullscreen",
        ]);
        let config = args.to_config();

        assert_eq!(config.field.box_count, 64);
        assert_eq!(config.orbit.distance, 1200.0);
        assert!(config.render.fullscreen);
        assert_eq!(args.device.as_deref(), Some("USB"));
    }

    #[test]
    fn test_zero_boxes_fails_validation() {
        let config = Args::parse_from(["cubepulse", "--boxes", "0"]).to_config();
        assert!(config.validate().is_err());
    }
}
