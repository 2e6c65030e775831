//! Audio analysis configuration.

use crate::error::ConfigError;

/// Frequency analyser configuration
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// Analysis window size in samples (must be power of 2)
    /// Yields `fft_size / 2` frequency bins per snapshot
    pub fft_size: usize,

    /// Temporal smoothing between successive snapshots (0 = none, 1 = frozen)
    pub smoothing_time_constant: f32,

    /// Magnitude mapped to byte 0 (decibels)
    pub min_decibels: f32,

    /// Magnitude mapped to byte 255 (decibels)
    pub max_decibels: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 1024,
            smoothing_time_constant: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyserConfig {
    /// Number of frequency bins in each snapshot
    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Centre frequency of an analysis bin (Hz) at the given sample rate
    pub fn bin_to_hz(&self, bin: usize, sample_rate_hz: u32) -> f32 {
        bin as f32 * sample_rate_hz as f32 / self.fft_size as f32
    }

    /// Validate configuration (window size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fft_size < 32 || !self.fft_size.is_power_of_two() {
            return Err(ConfigError::FftSize(self.fft_size));
        }
        if !(0.0..=1.0).contains(&self.smoothing_time_constant) {
            return Err(ConfigError::Smoothing(self.smoothing_time_constant));
        }
        if self.min_decibels >= self.max_decibels {
            return Err(ConfigError::DecibelRange {
                min: self.min_decibels,
                max: self.max_decibels,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bin_count() {
        let config = AnalyserConfig::default();
        assert_eq!(config.frequency_bin_count(), 512);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bin_to_hz() {
        let config = AnalyserConfig::default();

        // 44100 Hz / 1024 ≈ 43.07 Hz per bin
        assert_eq!(config.bin_to_hz(0, 44100), 0.0);
        assert!((config.bin_to_hz(10, 44100) - 430.66).abs() < 0.01);
    }

    #[test]
    fn test_rejects_bad_window() {
        let config = AnalyserConfig {
            fft_size: 1000,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::FftSize(1000))));
    }

    #[test]
    fn test_rejects_inverted_decibel_range() {
        let config = AnalyserConfig {
            min_decibels: -30.0,
            max_decibels: -100.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
