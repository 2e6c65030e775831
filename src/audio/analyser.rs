//! FFT magnitude analyser producing a byte spectrum per poll.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use super::FrequencySnapshot;
use crate::params::AnalyserConfig;

/// Windowed FFT with temporal smoothing and decibel-to-byte mapping
pub struct FrequencyAnalyser {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    /// Smoothed linear magnitudes, one per bin
    smoothed: Vec<f32>,
    snapshot: FrequencySnapshot,
    smoothing: f32,
    min_decibels: f32,
    max_decibels: f32,
}

impl FrequencyAnalyser {
    /// Create analyser for a validated configuration
    pub fn new(config: &AnalyserConfig) -> Self {
        let size = config.fft_size;
        let bins = config.frequency_bin_count();

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);

        Self {
            fft,
            window: (0..size).map(|i| blackman_window(i, size)).collect(),
            buffer: vec![Complex::new(0.0, 0.0); size],
            smoothed: vec![0.0; bins],
            snapshot: FrequencySnapshot::new(bins),
            smoothing: config.smoothing_time_constant,
            min_decibels: config.min_decibels,
            max_decibels: config.max_decibels,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.window.len()
    }

    /// Analyse one window of time-domain samples and refresh the snapshot
    ///
    /// `samples` shorter than the window are zero-padded at the end, longer
    /// ones are truncated.
    pub fn process(&mut self, samples: &[f32]) -> &FrequencySnapshot {
        let size = self.fft_size();

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = samples.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.buffer);

        let scale = 1.0 / size as f32;
        let range = self.max_decibels - self.min_decibels;
        let tau = self.smoothing;

        for ((smoothed, byte), value) in self
            .smoothed
            .iter_mut()
            .zip(self.snapshot.bins_mut().iter_mut())
            .zip(self.buffer.iter())
        {
            let magnitude = value.norm() * scale;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;
            *byte = magnitude_to_byte(*smoothed, self.min_decibels, range);
        }

        &self.snapshot
    }
}

/// Blackman window function (periodic form)
pub fn blackman_window(index: usize, size: usize) -> f32 {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;
    let phase = 2.0 * PI * index as f32 / size as f32;
    A0 - A1 * phase.cos() + A2 * (2.0 * phase).cos()
}

fn magnitude_to_byte(magnitude: f32, min_decibels: f32, range: f32) -> u8 {
    if magnitude.is_nan() || magnitude <= 0.0 {
        return 0;
    }
    let db = 20.0 * magnitude.log10();
    let scaled = (255.0 / range * (db - min_decibels)).floor();
    scaled.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_at_bin(bin: usize, size: usize, amplitude: f32) -> Vec<f32> {
        (0..size)
            .map(|n| amplitude * (2.0 * PI * bin as f32 * n as f32 / size as f32).sin())
            .collect()
    }

    fn peak_bin(snapshot: &FrequencySnapshot) -> usize {
        snapshot
            .bins()
            .iter()
            .enumerate()
            .max_by_key(|(_, value)| **value)
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn test_blackman_window() {
        let size = 1024;

        // Zero at the start, one at the centre
        assert!(blackman_window(0, size).abs() < 1e-6);
        assert!((blackman_window(size / 2, size) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_snapshot_length() {
        let mut analyser = FrequencyAnalyser::new(&AnalyserConfig::default());
        let snapshot = analyser.process(&[0.0; 1024]);
        assert_eq!(snapshot.len(), 512);
    }

    #[test]
    fn test_silence_is_all_zero() {
        let mut analyser = FrequencyAnalyser::new(&AnalyserConfig::default());
        let snapshot = analyser.process(&[0.0; 1024]);
        assert!(snapshot.bins().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_sine_peaks_at_its_bin() {
        let mut analyser = FrequencyAnalyser::new(&AnalyserConfig::default());
        let samples = sine_at_bin(10, 1024, 0.1);
        let snapshot = analyser.process(&samples);

        assert_eq!(peak_bin(snapshot), 10);
        assert!(snapshot.bin(10) > 0);
        assert_eq!(snapshot.bin(200), 0);
    }

    #[test]
    fn test_smoothing_rises_towards_steady_tone() {
        let mut analyser = FrequencyAnalyser::new(&AnalyserConfig::default());
        let samples = sine_at_bin(10, 1024, 0.01);

        let first = analyser.process(&samples).bin(10);
        let second = analyser.process(&samples).bin(10);
        assert!(second > first, "{} should exceed {}", second, first);
    }

    #[test]
    fn test_without_smoothing_repeat_is_stable() {
        let config = AnalyserConfig {
            smoothing_time_constant: 0.0,
            ..Default::default()
        };
        let mut analyser = FrequencyAnalyser::new(&config);
        let samples = sine_at_bin(40, 1024, 0.05);

        let first = analyser.process(&samples).clone();
        let second = analyser.process(&samples);
        assert_eq!(&first, second);
    }

    #[test]
    fn test_magnitude_to_byte_range() {
        // Below -100 dB clamps to 0, above -30 dB clamps to 255
        assert_eq!(magnitude_to_byte(1e-6, -100.0, 70.0), 0);
        assert_eq!(magnitude_to_byte(0.1, -100.0, 70.0), 255);
        assert_eq!(magnitude_to_byte(1.0, -100.0, 70.0), 255);

        // -65 dB sits half way
        let half = magnitude_to_byte(10f32.powf(-65.0 / 20.0), -100.0, 70.0);
        assert!((126..=128).contains(&half));
        assert_eq!(magnitude_to_byte(0.0, -100.0, 70.0), 0);
    }
}
