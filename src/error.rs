//! Error types for audio access, configuration and GPU setup.

use thiserror::Error;

/// Terminal outcome of requesting microphone access
#[derive(Debug, Error)]
pub enum AccessError {
    /// The host exposes no audio input capability at all
    #[error("no audio input capability on this host")]
    Unsupported,

    /// An input device exists but access to it was refused
    #[error("microphone access denied: {0}")]
    Denied(String),

    /// Access succeeded but the stream cannot be analysed
    #[error("invalid input stream: {0}")]
    InvalidStream(String),
}

/// Parameter validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("analysis window must be a power of 2 and at least 32, got {0}")]
    FftSize(usize),

    #[error("smoothing time constant must be within [0, 1], got {0}")]
    Smoothing(f32),

    #[error("decibel range is empty: min {min} >= max {max}")]
    DecibelRange { min: f32, max: f32 },

    #[error("drive bin {bin} is outside the {bins}-bin spectrum")]
    DriveBin { bin: usize, bins: usize },

    #[error("drive clamp is inverted: min {min} > max {max}")]
    DriveRange { min: f32, max: f32 },

    #[error("box count must be at least 1")]
    BoxCount,

    #[error("camera distance must be positive, got {0}")]
    Distance(f32),

    #[error("window size must be non-zero, got {width}x{height}")]
    WindowSize { width: u32, height: u32 },
}

/// GPU initialization failures
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to find suitable GPU adapter")]
    Adapter,

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}
