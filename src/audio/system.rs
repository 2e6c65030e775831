//! Microphone capability backed by a cpal input stream.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};

use super::analyser::FrequencyAnalyser;
use super::ring::SampleRing;
use super::{AudioCapability, FrequencySnapshot, FrequencySource};
use crate::error::AccessError;
use crate::params::AnalyserConfig;

/// Audio input capability of the default cpal host
pub struct MicrophoneCapability {
    /// Substring of the input device name; default device when `None`
    device_name: Option<String>,
    analyser: AnalyserConfig,
}

impl MicrophoneCapability {
    pub fn new(device_name: Option<String>, analyser: AnalyserConfig) -> Self {
        Self {
            device_name,
            analyser,
        }
    }

    fn select_device(&self, host: &cpal::Host) -> Option<cpal::Device> {
        match self.device_name.as_deref() {
            None => host.default_input_device(),
            Some(wanted) => host.input_devices().ok()?.find(|device| {
                device
                    .name()
                    .map(|name| name.contains(wanted))
                    .unwrap_or(false)
            }),
        }
    }
}

impl AudioCapability for MicrophoneCapability {
    fn is_supported(&self) -> bool {
        cpal::default_host()
            .input_devices()
            .map(|mut devices| devices.next().is_some())
            .unwrap_or(false)
    }

    fn request_access(&self) -> Result<Box<dyn FrequencySource>, AccessError> {
        let host = cpal::default_host();
        let device = self.select_device(&host).ok_or_else(|| match &self.device_name {
            Some(wanted) => AccessError::Denied(format!("no input device matching '{}'", wanted)),
            None => AccessError::Unsupported,
        })?;

        let config = device
            .default_input_config()
            .map_err(|e| AccessError::Denied(format!("failed to get input config: {}", e)))?;

        info!(
            "Audio: {} @ {}Hz, {} channel(s), {:?}",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            config.sample_rate().0,
            config.channels(),
            config.sample_format()
        );

        if config.channels() == 0 {
            return Err(AccessError::InvalidStream(
                "input reports zero channels".to_string(),
            ));
        }

        let ring = Arc::new(Mutex::new(SampleRing::new(self.analyser.fft_size)));
        let stream_config: cpal::StreamConfig = config.clone().into();

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_input_stream::<f32>(&device, &stream_config, Arc::clone(&ring))
            }
            cpal::SampleFormat::I16 => {
                build_input_stream::<i16>(&device, &stream_config, Arc::clone(&ring))
            }
            cpal::SampleFormat::U16 => {
                build_input_stream::<u16>(&device, &stream_config, Arc::clone(&ring))
            }
            other => {
                return Err(AccessError::InvalidStream(format!(
                    "unsupported sample format {:?}",
                    other
                )))
            }
        }
        .map_err(|e| match e {
            cpal::BuildStreamError::StreamConfigNotSupported
            | cpal::BuildStreamError::InvalidArgument => {
                AccessError::InvalidStream(e.to_string())
            }
            other => AccessError::Denied(format!("failed to build input stream: {}", other)),
        })?;

        stream
            .play()
            .map_err(|e| AccessError::Denied(format!("failed to start input stream: {}", e)))?;

        debug!(
            "Analysis: {} bins, {:.1} Hz per bin",
            self.analyser.frequency_bin_count(),
            self.analyser.bin_to_hz(1, config.sample_rate().0)
        );

        Ok(Box::new(MicrophoneStream {
            window: vec![0.0; self.analyser.fft_size],
            analyser: FrequencyAnalyser::new(&self.analyser),
            ring,
            _stream: stream,
        }))
    }
}

/// Live microphone stream polled once per frame
pub struct MicrophoneStream {
    ring: Arc<Mutex<SampleRing>>,
    analyser: FrequencyAnalyser,
    /// Scratch copy of the latest window
    window: Vec<f32>,
    /// Input stream (kept alive)
    _stream: cpal::Stream,
}

impl FrequencySource for MicrophoneStream {
    fn sample(&mut self) -> &FrequencySnapshot {
        if let Ok(ring) = self.ring.lock() {
            ring.copy_latest(&mut self.window);
        }
        self.analyser.process(&self.window)
    }
}

/// Build an input stream that downmixes each frame to mono into `ring`
fn build_input_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    ring: Arc<Mutex<SampleRing>>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = config.channels as usize;
    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            if let Ok(mut ring) = ring.lock() {
                ring.extend(data.chunks_exact(channels).map(|frame| {
                    frame.iter().map(|s| s.to_sample::<f32>()).sum::<f32>() / channels as f32
                }));
            }
        },
        |err| warn!("Audio input error: {}", err),
        None,
    )
}

/// Names of all input devices on the default host
pub fn list_input_devices() -> Vec<String> {
    match cpal::default_host().input_devices() {
        Ok(devices) => devices.filter_map(|device| device.name().ok()).collect(),
        Err(e) => {
            warn!("Failed to enumerate input devices: {}", e);
            Vec::new()
        }
    }
}
