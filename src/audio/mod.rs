//! Microphone capture and frequency analysis.
//!
//! A cpal input stream feeds a shared sample ring; each frame the render
//! thread polls a [`FrequencySource`] which runs the FFT on the most recent
//! window and returns a byte spectrum.

mod analyser;
mod ring;
mod system;

// Re-export public types
pub use analyser::{blackman_window, FrequencyAnalyser};
pub use ring::SampleRing;
pub use system::{list_input_devices, MicrophoneCapability, MicrophoneStream};

use crate::error::AccessError;

/// Byte magnitudes per analysis bin, refreshed in place on every poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencySnapshot {
    bins: Vec<u8>,
}

impl FrequencySnapshot {
    /// Silent snapshot with `bin_count` bins
    pub fn new(bin_count: usize) -> Self {
        Self {
            bins: vec![0; bin_count],
        }
    }

    pub fn from_bins(bins: Vec<u8>) -> Self {
        Self { bins }
    }

    /// Magnitude of one bin (0 when out of range)
    pub fn bin(&self, index: usize) -> u8 {
        self.bins.get(index).copied().unwrap_or(0)
    }

    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub(crate) fn bins_mut(&mut self) -> &mut [u8] {
        &mut self.bins
    }
}

/// Anything that can be polled once per frame for the current spectrum
pub trait FrequencySource {
    /// Overwrite and return the current snapshot
    fn sample(&mut self) -> &FrequencySnapshot;
}

/// Permission-gated access to an audio input
pub trait AudioCapability {
    /// Whether the host offers any audio input at all
    fn is_supported(&self) -> bool;

    /// Request a live stream; failures are terminal
    fn request_access(&self) -> Result<Box<dyn FrequencySource>, AccessError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_out_of_range_bin_reads_zero() {
        let snapshot = FrequencySnapshot::from_bins(vec![7, 8, 9]);
        assert_eq!(snapshot.bin(2), 9);
        assert_eq!(snapshot.bin(10), 0);
        assert_eq!(snapshot.len(), 3);
    }
}
