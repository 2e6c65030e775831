//! Fixed-capacity history of the most recent mono samples.

use std::collections::VecDeque;

/// Ring of the latest `capacity` samples, written by the capture callback
#[derive(Debug)]
pub struct SampleRing {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SampleRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append samples, dropping the oldest beyond capacity
    pub fn extend(&mut self, samples: impl IntoIterator<Item = f32>) {
        for sample in samples {
            if self.samples.len() == self.capacity {
                self.samples.pop_front();
            }
            self.samples.push_back(sample);
        }
    }

    /// Copy the latest samples into `out`, oldest first
    ///
    /// When fewer samples than `out.len()` have arrived, the front is zero-filled.
    pub fn copy_latest(&self, out: &mut [f32]) {
        let available = self.samples.len().min(out.len());
        let pad = out.len() - available;
        out[..pad].fill(0.0);

        let skip = self.samples.len() - available;
        for (dst, src) in out[pad..].iter_mut().zip(self.samples.iter().skip(skip)) {
            *dst = *src;
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_only_latest() {
        let mut ring = SampleRing::new(4);
        ring.extend((1..=6).map(|i| i as f32));

        assert_eq!(ring.len(), 4);
        let mut out = [0.0; 4];
        ring.copy_latest(&mut out);
        assert_eq!(out, [3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_zero_fills_front_when_short() {
        let mut ring = SampleRing::new(8);
        ring.extend([1.0, 2.0]);

        let mut out = [9.0; 4];
        ring.copy_latest(&mut out);
        assert_eq!(out, [0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_shorter_output_takes_newest() {
        let mut ring = SampleRing::new(8);
        ring.extend([1.0, 2.0, 3.0, 4.0, 5.0]);

        let mut out = [0.0; 2];
        ring.copy_latest(&mut out);
        assert_eq!(out, [4.0, 5.0]);
    }
}
