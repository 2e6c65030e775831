//! Monotonic frame clock.

use std::time::Instant;

/// Timing of one frame (seconds)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Time since the previous tick, never negative
    pub delta: f32,
    /// Time since the first tick
    pub elapsed: f32,
}

/// Clock that starts on its first tick
#[derive(Debug, Default)]
pub struct FrameClock {
    start: Option<Instant>,
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `now` and return the frame timing
    ///
    /// The first tick starts the clock with zero delta. A `now` earlier than
    /// the previous tick yields zero delta and leaves elapsed unchanged.
    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let start = *self.start.get_or_insert(now);
        let last = self.last.unwrap_or(now);

        let delta = now.saturating_duration_since(last).as_secs_f32();
        let current = now.max(last);
        self.last = Some(current);

        FrameTime {
            delta,
            elapsed: current.saturating_duration_since(start).as_secs_f32(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.start.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert!(!clock.is_running());

        let frame = clock.tick(Instant::now());
        assert_eq!(frame, FrameTime::default());
        assert!(clock.is_running());
    }

    #[test]
    fn test_delta_and_elapsed() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick(t0);

        let frame = clock.tick(t0 + Duration::from_millis(16));
        assert!((frame.delta - 0.016).abs() < 1e-6);
        assert!((frame.elapsed - 0.016).abs() < 1e-6);

        let frame = clock.tick(t0 + Duration::from_millis(50));
        assert!((frame.delta - 0.034).abs() < 1e-6);
        assert!((frame.elapsed - 0.050).abs() < 1e-6);
    }

    #[test]
    fn test_backwards_time_never_goes_negative() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick(t0);
        clock.tick(t0 + Duration::from_millis(100));

        let frame = clock.tick(t0 + Duration::from_millis(40));
        assert_eq!(frame.delta, 0.0);
        assert!((frame.elapsed - 0.1).abs() < 1e-6);

        let frame = clock.tick(t0 + Duration::from_millis(120));
        assert!((frame.delta - 0.02).abs() < 1e-6);
    }
}
