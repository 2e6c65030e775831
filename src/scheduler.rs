//! Single-in-flight frame scheduling.

/// Redraw scheduler with at most one pending frame
///
/// The animation step consumes the pending frame with [`take`](Self::take)
/// and re-arms it when done. [`cancel`](Self::cancel) stops the loop for good.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: bool,
    cancelled: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the next frame
    ///
    /// Returns `true` only when a new frame was armed, so the caller should
    /// request exactly one redraw from the host.
    pub fn arm(&mut self) -> bool {
        if self.cancelled || self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Begin the pending frame, if any
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Stop scheduling permanently and drop any pending frame
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
