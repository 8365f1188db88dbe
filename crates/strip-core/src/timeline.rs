//! Scroll-to-timeline smoothing.
//!
//! The camera should glide rather than track the scrollbar 1:1, so the raw
//! scroll target is approached by a fixed fraction of the remaining distance on
//! every frame.

use crate::constants::SMOOTH_FACTOR;

/// Snapshot of the tracker after the most recent tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimelineState {
    pub raw_position: f32,
    pub smoothed_position: f32,
    pub sequence_length: f32,
}

impl TimelineState {
    /// Position the smoothed value is converging toward.
    #[inline]
    pub fn target(&self) -> f32 {
        self.raw_position * self.sequence_length
    }
}

#[derive(Clone, Debug)]
pub struct TimelineTracker {
    alpha: f32,
    state: TimelineState,
}

impl Default for TimelineTracker {
    fn default() -> Self {
        Self::new(SMOOTH_FACTOR)
    }
}

impl TimelineTracker {
    /// `alpha` must lie in (0, 1); config validation enforces this.
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            state: TimelineState::default(),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    pub fn position(&self) -> f32 {
        self.state.smoothed_position
    }

    /// Advance one frame and return the new smoothed position.
    ///
    /// A non-finite input is dropped and the previous position is returned, so
    /// a single bad frame cannot poison the state.
    pub fn tick(&mut self, raw_fraction: f32, sequence_length: f32) -> f32 {
        if !raw_fraction.is_finite() || !sequence_length.is_finite() {
            log::debug!(
                "[timeline] ignoring non-finite input raw={} len={}",
                raw_fraction,
                sequence_length
            );
            return self.state.smoothed_position;
        }
        let target = raw_fraction * sequence_length;
        let prev = self.state.smoothed_position;
        self.state = TimelineState {
            raw_position: raw_fraction,
            smoothed_position: prev + (target - prev) * self.alpha,
            sequence_length,
        };
        self.state.smoothed_position
    }
}
