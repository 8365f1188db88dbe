//! Generic tick-driven volume ramps.
//!
//! One live job per channel key. Starting a fade on a key replaces whatever was
//! running there, so two ramps can never fight over the same channel.

use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeJob<K> {
    pub channel: K,
    pub start_volume: f32,
    pub target_volume: f32,
    pub duration_ms: f32,
    pub elapsed_ms: f32,
}

impl<K: Copy> FadeJob<K> {
    /// Linear interpolation at the current elapsed time, never past the target.
    #[inline]
    pub fn value(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return self.target_volume;
        }
        let t = (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0);
        self.start_volume + (self.target_volume - self.start_volume) * t
    }
}

/// Result of advancing one job by one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeStep<K> {
    pub channel: K,
    pub volume: f32,
    pub finished: bool,
}

impl<K> FadeStep<K> {
    /// A ramp that lands on silence should stop the source, not just mute it.
    #[inline]
    pub fn should_pause(&self) -> bool {
        self.finished && self.volume == 0.0
    }
}

pub type FadeSteps<K> = SmallVec<[FadeStep<K>; 10]>;

#[derive(Clone, Debug)]
pub struct FadeScheduler<K> {
    jobs: SmallVec<[FadeJob<K>; 10]>,
    epsilon: f32,
}

impl<K: Copy + PartialEq + std::fmt::Debug> FadeScheduler<K> {
    pub fn new(epsilon: f32) -> Self {
        Self {
            jobs: SmallVec::new(),
            epsilon,
        }
    }

    /// Install a ramp from `from` to `to`, cancelling any ramp already running
    /// on `channel`. Volumes are clamped to [0, 1].
    pub fn start_fade(&mut self, channel: K, from: f32, to: f32, duration_ms: u32) {
        let job = FadeJob {
            channel,
            start_volume: from.clamp(0.0, 1.0),
            target_volume: to.clamp(0.0, 1.0),
            duration_ms: duration_ms as f32,
            elapsed_ms: 0.0,
        };
        match self.jobs.iter_mut().find(|j| j.channel == channel) {
            Some(existing) => {
                log::debug!(
                    "[fade] {:?} replaced ramp to {:.3} with ramp to {:.3}",
                    channel,
                    existing.target_volume,
                    job.target_volume
                );
                *existing = job;
            }
            None => self.jobs.push(job),
        }
    }

    /// Drop the ramp on `channel`, leaving its volume wherever it was.
    pub fn cancel(&mut self, channel: K) -> Option<FadeJob<K>> {
        let idx = self.jobs.iter().position(|j| j.channel == channel)?;
        Some(self.jobs.remove(idx))
    }

    pub fn cancel_all(&mut self) {
        self.jobs.clear();
    }

    pub fn job(&self, channel: K) -> Option<&FadeJob<K>> {
        self.jobs.iter().find(|j| j.channel == channel)
    }

    pub fn is_fading(&self, channel: K) -> bool {
        self.job(channel).is_some()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Advance every live job by `dt_ms` and report the new volumes. Finished
    /// jobs are removed and reported with their exact target.
    pub fn advance(&mut self, dt_ms: f32) -> FadeSteps<K> {
        let mut steps = FadeSteps::new();
        let eps = self.epsilon;
        let dt = dt_ms.max(0.0);
        self.jobs.retain(|job| {
            job.elapsed_ms += dt;
            let mut volume = job.value();
            let finished = job.elapsed_ms >= job.duration_ms
                || (volume - job.target_volume).abs() <= eps;
            if finished {
                volume = job.target_volume;
            }
            steps.push(FadeStep {
                channel: job.channel,
                volume,
                finished,
            });
            !finished
        });
        steps
    }
}
