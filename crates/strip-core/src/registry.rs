//! Owner of every audio channel and the only place their state changes.
//!
//! Callers express intent (activate, duck, restore); the registry turns it into
//! fade jobs and play/pause commands. Volumes reach the outputs only from
//! [`AudioChannelRegistry::tick`] or from a channel (re)start.

use crate::channel::{BackgroundRule, Channel, ChannelKey, PlayableChannel};
use crate::config::Tuning;
use crate::fade::FadeScheduler;
use fnv::FnvHashMap;
use smallvec::SmallVec;

/// Levels captured when the mix was ducked.
///
/// Kept for inspection only; restoring always recomputes from the current
/// timeline position because scrolling may have continued meanwhile.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DuckState {
    pub ducked: bool,
    pub saved_targets: SmallVec<[(ChannelKey, f32); 8]>,
}

impl DuckState {
    pub fn saved(&self, key: ChannelKey) -> Option<f32> {
        self.saved_targets
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }
}

pub struct AudioChannelRegistry<P> {
    background: Channel<P>,
    ambients: Vec<Channel<P>>,
    by_name: FnvHashMap<String, usize>,
    rule: BackgroundRule,
    tuning: Tuning,
    fades: FadeScheduler<ChannelKey>,
    master: f32,
    muted: bool,
    position: f32,
    ducked: bool,
}

impl<P: PlayableChannel> AudioChannelRegistry<P> {
    pub fn new(
        background: Channel<P>,
        ambients: Vec<Channel<P>>,
        rule: BackgroundRule,
        tuning: Tuning,
    ) -> Self {
        let by_name = ambients
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        Self {
            background,
            ambients,
            by_name,
            rule,
            fades: FadeScheduler::new(tuning.fade_epsilon),
            tuning,
            master: 1.0,
            muted: false,
            position: 0.0,
            ducked: false,
        }
    }

    // ---------------- Queries ----------------

    pub fn background(&self) -> &Channel<P> {
        &self.background
    }

    pub fn ambients(&self) -> &[Channel<P>] {
        &self.ambients
    }

    pub fn ambient(&self, name: &str) -> Option<&Channel<P>> {
        self.by_name.get(name).map(|&i| &self.ambients[i])
    }

    pub fn ambient_key(&self, name: &str) -> Option<ChannelKey> {
        self.by_name.get(name).map(|&i| ChannelKey::Ambient(i))
    }

    pub fn channel(&self, key: ChannelKey) -> Option<&Channel<P>> {
        match key {
            ChannelKey::Master => None,
            ChannelKey::Background => Some(&self.background),
            ChannelKey::Ambient(i) => self.ambients.get(i),
        }
    }

    pub fn fades(&self) -> &FadeScheduler<ChannelKey> {
        &self.fades
    }

    pub fn master_level(&self) -> f32 {
        self.master
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_ducked(&self) -> bool {
        self.ducked
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn rule(&self) -> &BackgroundRule {
        &self.rule
    }

    /// Target the background should settle at right now, ignoring any duck.
    pub fn background_level(&self) -> f32 {
        self.rule.level(self.position)
    }

    fn channel_mut(&mut self, key: ChannelKey) -> Option<&mut Channel<P>> {
        match key {
            ChannelKey::Master => None,
            ChannelKey::Background => Some(&mut self.background),
            ChannelKey::Ambient(i) => self.ambients.get_mut(i),
        }
    }

    fn fade_channel(&mut self, key: ChannelKey, target: f32, duration_ms: u32) {
        let Some(ch) = self.channel_mut(key) else {
            return;
        };
        ch.target_volume = target;
        let from = ch.current_volume;
        self.fades.start_fade(key, from, target, duration_ms);
    }

    // ---------------- Background ----------------

    /// Start the score from silence and fade it up to the level for the current
    /// position. Does nothing if it is already playing.
    pub fn start_background(&mut self) -> bool {
        if self.background.is_playing {
            return false;
        }
        self.background.wanted = true;
        if let Err(e) = self.background.start(false) {
            log::info!("[audio] background blocked until user interaction: {}", e);
            return false;
        }
        let target = self.ducked_level(self.background_level());
        log::info!("[audio] background started, fading in to {:.2}", target);
        self.fade_channel(
            ChannelKey::Background,
            target,
            self.tuning.background_intro_fade_ms,
        );
        true
    }

    /// Ramp the background to `volume`. The target is recorded even while the
    /// channel is stopped so a later start lands on it. While ducked the ramp
    /// stops at the floor; `restore_all` brings the level back.
    pub fn set_background_target(&mut self, volume: f32, duration_ms: u32) {
        if self.background.is_playing {
            let target = self.ducked_level(volume);
            self.fade_channel(ChannelKey::Background, target, duration_ms);
        } else {
            self.background.target_volume = volume;
        }
    }

    /// Record the latest timeline position and re-evaluate the background
    /// level. A new ramp is only issued when the level moved by more than the
    /// dead-zone, so the ramp is not restarted on every frame.
    pub fn set_position(&mut self, position: f32) {
        self.position = position;
        if self.ducked || !self.background.is_playing {
            return;
        }
        let level = self.background_level();
        if (level - self.background.target_volume).abs() > self.tuning.background_retarget_deadzone
        {
            log::debug!(
                "[audio] background retarget {:.2} -> {:.2} at {:.2}",
                self.background.target_volume,
                level,
                position
            );
            self.set_background_target(level, self.tuning.background_retarget_ms);
        }
    }

    // ---------------- Ambients ----------------

    /// Start an ambient soundscape from the top with a short fade-in.
    ///
    /// Already sounding: nothing happens. Still audible but fading out: the
    /// fade is turned around without restarting the source.
    pub fn activate_ambient(&mut self, name: &str) -> bool {
        let Some(&idx) = self.by_name.get(name) else {
            log::warn!("[audio] activate: unknown ambient `{}`", name);
            return false;
        };
        let key = ChannelKey::Ambient(idx);
        let fade_in = self.tuning.ambient_fade_in_ms;
        let target = self.ducked_level(self.ambients[idx].base_volume);
        let ch = &mut self.ambients[idx];
        ch.wanted = true;
        if ch.is_playing {
            if ch.target_volume > 0.0 {
                return false;
            }
            log::info!("[audio] {} re-entered while fading out", ch.name);
            self.fade_channel(key, target, fade_in);
            return true;
        }
        if let Err(e) = ch.start(true) {
            log::warn!("[audio] {} could not start: {}", ch.name, e);
            return false;
        }
        log::info!("[audio] starting {} - fade in", ch.name);
        self.fade_channel(key, target, fade_in);
        true
    }

    /// Fade an ambient soundscape out; the scheduler pauses it once silent.
    pub fn deactivate_ambient(&mut self, name: &str) -> bool {
        let Some(&idx) = self.by_name.get(name) else {
            log::warn!("[audio] deactivate: unknown ambient `{}`", name);
            return false;
        };
        let ch = &mut self.ambients[idx];
        ch.wanted = false;
        ch.rejected = false;
        if !ch.is_playing {
            return false;
        }
        log::info!("[audio] stopping {} - fade out", ch.name);
        self.fade_channel(
            ChannelKey::Ambient(idx),
            0.0,
            self.tuning.ambient_fade_out_ms,
        );
        true
    }

    // ---------------- Ducking ----------------

    fn ducked_level(&self, level: f32) -> f32 {
        if self.ducked {
            level.min(self.tuning.duck_floor)
        } else {
            level
        }
    }

    fn audible_keys(&self) -> SmallVec<[ChannelKey; 8]> {
        let mut keys = SmallVec::new();
        if self.background.is_playing {
            keys.push(ChannelKey::Background);
        }
        for (i, ch) in self.ambients.iter().enumerate() {
            if ch.is_playing {
                keys.push(ChannelKey::Ambient(i));
            }
        }
        keys
    }

    /// Pull every sounding channel down to the near-silent floor. Channels that
    /// are already on their way below the floor (fading out) are left alone.
    pub fn duck_all(&mut self, duration_ms: u32) -> DuckState {
        let floor = self.tuning.duck_floor;
        let mut state = DuckState {
            ducked: true,
            saved_targets: SmallVec::new(),
        };
        for key in self.audible_keys() {
            let Some(target) = self.channel(key).map(|c| c.target_volume) else {
                continue;
            };
            if target <= floor {
                continue;
            }
            state.saved_targets.push((key, target));
            self.fade_channel(key, floor, duration_ms);
        }
        self.ducked = true;
        log::info!(
            "[audio] ducked {} channel(s) to {:.2}",
            state.saved_targets.len(),
            floor
        );
        state
    }

    /// Bring the mix back to the levels that match the current position.
    pub fn restore_all(&mut self, duration_ms: u32) {
        self.ducked = false;
        if self.background.is_playing {
            let level = self.background_level();
            self.fade_channel(ChannelKey::Background, level, duration_ms);
        }
        for i in 0..self.ambients.len() {
            let ch = &self.ambients[i];
            if ch.is_playing && ch.wanted {
                let base = ch.base_volume;
                self.fade_channel(ChannelKey::Ambient(i), base, duration_ms);
            }
        }
        log::info!("[audio] restored mix at position {:.2}", self.position);
    }

    // ---------------- Master ----------------

    /// Toggle the master mute with a short ramp. Channels keep playing.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        let target = if self.muted { 0.0 } else { 1.0 };
        self.fades.start_fade(
            ChannelKey::Master,
            self.master,
            target,
            self.tuning.mute_fade_ms,
        );
        log::info!("[audio] master {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    // ---------------- Recovery ----------------

    /// Retry every channel that should be sounding but whose play was refused.
    /// Call only from a user-interaction handler.
    pub fn retry_playback(&mut self) -> usize {
        let mut started = 0;
        if self.background.wanted && !self.background.is_playing && self.start_background() {
            started += 1;
        }
        for i in 0..self.ambients.len() {
            let ch = &self.ambients[i];
            if ch.wanted && !ch.is_playing {
                let name = ch.name.clone();
                if self.activate_ambient(&name) {
                    started += 1;
                }
            }
        }
        if started > 0 {
            log::info!("[audio] user interaction restarted {} channel(s)", started);
        }
        started
    }

    // ---------------- Tick ----------------

    /// Advance all fades by `dt_ms`, push volumes to the outputs and collect
    /// asynchronous playback failures.
    pub fn tick(&mut self, dt_ms: f32) {
        for key in self.audible_keys() {
            let Some(ch) = self.channel_mut(key) else {
                continue;
            };
            if let Some(err) = ch.output.take_error() {
                log::warn!("[audio] {} stopped: {}", ch.name, err);
                ch.is_playing = false;
                ch.rejected = true;
                ch.current_volume = 0.0;
                self.fades.cancel(key);
            }
        }

        let steps = self.fades.advance(dt_ms);
        let mut master_changed = false;
        for step in &steps {
            if step.channel == ChannelKey::Master {
                self.master = step.volume;
                master_changed = true;
                continue;
            }
            let master = self.master;
            let Some(ch) = self.channel_mut(step.channel) else {
                continue;
            };
            ch.current_volume = step.volume;
            ch.push_volume(master);
            if step.should_pause() {
                log::debug!("[audio] {} silent, pausing", ch.name);
                ch.stop();
            }
        }
        if master_changed {
            let master = self.master;
            self.background.push_volume(master);
            for ch in &mut self.ambients {
                ch.push_volume(master);
            }
        }
    }

    /// Stop everything and forget pending ramps.
    pub fn shutdown(&mut self) {
        self.fades.cancel_all();
        self.ducked = false;
        for ch in std::iter::once(&mut self.background).chain(self.ambients.iter_mut()) {
            ch.stop();
            ch.output.rewind();
            ch.output.set_volume(0.0);
            ch.current_volume = 0.0;
            ch.target_volume = 0.0;
            ch.wanted = false;
            ch.rejected = false;
        }
        log::info!("[audio] all channels stopped");
    }
}
