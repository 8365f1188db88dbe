//! Audio channel records and the output abstraction they drive.

use crate::error::PlaybackRejected;
use serde::{Deserialize, Serialize};

/// Output side of a channel: whatever actually makes sound.
///
/// The web front-end wraps an `HtmlAudioElement`; the native rehearsal logs.
pub trait PlayableChannel {
    fn set_volume(&mut self, volume: f32);

    /// Start or resume playback. An immediate refusal is reported here;
    /// refusals that arrive later go through [`PlayableChannel::take_error`].
    fn play(&mut self) -> Result<(), PlaybackRejected>;

    fn pause(&mut self);

    /// Seek back to the beginning.
    fn rewind(&mut self);

    /// Drain an asynchronous playback failure, if one was reported since the
    /// last call.
    fn take_error(&mut self) -> Option<PlaybackRejected> {
        None
    }
}

impl<T: PlayableChannel + ?Sized> PlayableChannel for Box<T> {
    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume)
    }
    fn play(&mut self) -> Result<(), PlaybackRejected> {
        (**self).play()
    }
    fn pause(&mut self) {
        (**self).pause()
    }
    fn rewind(&mut self) {
        (**self).rewind()
    }
    fn take_error(&mut self) -> Option<PlaybackRejected> {
        (**self).take_error()
    }
}

/// Key used by the fade scheduler. `Master` scales every other channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelKey {
    Master,
    Background,
    Ambient(usize),
}

/// Static definition of one audio source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelDef {
    pub name: String,
    /// Opaque handle for the asset loader (a URL on the web).
    pub source: String,
    #[serde(default = "default_base_volume")]
    pub base_volume: f32,
}

fn default_base_volume() -> f32 {
    crate::constants::AMBIENT_BASE_VOLUME
}

impl ChannelDef {
    pub fn new(name: impl Into<String>, source: impl Into<String>, base_volume: f32) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            base_volume,
        }
    }
}

/// Background level as a step function of timeline position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackgroundRule {
    pub threshold: f32,
    pub before: f32,
    pub after: f32,
}

impl Default for BackgroundRule {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            threshold: BACKGROUND_THRESHOLD,
            before: BACKGROUND_LEVEL_BEFORE,
            after: BACKGROUND_LEVEL_AFTER,
        }
    }
}

impl BackgroundRule {
    #[inline]
    pub fn level(&self, position: f32) -> f32 {
        if position < self.threshold {
            self.before
        } else {
            self.after
        }
    }
}

/// One named source and its mixer state. Mutated only through the registry.
#[derive(Debug)]
pub struct Channel<P> {
    pub(crate) name: String,
    pub(crate) current_volume: f32,
    pub(crate) target_volume: f32,
    pub(crate) is_playing: bool,
    pub(crate) base_volume: f32,
    // the timeline (or startup) asked for this channel to sound
    pub(crate) wanted: bool,
    pub(crate) rejected: bool,
    pub(crate) output: P,
}

impl<P: PlayableChannel> Channel<P> {
    pub fn new(name: impl Into<String>, base_volume: f32, output: P) -> Self {
        Self {
            name: name.into(),
            current_volume: 0.0,
            target_volume: 0.0,
            is_playing: false,
            base_volume,
            wanted: false,
            rejected: false,
            output,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn current_volume(&self) -> f32 {
        self.current_volume
    }
    pub fn target_volume(&self) -> f32 {
        self.target_volume
    }
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }
    pub fn base_volume(&self) -> f32 {
        self.base_volume
    }
    pub fn is_wanted(&self) -> bool {
        self.wanted
    }
    /// Play was refused and no retry has succeeded yet.
    pub fn is_rejected(&self) -> bool {
        self.rejected
    }
    pub fn output(&self) -> &P {
        &self.output
    }

    pub(crate) fn push_volume(&mut self, master: f32) {
        self.output
            .set_volume((self.current_volume * master).clamp(0.0, 1.0));
    }

    /// Try to start the output from silence. On refusal the channel stays
    /// stopped and is flagged for a later retry.
    pub(crate) fn start(&mut self, rewind: bool) -> Result<(), PlaybackRejected> {
        if rewind {
            self.output.rewind();
        }
        self.current_volume = 0.0;
        self.output.set_volume(0.0);
        match self.output.play() {
            Ok(()) => {
                self.is_playing = true;
                self.rejected = false;
                Ok(())
            }
            Err(e) => {
                self.is_playing = false;
                self.rejected = true;
                Err(e)
            }
        }
    }

    pub(crate) fn stop(&mut self) {
        self.output.pause();
        self.is_playing = false;
    }
}
