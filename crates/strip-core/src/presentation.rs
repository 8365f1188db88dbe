//! The per-frame synchronizer that ties every component together.
//!
//! Two drivers call in: the render loop once per frame with the raw scroll
//! fraction, and the audio interval every fade tick. Both run on the same
//! thread, so no locking is involved.

use crate::channel::{Channel, ChannelDef, PlayableChannel};
use crate::config::PresentationConfig;
use crate::error::{ConfigError, OverlapWarning};
use crate::interact::{ContentId, InteractiveRegions};
use crate::overlay::{OverlayChange, OverlayInterruptController};
use crate::registry::AudioChannelRegistry;
use crate::timeline::{TimelineState, TimelineTracker};
use crate::window::{Edge, SignalKind, Transitions, WindowStateMachine};

/// Everything the renderer needs from one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub position: f32,
    pub transitions: Transitions,
}

pub struct Presentation<P> {
    config: PresentationConfig,
    warnings: Vec<OverlapWarning>,
    tracker: TimelineTracker,
    windows: WindowStateMachine,
    registry: AudioChannelRegistry<P>,
    overlay: OverlayInterruptController,
    regions: InteractiveRegions,
    clock_ms: f32,
    background_requested: bool,
}

impl<P: PlayableChannel> Presentation<P> {
    /// Validate `config` and build one output per channel with `make_output`.
    pub fn new<F>(config: PresentationConfig, mut make_output: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&ChannelDef) -> P,
    {
        Self::try_new(config, |def| Ok::<P, ConfigError>(make_output(def)))
    }

    /// Like [`Presentation::new`] for outputs whose construction can fail.
    pub fn try_new<F, E>(config: PresentationConfig, mut make_output: F) -> Result<Self, E>
    where
        F: FnMut(&ChannelDef) -> Result<P, E>,
        E: From<ConfigError>,
    {
        let warnings = config.validate()?;
        for w in &warnings {
            log::warn!("[config] {}", w);
        }

        let background = Channel::new(
            config.background.name.clone(),
            config.background.base_volume,
            make_output(&config.background)?,
        );
        let ambients = config
            .ambients
            .iter()
            .map(|def| Ok(Channel::new(def.name.clone(), def.base_volume, make_output(def)?)))
            .collect::<Result<Vec<_>, E>>()?;
        let registry =
            AudioChannelRegistry::new(background, ambients, config.background_rule, config.tuning);
        let windows = WindowStateMachine::new(&config.tables);
        log::info!(
            "[presentation] {} signals, {} ambient channels, sequence length {:.2}",
            windows.len(),
            config.ambients.len(),
            config.sequence_length
        );

        Ok(Self {
            tracker: TimelineTracker::new(config.tuning.smooth_factor),
            windows,
            registry,
            overlay: OverlayInterruptController::new(),
            regions: InteractiveRegions::new(&config.regions),
            warnings,
            config,
            clock_ms: 0.0,
            background_requested: false,
        })
    }

    pub fn config(&self) -> &PresentationConfig {
        &self.config
    }

    pub fn warnings(&self) -> &[OverlapWarning] {
        &self.warnings
    }

    pub fn timeline(&self) -> TimelineState {
        self.tracker.state()
    }

    pub fn position(&self) -> f32 {
        self.tracker.position()
    }

    pub fn windows(&self) -> &WindowStateMachine {
        &self.windows
    }

    /// Audio time counted toward the delayed background start. Stops
    /// advancing once the start has been requested.
    pub fn startup_elapsed_ms(&self) -> f32 {
        self.clock_ms
    }

    pub fn registry(&self) -> &AudioChannelRegistry<P> {
        &self.registry
    }

    pub fn overlay(&self) -> &OverlayInterruptController {
        &self.overlay
    }

    pub fn is_active(&self, kind: SignalKind, name: &str) -> bool {
        self.windows
            .id(kind, name)
            .is_some_and(|id| self.windows.is_active(id))
    }

    /// Render-frame entry point using the configured sequence length.
    pub fn frame(&mut self, scroll_fraction: f32) -> FrameReport {
        self.frame_with_length(scroll_fraction, self.config.sequence_length)
    }

    /// Smooth the scroll input, evaluate windows and apply ambient edges.
    pub fn frame_with_length(&mut self, scroll_fraction: f32, sequence_length: f32) -> FrameReport {
        let position = self.tracker.tick(scroll_fraction, sequence_length);
        self.registry.set_position(position);
        let transitions = self.windows.evaluate(position);
        for t in transitions.iter().filter(|t| t.kind == SignalKind::Ambient) {
            let name = self.windows.name(t.signal);
            match t.edge {
                Edge::Exit => {
                    self.registry.deactivate_ambient(name);
                }
                Edge::Enter => {
                    self.registry.activate_ambient(name);
                }
            }
        }
        FrameReport {
            position,
            transitions,
        }
    }

    /// One fixed-rate fade tick.
    pub fn fade_tick(&mut self) {
        self.advance(self.config.tuning.fade_tick_ms as f32);
    }

    /// Advance the audio clock by `dt_ms`: start the score once its delay has
    /// elapsed, then run every fade.
    pub fn advance(&mut self, dt_ms: f32) {
        if !self.background_requested {
            self.clock_ms += dt_ms.max(0.0);
            if self.clock_ms >= self.config.tuning.background_start_delay_ms as f32 {
                self.background_requested = true;
                self.registry.start_background();
            }
        }
        self.registry.tick(dt_ms);
    }

    /// A pointer hit on the scene. `ancestry` runs from the hit node to the root.
    pub fn pointer_down<'a, I>(&mut self, ancestry: I) -> Option<OverlayChange>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let content = self.regions.resolve(ancestry)?;
        self.open_overlay(content)
    }

    pub fn open_overlay(&mut self, content: ContentId) -> Option<OverlayChange> {
        let duck_ms = self.config.tuning.duck_fade_ms;
        self.overlay.open(content, &mut self.registry, duck_ms)
    }

    pub fn close_overlay(&mut self) -> Option<OverlayChange> {
        let restore_ms = self.config.tuning.restore_fade_ms;
        self.overlay.close(&mut self.registry, restore_ms)
    }

    /// Any click or key press: the only moment refused playback is retried.
    pub fn user_interaction(&mut self) -> usize {
        if !self.background_requested {
            // the delayed start has not run yet; let it happen on schedule
            return 0;
        }
        self.registry.retry_playback()
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.registry.toggle_mute()
    }

    /// Stop all audio and forget window membership, e.g. when leaving the page.
    pub fn shutdown(&mut self) {
        self.registry.shutdown();
        self.windows.clear();
        self.overlay = OverlayInterruptController::new();
        self.background_requested = false;
        self.clock_ms = 0.0;
    }
}
