//! Static presentation configuration and its startup validation.

use crate::channel::{BackgroundRule, ChannelDef};
use crate::constants::*;
use crate::error::{ConfigError, OverlapWarning};
use crate::interact::RegionDef;
use crate::window::{SignalKind, Window, WindowTable};
use fnv::FnvHashSet;
use serde::{Deserialize, Serialize};

/// Timing and level knobs. Defaults come from [`crate::constants`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub smooth_factor: f32,
    pub fade_tick_ms: u32,
    pub fade_epsilon: f32,
    pub ambient_fade_in_ms: u32,
    pub ambient_fade_out_ms: u32,
    pub background_retarget_deadzone: f32,
    pub background_retarget_ms: u32,
    pub background_start_delay_ms: u32,
    pub background_intro_fade_ms: u32,
    pub duck_floor: f32,
    pub duck_fade_ms: u32,
    pub restore_fade_ms: u32,
    pub mute_fade_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            smooth_factor: SMOOTH_FACTOR,
            fade_tick_ms: FADE_TICK_MS,
            fade_epsilon: FADE_EPSILON,
            ambient_fade_in_ms: AMBIENT_FADE_IN_MS,
            ambient_fade_out_ms: AMBIENT_FADE_OUT_MS,
            background_retarget_deadzone: BACKGROUND_RETARGET_DEADZONE,
            background_retarget_ms: BACKGROUND_RETARGET_MS,
            background_start_delay_ms: BACKGROUND_START_DELAY_MS,
            background_intro_fade_ms: BACKGROUND_INTRO_FADE_MS,
            duck_floor: DUCK_FLOOR,
            duck_fade_ms: DUCK_FADE_MS,
            restore_fade_ms: RESTORE_FADE_MS,
            mute_fade_ms: MUTE_FADE_MS,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smooth_factor > 0.0 && self.smooth_factor < 1.0) {
            return Err(ConfigError::InvalidTuning("smooth_factor must lie in (0, 1)"));
        }
        if self.fade_tick_ms == 0 {
            return Err(ConfigError::InvalidTuning("fade_tick_ms must be positive"));
        }
        if !(self.fade_epsilon >= 0.0) {
            return Err(ConfigError::InvalidTuning("fade_epsilon must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.duck_floor) {
            return Err(ConfigError::InvalidTuning("duck_floor must lie in [0, 1]"));
        }
        if !(self.background_retarget_deadzone >= 0.0) {
            return Err(ConfigError::InvalidTuning(
                "background_retarget_deadzone must be non-negative",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresentationConfig {
    #[serde(default = "default_sequence_length")]
    pub sequence_length: f32,
    pub background: ChannelDef,
    #[serde(default)]
    pub background_rule: BackgroundRule,
    pub ambients: Vec<ChannelDef>,
    pub tables: Vec<WindowTable>,
    #[serde(default)]
    pub regions: Vec<RegionDef>,
    #[serde(default)]
    pub tuning: Tuning,
}

fn default_sequence_length() -> f32 {
    DEFAULT_SEQUENCE_LENGTH
}

fn check_volume(channel: &str, volume: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&volume) {
        Ok(())
    } else {
        Err(ConfigError::VolumeOutOfRange {
            channel: channel.to_string(),
            volume,
        })
    }
}

impl PresentationConfig {
    /// Check everything that must hold before the first frame. Overlaps inside
    /// exclusive tables are returned as warnings rather than errors.
    pub fn validate(&self) -> Result<Vec<OverlapWarning>, ConfigError> {
        self.tuning.validate()?;
        if !(self.sequence_length >= 0.0) {
            return Err(ConfigError::NegativeSequenceLength(self.sequence_length));
        }

        let mut names = FnvHashSet::default();
        for def in std::iter::once(&self.background).chain(self.ambients.iter()) {
            if !names.insert(def.name.as_str()) {
                return Err(ConfigError::DuplicateChannel(def.name.clone()));
            }
            check_volume(&def.name, def.base_volume)?;
        }
        check_volume(&self.background.name, self.background_rule.before)?;
        check_volume(&self.background.name, self.background_rule.after)?;

        let mut warnings = Vec::new();
        for table in &self.tables {
            for w in &table.windows {
                if w.start.is_nan() || w.end.is_nan() {
                    return Err(ConfigError::NanBound {
                        signal: w.signal.clone(),
                    });
                }
                if w.end <= w.start {
                    return Err(ConfigError::EmptyWindow {
                        signal: w.signal.clone(),
                        start: w.start,
                        end: w.end,
                    });
                }
                if table.kind == SignalKind::Ambient
                    && !self.ambients.iter().any(|a| a.name == w.signal)
                {
                    return Err(ConfigError::UnknownChannel {
                        signal: w.signal.clone(),
                    });
                }
            }
            warnings.extend(table.overlap_warnings());
        }

        let mut regions = FnvHashSet::default();
        for r in &self.regions {
            if !regions.insert(r.name.as_str()) {
                return Err(ConfigError::DuplicateRegion(r.name.clone()));
            }
        }
        Ok(warnings)
    }

    /// The music strip flythrough: ten fading meshes, nine captions, seven
    /// neighbourhood soundscapes and eight clickable video panels.
    pub fn music_strip() -> Self {
        let open = f32::MAX;
        let visibility = WindowTable::new(
            SignalKind::Visibility,
            false,
            vec![
                Window::new("S1", 0.0, 2.0),
                Window::new("S2", 2.0, open),
                Window::new("P1", 0.0, 2.0),
                Window::new("P2", 2.0, 4.0),
                Window::new("P3", 6.0, 8.0),
                Window::new("P4", 8.0, 10.0),
                Window::new("P5", 0.0, open),
                Window::new("P6", 13.0, 15.0),
                Window::new("P7", 14.0, 16.5),
                Window::new("P8", 16.0, 18.0),
            ],
        );
        let captions = WindowTable::new(
            SignalKind::Caption,
            false,
            [
                (0.0, 0.8),
                (3.2, 4.5),
                (6.34, 8.6),
                (8.75, 9.23),
                (11.49, 12.53),
                (13.0, 13.9),
                (15.5, 16.7),
                (16.6, 17.5),
                (18.44, 18.88),
            ]
            .iter()
            .enumerate()
            .map(|(i, (s, e))| Window::new(format!("caption-{i}"), *s, *e))
            .collect(),
        );
        let ranges: [(&str, &str, f32, f32); 7] = [
            ("first", "/sounds/first.mp3", 2.3, 6.0),
            ("2nd", "/sounds/2nd.mp3", 6.0, 8.72),
            ("hippie", "/sounds/Hippie.mp3", 8.72, 10.0),
            ("cubbon", "/sounds/cubbon.mp3", 10.0, 15.0),
            ("street", "/sounds/street.mp3", 15.0, 17.5),
            ("metro", "/sounds/metro.mp3", 17.5, 18.10),
            ("churchStreet", "/sounds/church street.mp3", 18.10, 19.8),
        ];
        let ambients = ranges
            .iter()
            .map(|(name, src, _, _)| ChannelDef::new(*name, *src, AMBIENT_BASE_VOLUME))
            .collect();
        let ambient_table = WindowTable::new(
            SignalKind::Ambient,
            true,
            ranges
                .iter()
                .map(|(name, _, s, e)| Window::new(*name, *s, *e))
                .collect(),
        );
        let regions = (1..=8)
            .map(|i| RegionDef {
                name: format!("P{i}"),
                content: i,
            })
            .collect();

        Self {
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
            background: ChannelDef::new("background", "/music/bg.m4a", BACKGROUND_LEVEL_BEFORE),
            background_rule: BackgroundRule::default(),
            ambients,
            tables: vec![visibility, captions, ambient_table],
            regions,
            tuning: Tuning::default(),
        }
    }
}
