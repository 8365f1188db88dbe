// Shared timing and level constants for the synchronizer.
//
// Several of these were tuned by ear against browser media elements; they are
// gathered into `Tuning` so a deployment can override them without code changes.

// Timeline smoothing
pub const SMOOTH_FACTOR: f32 = 0.02; // fraction of the remaining distance covered per frame

// Fade scheduler
pub const FADE_TICK_MS: u32 = 50; // fixed fade tick interval
pub const FADE_EPSILON: f32 = 1e-4; // a fade is complete once within this of its target

// Ambient channels
pub const AMBIENT_BASE_VOLUME: f32 = 0.95;
pub const AMBIENT_FADE_IN_MS: u32 = 600;
pub const AMBIENT_FADE_OUT_MS: u32 = 400;

// Background channel
pub const BACKGROUND_THRESHOLD: f32 = 2.0; // timeline position where the score drops
pub const BACKGROUND_LEVEL_BEFORE: f32 = 0.25;
pub const BACKGROUND_LEVEL_AFTER: f32 = 0.15;
pub const BACKGROUND_RETARGET_DEADZONE: f32 = 0.02; // min target change before a new ramp
pub const BACKGROUND_RETARGET_MS: u32 = 1000;
pub const BACKGROUND_START_DELAY_MS: u32 = 500;
pub const BACKGROUND_INTRO_FADE_MS: u32 = 2000;

// Overlay ducking
pub const DUCK_FLOOR: f32 = 0.02; // near-silent, never exactly zero
pub const DUCK_FADE_MS: u32 = 500;
pub const RESTORE_FADE_MS: u32 = 1000;

// Master mute
pub const MUTE_FADE_MS: u32 = 300;

// Default sequence length of the camera flythrough, in timeline units
pub const DEFAULT_SEQUENCE_LENGTH: f32 = 20.0;
