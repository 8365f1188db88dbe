//! Scroll-driven presentation synchronizer.
//!
//! A raw scroll fraction is smoothed into a timeline position, window tables
//! turn that position into visibility/caption/ambient edges, and the audio
//! registry keeps a background score plus ambient soundscapes in step with it,
//! ducking the whole mix while a video overlay is open.

pub mod channel;
pub mod config;
pub mod constants;
pub mod error;
pub mod fade;
pub mod interact;
pub mod overlay;
pub mod presentation;
pub mod registry;
pub mod timeline;
pub mod window;

pub use channel::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use fade::*;
pub use interact::*;
pub use overlay::*;
pub use presentation::*;
pub use registry::*;
pub use timeline::*;
pub use window::*;
