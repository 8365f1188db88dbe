//! Video overlay interrupt: duck the mix on open, restore it on close.

use crate::channel::PlayableChannel;
use crate::interact::ContentId;
use crate::registry::{AudioChannelRegistry, DuckState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Open,
}

/// What the front-end should do after an overlay event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayChange {
    Opened(ContentId),
    /// Already open; only the displayed content changed.
    Switched(ContentId),
    Closed,
}

#[derive(Debug, Default)]
pub struct OverlayInterruptController {
    state: OverlayState,
    content: Option<ContentId>,
    duck: Option<DuckState>,
}

impl OverlayInterruptController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == OverlayState::Open
    }

    pub fn content(&self) -> Option<ContentId> {
        self.content
    }

    pub fn duck_state(&self) -> Option<&DuckState> {
        self.duck.as_ref()
    }

    /// Closed -> Open ducks everything. A repeated open never ducks twice.
    pub fn open<P: PlayableChannel>(
        &mut self,
        content: ContentId,
        registry: &mut AudioChannelRegistry<P>,
        duck_ms: u32,
    ) -> Option<OverlayChange> {
        match self.state {
            OverlayState::Open => {
                if self.content == Some(content) {
                    return None;
                }
                self.content = Some(content);
                Some(OverlayChange::Switched(content))
            }
            OverlayState::Closed => {
                log::info!("[overlay] open content {}", content);
                self.duck = Some(registry.duck_all(duck_ms));
                self.state = OverlayState::Open;
                self.content = Some(content);
                Some(OverlayChange::Opened(content))
            }
        }
    }

    /// Open -> Closed restores the mix at the current position. A close while
    /// already closed is ignored.
    pub fn close<P: PlayableChannel>(
        &mut self,
        registry: &mut AudioChannelRegistry<P>,
        restore_ms: u32,
    ) -> Option<OverlayChange> {
        if self.state == OverlayState::Closed {
            return None;
        }
        log::info!("[overlay] close");
        registry.restore_all(restore_ms);
        self.duck = None;
        self.content = None;
        self.state = OverlayState::Closed;
        Some(OverlayChange::Closed)
    }
}
