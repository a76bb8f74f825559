use glam::Vec2;

use crate::types::Viewport;

/// An input message delivered by the host and consumed by the loop at the
/// start of the next tick.
///
/// Messages never carry raw pixel positions: the input mapper has already
/// normalized them into the variant's pointer convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    /// Pointer moved to a normalized position.
    PointerMoved(Vec2),
    /// Page scrolled to a fraction of its height.
    Scrolled { fraction: f32 },
    /// Viewport changed size or pixel ratio.
    Resized(Viewport),
    /// Orbit drag in pixels since the previous drag message.
    Dragged { dx: f32, dy: f32 },
    /// Orbit zoom in wheel steps; positive zooms out.
    Zoomed { steps: f32 },
}

impl Message {
    /// Slot index used by single-slot inboxes: one slot per message kind.
    pub fn slot(&self) -> usize {
        match self {
            Self::PointerMoved(_) => 0,
            Self::Scrolled { .. } => 1,
            Self::Resized(_) => 2,
            Self::Dragged { .. } => 3,
            Self::Zoomed { .. } => 4,
        }
    }

    pub const SLOTS: usize = 5;
}
