//! Input mapping: raw host events in pixels become loop `Message`s.
//!
//! # Invariants
//! - Pointer messages are always finite and inside the variant's convention range.
//! - No pointer message is produced before a non-degenerate viewport is known.
//! - Scroll fractions are never negative.

pub mod event;
pub mod mapper;

pub use event::HostEvent;
pub use mapper::{InputMapper, ScrollTracker};
