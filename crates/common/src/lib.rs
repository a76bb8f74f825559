//! Shared value types used across the shaderloop crates.
//!
//! Everything here is plain data: no crate in the workspace owns these types,
//! they only move between the input mapper, the loop and the renderers.

pub mod message;
pub mod types;

pub use message::Message;
pub use types::{Color, ColorParseError, Hit, ObjectId, PointerConvention, Ray, Viewport};
