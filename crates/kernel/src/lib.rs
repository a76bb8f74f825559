//! Shaderloop Kernel: uniform table, eased transitions, camera and the
//! per-frame update loop.
//!
//! # Invariants
//! - Every declared uniform always holds a finite value within its range.
//! - `uTime` equals the elapsed time passed to the most recent tick.
//! - A tick renders exactly once, after all state for that tick is updated.
//! - At most one transition is in flight per uniform and for the camera.

pub mod camera;
pub mod clock;
pub mod config;
pub mod context;
pub mod inbox;
pub mod interaction;
pub mod pointer;
pub mod ports;
pub mod transition;
pub mod uniform;

pub use camera::{Camera, OrbitControls};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{ConfigError, DemoConfig, Geometry, Variant};
pub use context::SceneContext;
pub use ports::{Frame, Intersector, Renderer};
pub use transition::{Animated, EasedTransition, Easing};
pub use uniform::{UniformData, UniformError, UniformName, UniformRange, UniformSet};
