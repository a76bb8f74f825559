//! Developer Tooling: the uniform control panel model and scene inspector.
//!
//! # Invariants
//! - Panel edits go through `UniformSet` and so stay within declared ranges.
//! - Inspection is read-only.

pub mod inspector;
pub mod panel;

pub use inspector::{SceneInspector, SceneSummary};
pub use panel::{Control, ControlKind, ControlPanel};
