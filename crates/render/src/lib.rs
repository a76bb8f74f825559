//! Rendering Adapter: implementations of the kernel's `Renderer` and
//! `Intersector` ports that need no GPU.
//!
//! # Invariants
//! - Renderers never mutate loop state; they only read the `Frame`.
//! - Intersection results are sorted nearest first.

mod debug;
mod shapes;

pub use debug::DebugTextRenderer;
pub use shapes::{Shape, ShapeScene};
