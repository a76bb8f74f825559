//! Traits the loop calls out through. Implementations live in the render crates.

use shaderloop_common::{Color, Hit, ObjectId, Ray, Viewport};

use crate::camera::Camera;
use crate::uniform::UniformSet;

/// Read-only view of the scene handed to a renderer once per tick.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub index: u64,
    pub time: f32,
    pub uniforms: &'a UniformSet,
    pub camera: &'a Camera,
    pub clear_color: Color,
    pub viewport: Option<Viewport>,
}

/// Ray queries against rendered objects.
pub trait Intersector {
    /// Hits of `ray` against `object`, nearest first. Implementations may
    /// report hits on other objects as well; callers filter by id.
    fn intersect(&self, ray: &Ray, object: ObjectId) -> Vec<Hit>;
}

/// Rendering collaborator. The loop calls `render` exactly once per tick.
///
/// A renderer reads the frame; it never writes loop state.
pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>);

    fn set_viewport(&mut self, viewport: Viewport);

    /// Last viewport applied with `set_viewport`.
    fn viewport(&self) -> Option<Viewport>;

    /// Intersection queries, when the renderer can answer them.
    fn intersector(&self) -> Option<&dyn Intersector> {
        None
    }
}
