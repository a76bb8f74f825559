//! wgpu render backend for the shader demos.
//!
//! Draws one displaced mesh (icosphere or plane) with the noise shader and
//! uploads the uniform table once per frame.
//!
//! # Invariants
//! - The GPU uniform block mirrors `UniformSet` exactly once per rendered frame.
//! - The renderer never writes loop state.

mod gpu;
mod mesh;
mod shaders;

pub use gpu::{GpuFrame, ShaderUniforms, WgpuRenderer};
pub use mesh::{MeshData, Vertex};
