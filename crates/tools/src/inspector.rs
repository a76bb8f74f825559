use serde::Serialize;
use shaderloop_kernel::{SceneContext, UniformName, Variant};

/// Read-only queries against a running scene for logs and the CLI.
pub struct SceneInspector;

impl SceneInspector {
    pub fn summary(ctx: &SceneContext) -> SceneSummary {
        let uniforms = ctx.uniforms();
        SceneSummary {
            variant: ctx.config().variant,
            frame: ctx.frame_index(),
            time: ctx.time(),
            density: uniforms.scalar(UniformName::NoiseDensity),
            camera: ctx.camera().position.to_array(),
            camera_heading: ctx.camera_target_position().to_array(),
            active_transitions: ctx.transitions().len(),
            hovered: ctx.is_hovered(),
            scroll_fraction: ctx.scroll_fraction(),
        }
    }

    /// Uniform names and values as display strings, in table order.
    pub fn uniform_rows(ctx: &SceneContext) -> Vec<(&'static str, String)> {
        ctx.uniforms()
            .iter()
            .map(|(name, value)| (name.shader_name(), value.to_string()))
            .collect()
    }

    /// Whether the camera is still moving toward a target.
    pub fn camera_in_motion(ctx: &SceneContext) -> bool {
        !ctx.camera()
            .position
            .abs_diff_eq(ctx.camera_target_position(), 1e-5)
    }
}

/// Snapshot of scene state.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSummary {
    pub variant: Variant,
    pub frame: u64,
    pub time: f32,
    pub density: Option<f32>,
    pub camera: [f32; 3],
    pub camera_heading: [f32; 3],
    pub active_transitions: usize,
    pub hovered: Option<bool>,
    pub scroll_fraction: f32,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene[{}]: frame={} t={:.3} camera=({:.2}, {:.2}, {:.2}) transitions={} scroll={:.3}",
            self.variant,
            self.frame,
            self.time,
            self.camera[0],
            self.camera[1],
            self.camera[2],
            self.active_transitions,
            self.scroll_fraction
        )?;
        if let Some(d) = self.density {
            write!(f, " density={d:.3}")?;
        }
        if let Some(h) = self.hovered {
            write!(f, " hovered={h}")?;
        }
        Ok(())
    }
}
