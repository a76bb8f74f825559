use shaderloop_common::Viewport;
use shaderloop_kernel::{Frame, Intersector, Renderer};

use crate::shapes::ShapeScene;

/// Text renderer for headless runs and tests.
///
/// Each frame is rendered to a human-readable string kept as `last_output`.
/// With a `ShapeScene` attached it also answers hover queries.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    viewport: Option<Viewport>,
    frames: u64,
    last_output: String,
    scene: Option<ShapeScene>,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scene(scene: ShapeScene) -> Self {
        Self {
            scene: Some(scene),
            ..Self::default()
        }
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_output(&self) -> &str {
        &self.last_output
    }

    pub fn format_frame(frame: &Frame<'_>) -> String {
        let mut out = format!(
            "=== Frame {} (t={:.3}) ===\n",
            frame.index, frame.time
        );
        match frame.viewport {
            Some(v) => out.push_str(&format!(
                "Viewport: {}x{} @{:.1}\n",
                v.width, v.height, v.pixel_ratio
            )),
            None => out.push_str("Viewport: none\n"),
        }
        let cam = frame.camera;
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.3}\n",
            cam.position.x,
            cam.position.y,
            cam.position.z,
            cam.target.x,
            cam.target.y,
            cam.target.z,
            cam.fov_degrees,
            cam.aspect
        ));
        out.push_str(&format!("Clear: {}\n", frame.clear_color.to_hex()));
        for (name, value) in frame.uniforms.iter() {
            out.push_str(&format!("  {name} = {value}\n"));
        }
        out
    }
}

impl Renderer for DebugTextRenderer {
    fn render(&mut self, frame: &Frame<'_>) {
        self.last_output = Self::format_frame(frame);
        self.frames += 1;
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        tracing::debug!(width = viewport.width, height = viewport.height, "debug viewport set");
        self.viewport = Some(viewport);
    }

    fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    fn intersector(&self) -> Option<&dyn Intersector> {
        self.scene.as_ref().map(|s| s as &dyn Intersector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shaderloop_kernel::{DemoConfig, SceneContext, UniformName, Variant};

    #[test]
    fn renders_uniforms_and_camera() {
        let mut ctx = SceneContext::new(DemoConfig::for_variant(Variant::Scroll)).unwrap();
        let mut r = DebugTextRenderer::new();
        ctx.tick(0.5, &mut r);
        let out = r.last_output();
        assert!(out.contains("Frame 0"));
        assert!(out.contains("Viewport: none"));
        assert!(out.contains("uTime = 0.5"));
        assert!(out.contains("eye=(0.00, 10.00, 10.00)"));
        assert!(out.contains("#151B26"));
        assert_eq!(r.frames(), 1);
    }

    #[test]
    fn resize_reaches_renderer() {
        let mut ctx = SceneContext::new(DemoConfig::for_variant(Variant::Plane)).unwrap();
        let mut r = DebugTextRenderer::new();
        assert!(ctx.resize(Viewport::new(1280, 720, 1.0), &mut r));
        ctx.tick(0.0, &mut r);
        assert_eq!(r.viewport().map(|v| (v.width, v.height)), Some((1280, 720)));
        assert!(r.last_output().contains("Viewport: 1280x720"));
    }

    #[test]
    fn hover_through_shape_scene() {
        let config = DemoConfig::for_variant(Variant::Hover);
        let scene = ShapeScene::from_geometry(config.mesh_id, &config.geometry);
        let mut ctx = SceneContext::new(config).unwrap();
        let mut r = DebugTextRenderer::with_scene(scene);
        ctx.resize(Viewport::new(800, 800, 1.0), &mut r);

        // screen center looks straight at the sphere
        ctx.on_pointer_move(0.0, 0.0);
        ctx.tick(0.0, &mut r);
        ctx.tick(0.3, &mut r);
        assert_eq!(ctx.is_hovered(), Some(true));
        assert_eq!(ctx.uniforms().scalar(UniformName::NoiseDensity), Some(1.5));

        // top-right corner misses it
        ctx.on_pointer_move(1.0, 1.0);
        ctx.tick(1.0, &mut r);
        ctx.tick(1.5, &mut r);
        assert_eq!(ctx.is_hovered(), Some(false));
        assert_eq!(ctx.uniforms().scalar(UniformName::NoiseDensity), Some(0.0));
    }

    #[test]
    fn no_scene_means_no_intersector() {
        assert!(DebugTextRenderer::new().intersector().is_none());
    }
}
