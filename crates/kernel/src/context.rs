use glam::{Vec2, Vec3};
use shaderloop_common::{Message, ObjectId, Viewport};

use crate::camera::{Camera, OrbitControls};
use crate::clock::Clock;
use crate::config::{ConfigError, DemoConfig};
use crate::inbox::Inbox;
use crate::interaction::{self, TransitionRequest};
use crate::pointer::{PointerState, ScrollState};
use crate::ports::{Frame, Intersector, Renderer};
use crate::transition::{Animated, UniformTransitions};
use crate::uniform::{UniformData, UniformName, UniformSet};

/// All mutable state of one running demo.
///
/// Input arrives as `Message`s through `post` (or the `on_*` helpers) and is
/// consumed at the start of the next `tick`. Each tick updates uniforms and
/// the camera, then renders exactly once.
#[derive(Debug)]
pub struct SceneContext {
    config: DemoConfig,
    uniforms: UniformSet,
    transitions: UniformTransitions,
    camera: Camera,
    eye: Animated<Vec3>,
    orbit: Option<OrbitControls>,
    pointer: PointerState,
    scroll: ScrollState,
    inbox: Inbox,
    viewport: Option<Viewport>,
    time: f32,
    frame_index: u64,
    hovered: Option<bool>,
}

impl SceneContext {
    pub fn new(config: DemoConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let uniforms = config.build_uniforms()?;
        let camera = Camera::from_settings(&config.camera);
        let orbit = config
            .orbit
            .map(|o| OrbitControls::new(camera.position, camera.target, o));
        tracing::info!(variant = %config.variant, uniforms = uniforms.len(), "scene context created");
        Ok(Self {
            transitions: UniformTransitions::new(config.easing),
            eye: Animated::new(camera.position),
            pointer: PointerState::new(config.pointer),
            scroll: ScrollState::default(),
            inbox: Inbox::new(),
            viewport: None,
            time: 0.0,
            frame_index: 0,
            hovered: None,
            uniforms,
            camera,
            orbit,
            config,
        })
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    /// Direct access for debug controls. Writes still clamp to range; an
    /// in-flight transition on the same uniform wins on the next tick.
    pub fn uniforms_mut(&mut self) -> &mut UniformSet {
        &mut self.uniforms
    }

    pub fn transitions(&self) -> &UniformTransitions {
        &self.transitions
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Where the camera eye is heading (equal to its position when idle).
    pub fn camera_target_position(&self) -> Vec3 {
        self.eye.target()
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn scroll_fraction(&self) -> f32 {
        self.scroll.fraction()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Elapsed time of the last tick.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Number of ticks run so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Result of the last hover evaluation, if any ran.
    pub fn is_hovered(&self) -> Option<bool> {
        self.hovered
    }

    /// Input messages folded into a pending one before a tick consumed them.
    pub fn coalesced_inputs(&self) -> u64 {
        self.inbox.coalesced()
    }

    /// Queue an input message for the next tick.
    pub fn post(&mut self, msg: Message) {
        self.inbox.post(msg);
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.post(Message::PointerMoved(Vec2::new(x, y)));
    }

    pub fn on_scroll(&mut self, fraction: f32) {
        self.post(Message::Scrolled { fraction });
    }

    /// Apply a new viewport now. Degenerate sizes are ignored and leave the
    /// previous viewport in place. Returns whether it was applied.
    pub fn resize<R: Renderer + ?Sized>(&mut self, viewport: Viewport, renderer: &mut R) -> bool {
        let Some(aspect) = viewport.aspect() else {
            tracing::debug!(?viewport, "ignored degenerate resize");
            return false;
        };
        let viewport = viewport.with_pixel_ratio_cap(self.config.max_pixel_ratio);
        self.camera.aspect = aspect;
        self.viewport = Some(viewport);
        renderer.set_viewport(viewport);
        true
    }

    /// Tick using the given clock's elapsed time.
    pub fn tick_with<C: Clock + ?Sized, R: Renderer + ?Sized>(&mut self, clock: &C, renderer: &mut R) {
        self.tick(clock.elapsed(), renderer);
    }

    /// One update-and-render cycle at `elapsed` seconds since start.
    ///
    /// Non-finite elapsed time reuses the previous time; negative time
    /// clamps to zero.
    pub fn tick<R: Renderer + ?Sized>(&mut self, elapsed: f32, renderer: &mut R) {
        let _span = tracing::trace_span!("tick", frame = self.frame_index).entered();
        let now = if elapsed.is_finite() {
            elapsed.max(0.0)
        } else {
            self.time
        };

        for msg in self.inbox.drain() {
            self.apply(msg, renderer);
        }

        self.time = now;
        self.uniforms.set_scalar(UniformName::Time, now);

        if let (Some(hover), Some(p), Some(intersector)) = (
            self.config.hover,
            self.pointer.position(),
            renderer.intersector(),
        ) {
            self.evaluate_hover_state(p, hover.target, intersector);
        }
        if self.config.scroll.is_some() {
            self.evaluate_scroll_state(self.scroll.fraction());
        }
        if self.config.bind_pointer {
            if let Some(p) = self.pointer.position() {
                self.uniforms.set(UniformName::Pointer, UniformData::Vec2(p));
            }
        }

        self.transitions.advance(now, &mut self.uniforms);
        match &mut self.orbit {
            Some(orbit) => {
                self.eye.set(orbit.update());
                self.camera.target = orbit.target();
            }
            None => {
                self.eye.advance(now);
            }
        }
        self.camera.position = self.eye.value();

        renderer.render(&Frame {
            index: self.frame_index,
            time: now,
            uniforms: &self.uniforms,
            camera: &self.camera,
            clear_color: self.config.clear_color,
            viewport: self.viewport,
        });
        self.frame_index += 1;
    }

    /// Cast a ray through `pointer` (in the variant's convention) and move
    /// the hover uniform toward its active or inactive value depending on
    /// whether `target` is hit. Returns whether it was hit.
    pub fn evaluate_hover_state(
        &mut self,
        pointer: Vec2,
        target: ObjectId,
        intersector: &dyn Intersector,
    ) -> bool {
        let Some(policy) = self.config.hover else {
            return false;
        };
        let ndc = self.pointer.convention().to_ndc(pointer);
        let ray = self.camera.picking_ray(ndc);
        let hits = intersector.intersect(&ray, target);
        let hovered = interaction::is_target_hit(&hits, target);
        if self.hovered != Some(hovered) {
            tracing::debug!(hovered, "hover state changed");
        }
        self.hovered = Some(hovered);
        self.request(interaction::hover_request(&policy, hovered));
        hovered
    }

    /// Apply the scroll threshold policy for `fraction`.
    pub fn evaluate_scroll_state(&mut self, fraction: f32) {
        let Some(policy) = self.config.scroll else {
            return;
        };
        for req in interaction::scroll_requests(&policy, fraction) {
            self.request(req);
        }
    }

    fn request(&mut self, req: TransitionRequest) {
        match req {
            TransitionRequest::Uniform {
                name,
                target,
                duration,
            } => {
                self.transitions
                    .start(&self.uniforms, name, target, duration, self.time);
            }
            TransitionRequest::Camera { target, duration } => {
                if self.orbit.is_some() {
                    return;
                }
                if self.eye.retarget(target, duration, self.time, self.config.easing) {
                    tracing::debug!(?target, duration, "camera transition started");
                }
            }
        }
    }

    fn apply<R: Renderer + ?Sized>(&mut self, msg: Message, renderer: &mut R) {
        match msg {
            Message::PointerMoved(p) => {
                self.pointer.update(p);
            }
            Message::Scrolled { fraction } => {
                self.scroll.update(fraction);
            }
            Message::Resized(viewport) => {
                self.resize(viewport, renderer);
            }
            Message::Dragged { dx, dy } => match (&mut self.orbit, self.viewport) {
                (Some(orbit), Some(v)) => orbit.rotate_pixels(dx, dy, v.height as f32),
                _ => tracing::trace!("dropped drag without orbit controls or viewport"),
            },
            Message::Zoomed { steps } => {
                if let Some(orbit) = &mut self.orbit {
                    orbit.zoom(steps);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use shaderloop_common::{Hit, Ray};

    /// Records what the loop hands to the renderer.
    #[derive(Default)]
    struct Recorder {
        viewport: Option<Viewport>,
        frames: Vec<(u64, f32, Option<f32>, Vec3)>,
        hit: Option<ObjectId>,
        queries: std::cell::Cell<usize>,
    }

    impl Intersector for Recorder {
        fn intersect(&self, _ray: &Ray, _object: ObjectId) -> Vec<Hit> {
            self.queries.set(self.queries.get() + 1);
            let mut hits = vec![Hit {
                object: ObjectId(99),
                distance: 0.5,
                point: Vec3::ZERO,
            }];
            if let Some(object) = self.hit {
                hits.push(Hit {
                    object,
                    distance: 4.0,
                    point: Vec3::ZERO,
                });
            }
            hits
        }
    }

    impl Renderer for Recorder {
        fn render(&mut self, frame: &Frame<'_>) {
            self.frames.push((
                frame.index,
                frame.time,
                frame.uniforms.scalar(UniformName::NoiseDensity),
                frame.camera.position,
            ));
        }

        fn set_viewport(&mut self, viewport: Viewport) {
            self.viewport = Some(viewport);
        }

        fn viewport(&self) -> Option<Viewport> {
            self.viewport
        }

        fn intersector(&self) -> Option<&dyn Intersector> {
            Some(self)
        }
    }

    fn ctx(v: Variant) -> SceneContext {
        SceneContext::new(DemoConfig::for_variant(v)).unwrap()
    }

    fn density(c: &SceneContext) -> f32 {
        c.uniforms().scalar(UniformName::NoiseDensity).unwrap()
    }

    #[test]
    fn tick_writes_time_exactly() {
        let mut c = ctx(Variant::Orbit);
        let mut r = Recorder::default();
        for t in [0.0_f32, 0.016, 1.0, 123.456, 1e6] {
            c.tick(t, &mut r);
            assert_eq!(c.uniforms().scalar(UniformName::Time), Some(t));
        }
    }

    #[test]
    fn each_tick_renders_once() {
        let mut c = ctx(Variant::Scroll);
        let mut r = Recorder::default();
        c.on_scroll(0.5);
        c.on_pointer_move(0.1, 0.1);
        for i in 0..5 {
            c.tick(i as f32 * 0.1, &mut r);
        }
        assert_eq!(r.frames.len(), 5);
        assert_eq!(r.frames[4].0, 4);
        assert_eq!(c.frame_index(), 5);
    }

    #[test]
    fn bad_elapsed_is_tolerated() {
        let mut c = ctx(Variant::Orbit);
        let mut r = Recorder::default();
        c.tick(2.0, &mut r);
        c.tick(f32::NAN, &mut r);
        assert_eq!(c.time(), 2.0);
        c.tick(-1.0, &mut r);
        assert_eq!(c.uniforms().scalar(UniformName::Time), Some(0.0));
    }

    #[test]
    fn pointer_applies_on_next_tick() {
        let mut c = ctx(Variant::Plane);
        let mut r = Recorder::default();
        c.on_pointer_move(0.25, 0.75);
        assert_eq!(c.pointer().position(), None);
        c.tick(0.0, &mut r);
        assert_eq!(c.pointer().position(), Some(Vec2::new(0.25, 0.75)));
        assert_eq!(
            c.uniforms().vec2(UniformName::Pointer),
            Some(Vec2::new(0.25, 0.75))
        );
    }

    #[test]
    fn hover_hit_settles_at_active_value() {
        let mut c = ctx(Variant::Hover);
        let mut r = Recorder {
            hit: Some(ObjectId(1)),
            ..Recorder::default()
        };
        c.on_pointer_move(0.0, 0.0);
        c.tick(0.0, &mut r);
        assert_eq!(c.is_hovered(), Some(true));
        c.tick(0.1, &mut r);
        let mid = density(&c);
        assert!(mid > 0.0 && mid < 1.5);
        c.tick(0.25, &mut r);
        assert_eq!(density(&c), 1.5);
    }

    #[test]
    fn hover_miss_settles_at_inactive_value() {
        let mut c = ctx(Variant::Hover);
        let mut r = Recorder {
            hit: Some(ObjectId(1)),
            ..Recorder::default()
        };
        c.on_pointer_move(0.0, 0.0);
        c.tick(0.0, &mut r);
        c.tick(0.5, &mut r);
        assert_eq!(density(&c), 1.5);

        // only an unrelated object is hit now
        r.hit = None;
        c.tick(1.0, &mut r);
        assert_eq!(c.is_hovered(), Some(false));
        c.tick(1.5, &mut r);
        assert_eq!(density(&c), 0.0);
    }

    #[test]
    fn hover_skipped_without_pointer() {
        let mut c = ctx(Variant::Hover);
        let mut r = Recorder {
            hit: Some(ObjectId(1)),
            ..Recorder::default()
        };
        c.tick(0.0, &mut r);
        assert_eq!(r.queries.get(), 0);
        assert_eq!(c.is_hovered(), None);
    }

    #[test]
    fn hover_queries_once_per_tick() {
        let mut c = ctx(Variant::Hover);
        let mut r = Recorder::default();
        c.on_pointer_move(0.3, 0.3);
        for i in 0..4 {
            c.tick(i as f32, &mut r);
        }
        assert_eq!(r.queries.get(), 4);
    }

    #[test]
    fn scroll_scenario() {
        let mut c = ctx(Variant::Scroll);
        let mut r = Recorder::default();
        let rest = Vec3::new(0.0, 10.0, 10.0);

        c.tick(0.0, &mut r);
        assert_eq!(c.uniforms().scalar(UniformName::Time), Some(0.0));

        c.on_scroll(0.05);
        c.tick(1.0, &mut r);
        assert_eq!(density(&c), 0.0);
        assert_eq!(c.camera().position, rest);
        assert!(c.transitions().is_empty());

        c.on_scroll(0.5);
        let mut t = 1.0;
        while t <= 2.0 {
            c.tick(t, &mut r);
            t += 0.25;
        }
        assert_eq!(density(&c), 1.8);
        assert_eq!(c.camera().position, Vec3::new(2.0, 15.0, 15.0));
    }

    #[test]
    fn scroll_back_to_rest() {
        let mut c = ctx(Variant::Scroll);
        let mut r = Recorder::default();
        c.on_scroll(0.2);
        c.tick(0.0, &mut r);
        assert!(c.transitions().is_active(UniformName::NoiseDensity));
        assert_eq!(c.camera_target_position(), Vec3::new(0.0, 10.0, 10.0));

        c.on_scroll(0.45);
        c.tick(0.5, &mut r);
        assert_eq!(c.camera_target_position(), Vec3::new(2.0, 15.0, 15.0));

        c.on_scroll(0.0);
        c.tick(2.0, &mut r);
        c.tick(3.0, &mut r);
        assert_eq!(density(&c), 0.0);
        assert_eq!(c.camera().position, Vec3::new(0.0, 10.0, 10.0));
    }

    #[test]
    fn resize_updates_aspect_and_renderer() {
        let mut c = ctx(Variant::Scroll);
        let mut r = Recorder::default();
        assert!(c.resize(Viewport::new(1920, 1080, 3.0), &mut r));
        assert_eq!(c.camera().aspect, 1920.0 / 1080.0);
        let v = r.viewport().unwrap();
        assert_eq!((v.width, v.height), (1920, 1080));
        assert_eq!(v.pixel_ratio, 2.0);
    }

    #[test]
    fn degenerate_resize_is_ignored() {
        let mut c = ctx(Variant::Scroll);
        let mut r = Recorder::default();
        assert!(!c.resize(Viewport::new(0, 0, 1.0), &mut r));
        assert_eq!(r.viewport(), None);
        assert_eq!(c.camera().aspect, 1.0);

        c.post(Message::Resized(Viewport::new(800, 0, 1.0)));
        c.on_pointer_move(f32::NAN, f32::NAN);
        c.tick(0.0, &mut r);
        assert_eq!(c.viewport(), None);
        assert_eq!(c.pointer().position(), None);
    }

    #[test]
    fn queued_resize_applies_on_tick() {
        let mut c = ctx(Variant::Orbit);
        let mut r = Recorder::default();
        c.post(Message::Resized(Viewport::new(400, 200, 1.0)));
        c.tick(0.0, &mut r);
        assert_eq!(c.camera().aspect, 2.0);
        assert_eq!(r.viewport().map(|v| v.width), Some(400));
    }

    #[test]
    fn orbit_drag_moves_camera() {
        let mut c = ctx(Variant::Orbit);
        let mut r = Recorder::default();
        let start = c.camera().position;
        c.post(Message::Dragged { dx: 50.0, dy: 0.0 });
        c.tick(0.0, &mut r);
        // no viewport yet: drag dropped
        assert!(c.camera().position.abs_diff_eq(start, 1e-4));

        c.resize(Viewport::new(800, 600, 1.0), &mut r);
        c.post(Message::Dragged { dx: 50.0, dy: 0.0 });
        c.tick(0.1, &mut r);
        assert!(!c.camera().position.abs_diff_eq(start, 1e-4));
        let d = c.camera().position.length();
        assert!((d - start.length()).abs() < 1e-3);
    }

    #[test]
    fn pointer_burst_is_coalesced() {
        let mut c = ctx(Variant::Hover);
        let mut r = Recorder::default();
        c.on_pointer_move(0.1, 0.1);
        c.on_pointer_move(0.2, 0.2);
        c.on_pointer_move(0.3, 0.3);
        assert_eq!(c.coalesced_inputs(), 2);
        c.tick(0.0, &mut r);
        assert_eq!(c.pointer().position(), Some(Vec2::new(0.3, 0.3)));
    }

    #[test]
    fn orbit_zoom_changes_distance() {
        let mut c = ctx(Variant::Orbit);
        let mut r = Recorder::default();
        let start = c.camera().position.length();
        c.post(Message::Zoomed { steps: 3.0 });
        c.tick(0.0, &mut r);
        assert!(c.camera().position.length() > start);
    }
}
