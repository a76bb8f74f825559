use glam::Vec2;
use shaderloop_common::{Message, PointerConvention, Viewport};

use crate::event::HostEvent;

/// Pixels of wheel travel that count as one zoom step.
const WHEEL_PIXELS_PER_STEP: f32 = 100.0;

/// Scroll position on a virtual page `page_height_factor` viewports tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTracker {
    offset: f32,
    page_height_factor: f32,
}

impl ScrollTracker {
    pub fn new(page_height_factor: f32) -> Self {
        Self {
            offset: 0.0,
            page_height_factor: page_height_factor.max(1.0),
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn page_height(&self, viewport_height: f32) -> f32 {
        viewport_height * self.page_height_factor
    }

    /// Scroll by `delta` pixels, clamped so the viewport stays on the page.
    /// Returns the new fraction of the page scrolled past.
    pub fn scroll_by(&mut self, delta: f32, viewport_height: f32) -> Option<f32> {
        if !delta.is_finite() || viewport_height <= 0.0 {
            return None;
        }
        let page = self.page_height(viewport_height);
        self.offset = (self.offset + delta).clamp(0.0, page - viewport_height);
        Some(self.offset / page)
    }

    /// Re-clamp after the viewport changed size.
    pub fn clamp_to(&mut self, viewport_height: f32) {
        let max = (self.page_height(viewport_height) - viewport_height).max(0.0);
        self.offset = self.offset.min(max);
    }
}

/// Turns host events into messages for the loop.
///
/// The mapper keeps its own copy of the viewport so pixel positions can be
/// normalized. Until a usable viewport arrives, pointer events are dropped.
#[derive(Debug, Clone)]
pub struct InputMapper {
    convention: PointerConvention,
    viewport: Option<Viewport>,
    scroll: ScrollTracker,
    wheel_zoom: bool,
}

impl InputMapper {
    pub fn new(convention: PointerConvention) -> Self {
        Self {
            convention,
            viewport: None,
            scroll: ScrollTracker::new(4.0),
            wheel_zoom: false,
        }
    }

    pub fn with_page_height_factor(mut self, factor: f32) -> Self {
        self.scroll = ScrollTracker::new(factor);
        self
    }

    /// Send wheel motion to the camera as zoom instead of scrolling the page.
    pub fn with_wheel_zoom(mut self, enabled: bool) -> Self {
        self.wheel_zoom = enabled;
        self
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn scroll(&self) -> &ScrollTracker {
        &self.scroll
    }

    /// Normalize a pixel position into the pointer convention, clamped.
    pub fn normalize(&self, x: f32, y: f32) -> Option<Vec2> {
        let v = self.viewport.filter(Viewport::is_valid)?;
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let page = Vec2::new(x / v.width as f32, y / v.height as f32);
        Some(self.convention.clamp(self.convention.from_page(page)))
    }

    pub fn map(&mut self, event: HostEvent) -> Option<Message> {
        match event {
            HostEvent::CursorMoved { x, y } | HostEvent::TouchMoved { x, y } => {
                let p = self.normalize(x, y);
                if p.is_none() {
                    tracing::trace!(x, y, "pointer event dropped");
                }
                p.map(Message::PointerMoved)
            }
            HostEvent::Wheel { delta_y } if self.wheel_zoom => {
                delta_y.is_finite().then(|| Message::Zoomed {
                    steps: delta_y / WHEEL_PIXELS_PER_STEP,
                })
            }
            HostEvent::Wheel { delta_y } => {
                let height = self.viewport.filter(Viewport::is_valid)?.height as f32;
                self.scroll
                    .scroll_by(delta_y, height)
                    .map(|fraction| Message::Scrolled { fraction })
            }
            HostEvent::ScrollTo {
                offset,
                content_height,
            } => {
                if !(content_height.is_finite() && content_height > 0.0) || !offset.is_finite() {
                    tracing::debug!(offset, content_height, "scroll position ignored");
                    return None;
                }
                Some(Message::Scrolled {
                    fraction: offset.max(0.0) / content_height,
                })
            }
            HostEvent::Resized {
                width,
                height,
                scale,
            } => {
                let viewport = Viewport::new(width, height, scale);
                if viewport.is_valid() {
                    self.viewport = Some(viewport);
                    self.scroll.clamp_to(height as f32);
                }
                Some(Message::Resized(viewport))
            }
            HostEvent::Dragged { dx, dy } => (dx.is_finite() && dy.is_finite())
                .then_some(Message::Dragged { dx, dy }),
        }
    }
}
