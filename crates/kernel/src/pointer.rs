use glam::Vec2;
use shaderloop_common::PointerConvention;

/// Latest normalized pointer position, in the variant's convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    convention: PointerConvention,
    position: Option<Vec2>,
}

impl PointerState {
    pub fn new(convention: PointerConvention) -> Self {
        Self {
            convention,
            position: None,
        }
    }

    pub fn convention(&self) -> PointerConvention {
        self.convention
    }

    /// `None` until the first valid pointer event.
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Record a position. Non-finite input is ignored; finite input is
    /// clamped into the convention's range.
    pub fn update(&mut self, p: Vec2) -> bool {
        if !p.is_finite() {
            tracing::trace!(?p, "dropped non-finite pointer position");
            return false;
        }
        self.position = Some(self.convention.clamp(p));
        true
    }
}

/// Scroll position as a fraction of the page height, in `[0, ∞)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollState {
    fraction: f32,
}

impl ScrollState {
    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    /// Record a fraction. NaN is ignored; negatives clamp to 0.
    pub fn update(&mut self, fraction: f32) -> bool {
        if fraction.is_nan() {
            tracing::trace!("dropped NaN scroll fraction");
            return false;
        }
        self.fraction = fraction.max(0.0);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_unknown_until_first_event() {
        let p = PointerState::new(PointerConvention::Centered);
        assert_eq!(p.position(), None);
    }

    #[test]
    fn pointer_clamps_into_convention() {
        let mut p = PointerState::new(PointerConvention::Unit);
        assert!(p.update(Vec2::new(1.5, -0.2)));
        assert_eq!(p.position(), Some(Vec2::new(1.0, 0.0)));

        let mut p = PointerState::new(PointerConvention::Centered);
        p.update(Vec2::new(-3.0, 0.5));
        assert_eq!(p.position(), Some(Vec2::new(-1.0, 0.5)));
    }

    #[test]
    fn pointer_ignores_nan() {
        let mut p = PointerState::new(PointerConvention::Centered);
        p.update(Vec2::new(0.1, 0.2));
        assert!(!p.update(Vec2::new(f32::NAN, 0.0)));
        assert_eq!(p.position(), Some(Vec2::new(0.1, 0.2)));
    }

    #[test]
    fn scroll_clamps_and_ignores_nan() {
        let mut s = ScrollState::default();
        s.update(-0.3);
        assert_eq!(s.fraction(), 0.0);
        s.update(0.5);
        assert!(!s.update(f32::NAN));
        assert_eq!(s.fraction(), 0.5);
        s.update(f32::INFINITY);
        assert_eq!(s.fraction(), f32::INFINITY);
    }
}
