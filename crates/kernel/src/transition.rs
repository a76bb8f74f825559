use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use shaderloop_common::Color;
use std::collections::BTreeMap;

use crate::uniform::{UniformName, UniformSet};

const EPSILON: f32 = 1e-5;

/// Easing curve applied to transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// `1 - (1 - t)^2`, the usual tweening default.
    #[default]
    QuadOut,
    CubicInOut,
}

impl Easing {
    /// Map linear progress in `[0, 1]` onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Values a transition can interpolate.
pub trait Lerp: Copy + PartialEq + std::fmt::Debug {
    fn lerp(self, to: Self, t: f32) -> Self;
    fn approx_eq(self, other: Self) -> bool;
}

impl Lerp for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }

    fn approx_eq(self, other: Self) -> bool {
        (self - other).abs() <= EPSILON
    }
}

impl Lerp for Vec2 {
    fn lerp(self, to: Self, t: f32) -> Self {
        Vec2::lerp(self, to, t)
    }

    fn approx_eq(self, other: Self) -> bool {
        self.abs_diff_eq(other, EPSILON)
    }
}

impl Lerp for Vec3 {
    fn lerp(self, to: Self, t: f32) -> Self {
        Vec3::lerp(self, to, t)
    }

    fn approx_eq(self, other: Self) -> bool {
        self.abs_diff_eq(other, EPSILON)
    }
}

impl Lerp for Color {
    fn lerp(self, to: Self, t: f32) -> Self {
        Color::rgba(
            Lerp::lerp(self.r, to.r, t),
            Lerp::lerp(self.g, to.g, t),
            Lerp::lerp(self.b, to.b, t),
            Lerp::lerp(self.a, to.a, t),
        )
    }

    fn approx_eq(self, other: Self) -> bool {
        self.r.approx_eq(other.r)
            && self.g.approx_eq(other.g)
            && self.b.approx_eq(other.b)
            && self.a.approx_eq(other.a)
    }
}

/// A time-bounded interpolation from `start` to `target`.
///
/// Pure with respect to time: `value_at` depends only on its argument, so
/// transitions are deterministic under a scripted clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasedTransition<T> {
    start: T,
    target: T,
    duration: f32,
    start_time: f32,
    easing: Easing,
}

impl<T: Lerp> EasedTransition<T> {
    pub fn new(start: T, target: T, duration: f32, start_time: f32, easing: Easing) -> Self {
        Self {
            start,
            target,
            duration: if duration.is_finite() { duration.max(0.0) } else { 0.0 },
            start_time,
            easing,
        }
    }

    pub fn start(&self) -> T {
        self.start
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    /// Linear progress in `[0, 1]`; zero-length transitions are complete.
    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: f32) -> bool {
        self.progress(now) >= 1.0
    }

    /// Interpolated value at `now`; exactly `target` once finished.
    pub fn value_at(&self, now: f32) -> T {
        let p = self.progress(now);
        if p >= 1.0 {
            self.target
        } else {
            self.start.lerp(self.target, self.easing.apply(p))
        }
    }
}

/// Whether a request for `target` should replace the current state.
///
/// Re-requesting the target already in flight, or the value already settled,
/// is a no-op; any other target restarts from the current value.
fn needs_restart<T: Lerp>(active: Option<&EasedTransition<T>>, current: T, target: T) -> bool {
    match active {
        Some(t) => !t.target().approx_eq(target),
        None => !current.approx_eq(target),
    }
}

/// A value with at most one in-flight transition.
///
/// State machine: `Idle -> Transitioning(target) -> Idle`.
#[derive(Debug, Clone, Copy)]
pub struct Animated<T> {
    value: T,
    active: Option<EasedTransition<T>>,
}

impl<T: Lerp> Animated<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            active: None,
        }
    }

    pub fn value(&self) -> T {
        self.value
    }

    /// Where the value is heading: the in-flight target, or the value itself.
    pub fn target(&self) -> T {
        self.active.map_or(self.value, |t| t.target())
    }

    pub fn is_transitioning(&self) -> bool {
        self.active.is_some()
    }

    /// Overwrite the value and drop any transition.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.active = None;
    }

    /// Start moving toward `target`. Returns `true` if a new transition began.
    pub fn retarget(&mut self, target: T, duration: f32, now: f32, easing: Easing) -> bool {
        if !needs_restart(self.active.as_ref(), self.value, target) {
            return false;
        }
        self.active = Some(EasedTransition::new(self.value, target, duration, now, easing));
        true
    }

    /// Advance to `now`, settling when the transition completes.
    pub fn advance(&mut self, now: f32) -> T {
        if let Some(t) = self.active {
            self.value = t.value_at(now);
            if t.is_finished(now) {
                self.active = None;
            }
        }
        self.value
    }
}

/// In-flight transitions of scalar uniforms, at most one per uniform.
#[derive(Debug, Clone, Default)]
pub struct UniformTransitions {
    active: BTreeMap<UniformName, EasedTransition<f32>>,
    easing: Easing,
}

impl UniformTransitions {
    pub fn new(easing: Easing) -> Self {
        Self {
            active: BTreeMap::new(),
            easing,
        }
    }

    /// Start moving a scalar uniform toward `target`, superseding any
    /// transition of the same uniform. The target is clamped to the
    /// uniform's range, so a settled transition ends exactly on it.
    /// Returns `true` if a new one began.
    pub fn start(
        &mut self,
        uniforms: &UniformSet,
        name: UniformName,
        target: f32,
        duration: f32,
        now: f32,
    ) -> bool {
        let Some(current) = uniforms.scalar(name) else {
            return false;
        };
        if !target.is_finite() {
            return false;
        }
        let target = uniforms.range(name).map_or(target, |r| r.clamp(target));
        if !needs_restart(self.active.get(&name), current, target) {
            return false;
        }
        tracing::debug!(uniform = %name, from = current, to = target, duration, "transition started");
        self.active.insert(
            name,
            EasedTransition::new(current, target, duration, now, self.easing),
        );
        true
    }

    pub fn get(&self, name: UniformName) -> Option<&EasedTransition<f32>> {
        self.active.get(&name)
    }

    pub fn is_active(&self, name: UniformName) -> bool {
        self.active.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Write every transition's value at `now` into `uniforms`, dropping
    /// those that have settled.
    pub fn advance(&mut self, now: f32, uniforms: &mut UniformSet) {
        self.active.retain(|name, t| {
            uniforms.set_scalar(*name, t.value_at(now));
            !t.is_finished(now)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniform::{UniformDescriptor, UniformRange};

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn easing_endpoints() {
        for e in [Easing::Linear, Easing::QuadOut, Easing::CubicInOut] {
            assert_eq!(e.apply(0.0), 0.0);
            assert_eq!(e.apply(1.0), 1.0);
            assert_eq!(e.apply(2.0), 1.0);
        }
        assert!(close(Easing::QuadOut.apply(0.5), 0.75));
        assert!(close(Easing::CubicInOut.apply(0.5), 0.5));
    }

    #[test]
    fn value_at_interpolates_then_settles() {
        let t = EasedTransition::new(0.0_f32, 1.8, 0.2, 1.0, Easing::Linear);
        assert_eq!(t.value_at(0.5), 0.0);
        assert!(close(t.value_at(1.1), 0.9));
        assert_eq!(t.value_at(1.2), 1.8);
        assert_eq!(t.value_at(50.0), 1.8);
        assert!(t.is_finished(1.2));
        assert!(!t.is_finished(1.19));
    }

    #[test]
    fn zero_duration_is_immediate() {
        let t = EasedTransition::new(Vec3::ZERO, Vec3::ONE, 0.0, 3.0, Easing::QuadOut);
        assert_eq!(t.value_at(3.0), Vec3::ONE);
        let t = EasedTransition::new(0.0_f32, 1.0, f32::NAN, 0.0, Easing::QuadOut);
        assert_eq!(t.duration(), 0.0);
    }

    #[test]
    fn animated_state_machine() {
        let mut a = Animated::new(Vec3::new(0.0, 10.0, 10.0));
        assert!(!a.is_transitioning());

        assert!(a.retarget(Vec3::new(2.0, 15.0, 15.0), 1.0, 0.0, Easing::QuadOut));
        assert!(a.is_transitioning());
        a.advance(0.5);
        assert!(a.value().y > 10.0 && a.value().y < 15.0);

        a.advance(1.0);
        assert_eq!(a.value(), Vec3::new(2.0, 15.0, 15.0));
        assert!(!a.is_transitioning());
    }

    #[test]
    fn same_target_does_not_restart() {
        let mut a = Animated::new(0.0_f32);
        assert!(a.retarget(1.0, 1.0, 0.0, Easing::Linear));
        assert!(!a.retarget(1.0, 1.0, 0.5, Easing::Linear));
        a.advance(1.0);
        assert_eq!(a.value(), 1.0);
        // already settled at the target
        assert!(!a.retarget(1.0, 1.0, 2.0, Easing::Linear));
    }

    #[test]
    fn new_target_restarts_from_current_value() {
        let mut a = Animated::new(0.0_f32);
        a.retarget(1.0, 1.0, 0.0, Easing::Linear);
        a.advance(0.5);
        assert!(a.retarget(0.0, 1.0, 0.5, Easing::Linear));
        // restarted from 0.5, no blending with the old target
        assert!(close(a.advance(0.5), 0.5));
        assert!(close(a.advance(1.0), 0.25));
        assert_eq!(a.advance(1.5), 0.0);
    }

    #[test]
    fn color_lerp_midpoint() {
        let c = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert!(c.approx_eq(Color::rgb(0.5, 0.5, 0.5)));
    }

    fn uniforms() -> UniformSet {
        UniformSet::new([
            UniformDescriptor::scalar(UniformName::Time, 0.0),
            UniformDescriptor::scalar(UniformName::NoiseDensity, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn uniform_transition_supersedes() {
        let mut set = uniforms();
        let mut tr = UniformTransitions::new(Easing::Linear);
        assert!(tr.start(&set, UniformName::NoiseDensity, 1.8, 0.2, 0.0));
        assert!(tr.start(&set, UniformName::NoiseDensity, 1.5, 0.2, 0.0));
        assert_eq!(tr.len(), 1);
        assert_eq!(tr.get(UniformName::NoiseDensity).unwrap().target(), 1.5);

        tr.advance(0.2, &mut set);
        assert_eq!(set.scalar(UniformName::NoiseDensity), Some(1.5));
        assert!(tr.is_empty());
    }

    #[test]
    fn uniform_transition_ignores_unknown_and_settled() {
        let set = uniforms();
        let mut tr = UniformTransitions::default();
        assert!(!tr.start(&set, UniformName::Speed, 1.0, 0.2, 0.0));
        assert!(!tr.start(&set, UniformName::NoiseDensity, 0.0, 0.2, 0.0));
        assert!(!tr.start(&set, UniformName::NoiseDensity, f32::NAN, 0.2, 0.0));
        assert!(tr.is_empty());
    }

    #[test]
    fn out_of_range_target_settles_on_the_bound() {
        let mut set = UniformSet::new([
            UniformDescriptor::scalar(UniformName::Time, 0.0),
            UniformDescriptor::ranged(
                UniformName::NoiseDensity,
                0.0,
                UniformRange::new(0.0, 10.0, 0.001),
            ),
        ])
        .unwrap();
        let mut tr = UniformTransitions::new(Easing::Linear);
        assert!(tr.start(&set, UniformName::NoiseDensity, 12.0, 0.2, 0.0));
        assert_eq!(tr.get(UniformName::NoiseDensity).unwrap().target(), 10.0);

        let mut restarts = 0;
        for i in 1..=50 {
            let now = i as f32 * 0.5;
            if tr.start(&set, UniformName::NoiseDensity, 12.0, 0.2, now) {
                restarts += 1;
            }
            tr.advance(now, &mut set);
        }
        assert_eq!(restarts, 0);
        assert!(tr.is_empty());
        assert_eq!(set.scalar(UniformName::NoiseDensity), Some(10.0));
    }
}
