use std::time::Instant;

/// Source of elapsed seconds since the loop started.
pub trait Clock {
    fn elapsed(&self) -> f32;
}

/// Wall clock started at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Scripted clock for headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: f32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.now += dt;
        }
    }

    pub fn set(&mut self, now: f32) {
        self.now = now;
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> f32 {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let mut c = ManualClock::new();
        assert_eq!(c.elapsed(), 0.0);
        c.advance(0.25);
        c.advance(0.25);
        assert_eq!(c.elapsed(), 0.5);
        c.advance(-1.0);
        c.advance(f32::NAN);
        assert_eq!(c.elapsed(), 0.5);
    }

    #[test]
    fn monotonic_clock_never_goes_back() {
        let c = MonotonicClock::start();
        let a = c.elapsed();
        let b = c.elapsed();
        assert!(b >= a);
    }
}
