// tween.rs - frame-driven value interpolation with start delay and easing

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    QuarticOut,
}

impl Easing {
    pub fn apply(self, k: f32) -> f32 {
        let k = k.clamp(0.0, 1.0);
        match self {
            Easing::Linear => k,
            Easing::QuarticOut => {
                let inv = 1.0 - k;
                1.0 - inv * inv * inv * inv
            }
        }
    }
}

/// What happened to a tween during one `advance` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenStep {
    /// The delay ran out during this call.
    pub started: bool,
    /// The tween reached its end during this call.
    pub completed: bool,
    /// Current interpolated value.
    pub value: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: Duration,
    delay: Duration,
    elapsed: Duration,
    easing: Easing,
    started: bool,
    completed: bool,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            delay: Duration::ZERO,
            elapsed: Duration::ZERO,
            easing: Easing::default(),
            started: false,
            completed: false,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn value(&self) -> f32 {
        if !self.started {
            return self.from;
        }
        let k = if self.duration.is_zero() {
            1.0
        } else {
            let active = self.elapsed.saturating_sub(self.delay);
            active.as_secs_f32() / self.duration.as_secs_f32()
        };
        self.from + (self.to - self.from) * self.easing.apply(k)
    }

    /// Moves the clock forward. `started` and `completed` are edges: each is
    /// reported by exactly one call.
    pub fn advance(&mut self, dt: Duration) -> TweenStep {
        if self.completed {
            return TweenStep {
                started: false,
                completed: false,
                value: self.to,
            };
        }

        self.elapsed += dt;

        let mut step = TweenStep {
            started: false,
            completed: false,
            value: self.from,
        };

        if !self.started && self.elapsed >= self.delay {
            self.started = true;
            step.started = true;
        }

        if self.started && self.elapsed >= self.delay + self.duration {
            self.completed = true;
            step.completed = true;
        }

        step.value = if self.completed { self.to } else { self.value() };
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn quartic_out_curve() {
        let e = Easing::QuarticOut;
        assert_eq!(e.apply(0.0), 0.0);
        assert_eq!(e.apply(1.0), 1.0);
        assert!((e.apply(0.5) - 0.9375).abs() < 1e-6);
        assert_eq!(e.apply(2.0), 1.0);
    }

    #[test]
    fn delay_then_run_then_complete() {
        let mut t = Tween::new(0.0, 1.0, ms(500)).with_delay(ms(500));

        let s = t.advance(ms(499));
        assert!(!s.started);
        assert_eq!(s.value, 0.0);

        let s = t.advance(ms(1));
        assert!(s.started);
        assert!(!s.completed);

        let s = t.advance(ms(250));
        assert!(!s.started);
        assert!(s.value > 0.9 && s.value < 1.0);

        let s = t.advance(ms(250));
        assert!(s.completed);
        assert_eq!(s.value, 1.0);

        let s = t.advance(ms(10));
        assert!(!s.completed);
        assert!(t.is_completed());
    }

    #[test]
    fn zero_delay_starts_on_first_tick() {
        let mut t = Tween::new(1.0, 0.0, ms(100)).with_easing(Easing::Linear);
        let s = t.advance(Duration::ZERO);
        assert!(s.started);
        assert_eq!(s.value, 1.0);
        let s = t.advance(ms(50));
        assert!((s.value - 0.5).abs() < 1e-6);
    }

    #[test]
    fn large_step_reports_both_edges() {
        let mut t = Tween::new(0.0, 1.0, ms(100)).with_delay(ms(100));
        let s = t.advance(ms(1000));
        assert!(s.started && s.completed);
        assert_eq!(s.value, 1.0);
    }
}
