//! Time-based value animation with easing curves.

use glint_core::{Color, Vec2};

/// Easing curves mapping `t` in `[0, 1]` to progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    InQuadratic,
    OutQuadratic,
    InOutQuadratic,
    InBack,
    OutBack,
    InOutBack,
    InBounce,
    OutBounce,
    InOutBounce,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::InQuadratic => in_quadratic(t),
            Easing::OutQuadratic => out(in_quadratic, t),
            Easing::InOutQuadratic => in_out(in_quadratic, t),
            Easing::InBack => in_back(t),
            Easing::OutBack => out(in_back, t),
            Easing::InOutBack => in_out(in_back, t),
            Easing::InBounce => out(out_bounce, t),
            Easing::OutBounce => out_bounce(t),
            Easing::InOutBounce => in_out(|t| out(out_bounce, t), t),
        }
    }
}

fn in_quadratic(t: f32) -> f32 {
    t * t
}

fn in_back(t: f32) -> f32 {
    const S: f32 = 1.70158;
    t * t * ((S + 1.0) * t - S)
}

fn out_bounce(t: f32) -> f32 {
    const K: f32 = 7.5625;
    if t < 1.0 / 2.75 {
        K * t * t
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        K * t * t + 0.75
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        K * t * t + 0.9375
    } else {
        let t = t - 2.625 / 2.75;
        K * t * t + 0.984375
    }
}

fn out(f: impl Fn(f32) -> f32, t: f32) -> f32 {
    1.0 - f(1.0 - t)
}

fn in_out(f: impl Fn(f32) -> f32, t: f32) -> f32 {
    if t < 0.5 {
        0.5 * f(2.0 * t)
    } else {
        0.5 + 0.5 * out(&f, 2.0 * t - 1.0)
    }
}

/// Values that can be linearly interpolated.
pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Color {
    fn lerp(self, other: Self, t: f32) -> Self {
        Color::lerp(self, other, t)
    }
}

/// Animates from `start_value` to `end_value` over `duration` seconds.
#[derive(Clone, Debug)]
pub struct ValueAnimation<T: Lerp> {
    pub start_value: T,
    pub end_value: T,
    pub duration: f32,
    pub easing: Easing,
    elapsed: f32,
    active: bool,
}

impl<T: Lerp> ValueAnimation<T> {
    pub fn new(start_value: T, end_value: T, duration: f32, easing: Easing) -> Self {
        Self {
            start_value,
            end_value,
            duration,
            easing,
            elapsed: 0.0,
            active: false,
        }
    }

    pub fn value(&self) -> T {
        let t = if self.duration > 0.0 {
            (self.elapsed / self.duration).min(1.0)
        } else {
            1.0
        };
        self.start_value.lerp(self.end_value, self.easing.apply(t))
    }

    /// Restart from the beginning and return the initial value.
    pub fn start(&mut self) -> T {
        self.elapsed = 0.0;
        self.active = true;
        self.value()
    }

    /// Advance by `elapsed` seconds.  Returns the new value while the
    /// animation is running, `None` once it has finished.
    pub fn update(&mut self, elapsed: f32) -> Option<T> {
        if !self.active || elapsed <= 0.0 {
            return None;
        }
        self.elapsed += elapsed;
        if self.elapsed >= self.duration {
            self.elapsed = self.duration;
            self.active = false;
        }
        Some(self.value())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 10] = [
        Easing::Linear,
        Easing::InQuadratic,
        Easing::OutQuadratic,
        Easing::InOutQuadratic,
        Easing::InBack,
        Easing::OutBack,
        Easing::InOutBack,
        Easing::InBounce,
        Easing::OutBounce,
        Easing::InOutBounce,
    ];

    #[test]
    fn test_easing_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-4, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-4, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_quadratic_midpoints() {
        assert_eq!(Easing::InQuadratic.apply(0.5), 0.25);
        assert_eq!(Easing::OutQuadratic.apply(0.5), 0.75);
        assert_eq!(Easing::InOutQuadratic.apply(0.5), 0.5);
    }

    #[test]
    fn test_animation_runs_to_end() {
        let mut anim = ValueAnimation::new(0.0_f32, 10.0, 0.2, Easing::Linear);
        assert!(anim.update(0.1).is_none());
        assert_eq!(anim.start(), 0.0);
        assert!((anim.update(0.1).unwrap() - 5.0).abs() < 1e-4);
        assert_eq!(anim.update(0.5), Some(10.0));
        assert!(!anim.is_active());
        assert!(anim.update(0.1).is_none());
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut anim = ValueAnimation::new(Vec2::ZERO, Vec2::new(4.0, 2.0), 0.0, Easing::OutBounce);
        anim.start();
        assert_eq!(anim.update(0.016), Some(Vec2::new(4.0, 2.0)));
    }
}
