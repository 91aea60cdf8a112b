//! Time-driven decorations: the overlay sprite tween and the particle field.
//!
//! Both are pure functions of the simulation clock so a replayed run draws
//! the same frames.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Quadratic ease-out on a normalized progress in `[0, 1]`.
pub fn quadratic_out(k: f64) -> f64 {
    let k = k.clamp(0.0, 1.0);
    k * (2.0 - k)
}

/// Ping-pong tween of the overlay sprite between two screen anchors.
///
/// Each cycle waits `delay`, eases `from -> to`, then eases `to -> from`.
/// Anchors are in normalized overlay units, `(-1, 1)` being the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteTween {
    pub from: Vec2,
    pub to: Vec2,
    /// Seconds for one leg.
    pub duration: f64,
    /// Seconds held at `from` before every outbound leg.
    pub delay: f64,
}

impl Default for SpriteTween {
    fn default() -> Self {
        Self {
            from: Vec2::new(-1.0, 1.0),
            to: Vec2::new(-1.0, 0.0),
            duration: 3.0,
            delay: 3.0,
        }
    }
}

impl SpriteTween {
    pub fn period(&self) -> f64 {
        self.delay + 2.0 * self.duration
    }

    /// Sprite anchor at `elapsed` seconds since startup.
    pub fn position(&self, elapsed: f64) -> Vec2 {
        if !(elapsed > 0.0) || !(self.duration > 0.0) {
            return self.from;
        }
        let phase = elapsed % self.period();
        if phase < self.delay {
            return self.from;
        }
        let leg = phase - self.delay;
        if leg < self.duration {
            let k = quadratic_out(leg / self.duration) as f32;
            self.from.lerp(self.to, k)
        } else {
            let k = quadratic_out((leg - self.duration) / self.duration) as f32;
            self.to.lerp(self.from, k)
        }
    }
}

/// Slowly spinning cloud of additive sprites around the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleField {
    pub count: u32,
    /// Half-width of the cube the particles are scattered in.
    pub extent: f32,
    /// Radians of yaw per second of simulation.
    pub spin: f32,
    yaw: f32,
}

impl Default for ParticleField {
    fn default() -> Self {
        Self {
            count: 1000,
            extent: 1000.0,
            spin: 0.1,
            yaw: 0.0,
        }
    }
}

impl ParticleField {
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn advance(&mut self, delta: f32) {
        self.yaw = (self.yaw + delta * self.spin) % std::f32::consts::TAU;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn easing_endpoints() {
        assert_eq!(quadratic_out(0.0), 0.0);
        assert_eq!(quadratic_out(1.0), 1.0);
        assert_eq!(quadratic_out(0.5), 0.75);
        assert_eq!(quadratic_out(7.0), 1.0);
    }

    #[test]
    fn sprite_waits_then_descends_then_returns() {
        let tween = SpriteTween::default();
        assert_eq!(tween.position(0.0), Vec2::new(-1.0, 1.0));
        assert_eq!(tween.position(2.9), Vec2::new(-1.0, 1.0));
        // halfway down the first leg, eased
        assert!(close(tween.position(4.5), Vec2::new(-1.0, 0.25)));
        assert!(close(tween.position(5.999_999), Vec2::new(-1.0, 0.0)));
        // halfway back up
        assert!(close(tween.position(7.5), Vec2::new(-1.0, 0.75)));
    }

    #[test]
    fn sprite_cycle_repeats_with_delay() {
        let tween = SpriteTween::default();
        assert_eq!(tween.period(), 9.0);
        assert!(close(tween.position(9.0 + 4.5), tween.position(4.5)));
        assert_eq!(tween.position(9.0 + 1.0), Vec2::new(-1.0, 1.0));
        assert_eq!(tween.position(f64::NAN), Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn particles_spin_with_time() {
        let mut field = ParticleField::default();
        field.advance(2.0);
        assert!((field.yaw() - 0.2).abs() < 1e-6);
        assert_eq!(field.count, 1000);
    }
}
