//! Procedural idle motion: gaze wander and head sway.
//!
//! Both generators pick a random target inside an angular budget, ease
//! toward it exponentially, and re-sample on a timer. The current offset
//! is layered onto the rig at compose time and never touches the user-set
//! rotations.

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::config::{GazeTuning, SwayTuning};

fn ease_alpha(dt_ms: f32, tau_ms: f32) -> f32 {
    1.0 - (-dt_ms / tau_ms).exp()
}

fn jitter(rng: &mut impl Rng, range: f32) -> f32 {
    (rng.random::<f32>() * 2.0 - 1.0) * range
}

/// Smoothed random eye wander, in degrees of pitch and yaw.
#[derive(Debug, Clone)]
pub struct GazeWander {
    tuning: GazeTuning,
    target: Vec2,
    current: Vec2,
    countdown_ms: f32,
}

impl GazeWander {
    pub fn new(tuning: GazeTuning) -> Self {
        Self {
            tuning,
            target: Vec2::ZERO,
            current: Vec2::ZERO,
            countdown_ms: 0.0,
        }
    }

    pub fn offset(&self) -> Vec2 {
        self.current
    }

    pub fn update(&mut self, dt_ms: f32) {
        if !self.tuning.enabled {
            return;
        }
        self.countdown_ms -= dt_ms;
        if self.countdown_ms <= 0.0 {
            self.countdown_ms = self.tuning.resample_ms;
            let mut rng = rand::rng();
            self.target = Vec2::new(
                jitter(&mut rng, self.tuning.range_deg[0]),
                jitter(&mut rng, self.tuning.range_deg[1]),
            );
        }
        let alpha = ease_alpha(dt_ms, self.tuning.smoothing_tau_ms);
        self.current += (self.target - self.current) * alpha;
    }
}

/// Idle head sway with an independent timer per axis, so pitch, yaw and
/// roll drift out of phase instead of bobbing in lockstep.
#[derive(Debug, Clone)]
pub struct HeadSway {
    tuning: SwayTuning,
    enabled: bool,
    target: Vec3,
    current: Vec3,
    countdown_ms: [f32; 3],
}

impl HeadSway {
    pub fn new(tuning: SwayTuning) -> Self {
        Self {
            enabled: tuning.enabled,
            tuning,
            target: Vec3::ZERO,
            current: Vec3::ZERO,
            countdown_ms: [0.0; 3],
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning sway off keeps updating the ease toward zero, so the head
    /// settles instead of freezing mid-lean.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.target = Vec3::ZERO;
        }
    }

    pub fn tuning(&self) -> &SwayTuning {
        &self.tuning
    }

    pub fn set_range(&mut self, pitch_deg: f32, yaw_deg: f32, roll_deg: f32) {
        self.tuning.range_deg = [pitch_deg, yaw_deg, roll_deg];
    }

    /// Speed per axis in `[0, 1]`: 0 re-targets every 20 s, 1 every second.
    pub fn set_speed(&mut self, pitch: f32, yaw: f32, roll: f32) {
        for (slot, speed) in self.tuning.interval_ms.iter_mut().zip([pitch, yaw, roll]) {
            let s = speed.clamp(0.0, 1.0);
            *slot = (1.0 - s) * 19000.0 + 1000.0;
        }
    }

    pub fn offset(&self) -> Vec3 {
        self.current
    }

    pub fn update(&mut self, dt_ms: f32) {
        if self.enabled {
            let mut rng = rand::rng();
            for axis in 0..3 {
                self.countdown_ms[axis] -= dt_ms;
                if self.countdown_ms[axis] <= 0.0 {
                    self.countdown_ms[axis] = self.tuning.interval_ms[axis];
                    self.target[axis] = jitter(&mut rng, self.tuning.range_deg[axis]);
                }
            }
        }
        let alpha = ease_alpha(dt_ms, self.tuning.smoothing_tau_ms);
        self.current += (self.target - self.current) * alpha;
    }
}
