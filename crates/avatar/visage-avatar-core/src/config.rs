//! Core configuration for visage-avatar-core.

use serde::{Deserialize, Serialize};

/// Tuning knobs for the avatar update loop and procedural motion.
/// Keep this minimal in v1; expand as needed without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Target animation rate in ticks per second.
    pub tick_hz: f32,

    /// Length of the blend-to-neutral window in milliseconds.
    pub blend_out_ms: f32,

    pub blink: BlinkTuning,
    pub gaze: GazeTuning,
    pub sway: SwayTuning,
}

/// Procedural blink cadence.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BlinkTuning {
    /// Mean pause between blinks in milliseconds.
    pub base_interval_ms: f32,
    /// Uniform jitter applied to the pause, +/- this many milliseconds.
    pub jitter_ms: f32,
}

/// Procedural eye wander.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GazeTuning {
    pub enabled: bool,
    /// Pause between gaze target changes in milliseconds.
    pub resample_ms: f32,
    /// Angular budget around straight ahead, degrees: [pitch, yaw].
    pub range_deg: [f32; 2],
    /// Time constant of the exponential ease toward the target.
    pub smoothing_tau_ms: f32,
}

/// Idle head sway. Off by default; demos turn it on.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SwayTuning {
    pub enabled: bool,
    /// Angular budget per axis, degrees: [pitch, yaw, roll].
    pub range_deg: [f32; 3],
    /// Pause between sway target changes per axis, milliseconds.
    pub interval_ms: [f32; 3],
    /// Time constant of the exponential ease toward the target.
    pub smoothing_tau_ms: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            blend_out_ms: 500.0,
            blink: BlinkTuning::default(),
            gaze: GazeTuning::default(),
            sway: SwayTuning::default(),
        }
    }
}

impl Default for BlinkTuning {
    fn default() -> Self {
        Self {
            base_interval_ms: 3200.0,
            jitter_ms: 500.0,
        }
    }
}

impl Default for GazeTuning {
    fn default() -> Self {
        Self {
            enabled: true,
            resample_ms: 3800.0,
            range_deg: [3.0, 5.0],
            smoothing_tau_ms: 350.0,
        }
    }
}

impl Default for SwayTuning {
    fn default() -> Self {
        Self {
            enabled: false,
            range_deg: [5.0, 10.0, 3.0],
            interval_ms: [10000.0, 9000.0, 11000.0],
            smoothing_tau_ms: 900.0,
        }
    }
}
