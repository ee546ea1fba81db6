//! The per-tick value published to the render side.
//!
//! Geometry never travels here; the render context holds its own
//! `Arc<ShapeGeometry>` clones and blends them with the snapshot's weight
//! vectors. Everything in a snapshot is plain data, cloned wholesale by
//! the triple buffer.

use glam::Mat4;

use visage_avatar_core::avatar::Avatar;
use visage_avatar_core::player::PlaybackState;
use visage_avatar_core::rig::RigTransforms;

/// One published animation frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameSnapshot {
    /// Tick counter since the scheduler started. A renderer can compare
    /// sequences to tell a fresh frame from a re-read.
    pub seq: u64,
    pub face_weights: Vec<f32>,
    pub mouth_weights: Vec<f32>,
    pub transforms: RigTransforms,
    /// Head-nod channel sampled from the playing track, degrees.
    pub aux: f32,
    pub playback: PlaybackState,
    /// Smoothed achieved tick rate, Hz.
    pub tick_hz: f32,
}

impl FrameSnapshot {
    /// Captures the avatar's current outputs under `seq`.
    pub fn capture(avatar: &Avatar, seq: u64, tick_hz: f32) -> Self {
        Self {
            seq,
            face_weights: avatar.face_weights().to_vec(),
            mouth_weights: avatar.mouth_weights().to_vec(),
            transforms: avatar.compose(Mat4::IDENTITY),
            aux: avatar.player().aux(),
            playback: avatar.player().state(),
            tick_hz,
        }
    }
}
