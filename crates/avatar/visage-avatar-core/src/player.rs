//! Audio-clock-driven keyframe playback.
//!
//! While playing, the sampled pose is a pure function of the most recent
//! audio position: the wall clock never advances the cursor, so a stalled
//! audio pipeline holds the face instead of letting it run ahead. Only the
//! transient blend-to-neutral window consumes scheduler time.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::pose::{lerp_f32, lerp_slice};
use crate::track::{KeyFrame, Track};

/// Playback state of the keyframe player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No playback; weights stay wherever they were left.
    #[default]
    Stopped,
    /// Sampling the track at the external audio cursor.
    Playing,
    /// Cursor ignored; the last sampled pose holds.
    Paused,
    /// Easing every face weight to zero over a fixed window.
    BlendingOut,
}

impl PlaybackState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::BlendingOut => "blending_out",
        }
    }

    /// True while the track cursor is live.
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// True whenever a tick may write face weights.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Stopped)
    }

    pub fn can_toggle_pause(&self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}

/// What a player tick produced, for the caller to route.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickEffect {
    /// Auxiliary head-nod sample, present when a segment was interpolated.
    pub aux: Option<f32>,
    /// The blend-to-neutral window finished on this tick.
    pub blend_completed: bool,
}

/// Plays a [`Track`] against an externally supplied audio position.
#[derive(Debug, Clone)]
pub struct KeyframePlayer {
    track: Track,
    state: PlaybackState,
    /// Keyframe grid spacing captured by [`KeyframePlayer::start`].
    step_ms: u32,
    /// Last written audio position, milliseconds.
    audio_ms: u32,
    /// Last interpolated auxiliary (nod) value.
    aux: f32,
    blend_out_ms: f32,
    blend_timeline_ms: f32,
    blend_source: Vec<f32>,
}

impl KeyframePlayer {
    pub fn new(blend_out_ms: f32) -> Self {
        Self {
            track: Track::new(),
            state: PlaybackState::Stopped,
            step_ms: 0,
            audio_ms: 0,
            aux: 0.0,
            blend_out_ms,
            blend_timeline_ms: 0.0,
            blend_source: Vec::new(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn audio_time(&self) -> u32 {
        self.audio_ms
    }

    /// Last auxiliary (nod) sample; zeroed by [`KeyframePlayer::stop`].
    pub fn aux(&self) -> f32 {
        self.aux
    }

    /// Replaces the track and resets to `Stopped`.
    pub fn set_track(&mut self, track: Track) {
        self.track = track;
        self.stop();
    }

    /// Drops every key and resets to `Stopped`.
    pub fn clear_track(&mut self) {
        self.track.clear();
        self.stop();
    }

    /// Appends a key in time order. Playback state is left alone, so a
    /// pipeline may keep streaming keys while the track plays.
    pub fn add_key(&mut self, key: KeyFrame) {
        self.track.push_key(key);
    }

    /// Feed of the external audio clock, milliseconds since playback start.
    pub fn set_audio_time(&mut self, ms: u32) {
        self.audio_ms = ms;
    }

    /// Starts sampling. Refuses tracks that cannot define a step size:
    /// fewer than two keys, or a first segment of zero length.
    pub fn start(&mut self) -> bool {
        let step = match self.track.step_size() {
            Some(step) => step,
            None => {
                warn!(
                    "playback start ignored: track has {} keys, need at least 2",
                    self.track.len()
                );
                return false;
            }
        };
        if step == 0 {
            warn!("playback start ignored: first two keys share a timestamp");
            return false;
        }
        self.step_ms = step;
        self.blend_timeline_ms = 0.0;
        self.state = PlaybackState::Playing;
        debug!(
            "playback started: {} keys, {} ms step, {} ms total",
            self.track.len(),
            step,
            self.track.last_frame_time()
        );
        true
    }

    /// Halts playback and zeroes the cursor and the auxiliary channel. The
    /// face weights stay wherever the last tick put them.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.audio_ms = 0;
        self.aux = 0.0;
        self.blend_timeline_ms = 0.0;
    }

    /// Flips `Playing` and `Paused`, but only while the cursor sits strictly
    /// inside the track. At the boundaries (not yet started, or past the
    /// last key) the toggle is a no-op.
    pub fn toggle_pause(&mut self) {
        if !self.state.can_toggle_pause() {
            return;
        }
        if self.audio_ms > 0 && self.audio_ms < self.track.last_frame_time() {
            self.state = match self.state {
                PlaybackState::Playing => PlaybackState::Paused,
                _ => PlaybackState::Playing,
            };
            debug!("playback {} at {} ms", self.state.name(), self.audio_ms);
        }
    }

    /// Stops playback and starts easing from `face` (captured here) down to
    /// all zeros over the configured window.
    pub fn blend_to_neutral(&mut self, face: &[f32]) {
        self.stop();
        self.blend_source.clear();
        self.blend_source.extend_from_slice(face);
        self.state = PlaybackState::BlendingOut;
    }

    /// Advances one tick, writing into `face` when there is something to
    /// write. `dt_ms` only matters to the blend-out window.
    pub fn tick(&mut self, dt_ms: f32, face: &mut [f32]) -> TickEffect {
        let mut effect = TickEffect::default();
        match self.state {
            PlaybackState::Stopped | PlaybackState::Paused => {}
            PlaybackState::Playing => {
                let index = (self.audio_ms / self.step_ms) as usize;
                let (Some(a), Some(b)) = (self.track.get(index), self.track.get(index + 1)) else {
                    // Past the last segment: hold the pose, stay Playing.
                    return effect;
                };
                let span = b.time.saturating_sub(a.time) as f32;
                if span <= 0.0 {
                    return effect;
                }
                let t = self.audio_ms.saturating_sub(a.time) as f32 / span;
                // Poses that do not cover the face space are skipped, the
                // same silent guard the definition loader enforces up front.
                if a.pose.face.len() == face.len() && b.pose.face.len() == face.len() {
                    lerp_slice(&a.pose.face, &b.pose.face, t, face);
                    self.aux = lerp_f32(a.aux, b.aux, t);
                    effect.aux = Some(self.aux);
                }
            }
            PlaybackState::BlendingOut => {
                self.blend_timeline_ms += dt_ms;
                let t = (self.blend_timeline_ms / self.blend_out_ms).min(1.0);
                if self.blend_source.len() == face.len() {
                    for (o, &s) in face.iter_mut().zip(&self.blend_source) {
                        *o = s * (1.0 - t);
                    }
                }
                if self.blend_timeline_ms >= self.blend_out_ms {
                    self.state = PlaybackState::Stopped;
                    self.blend_timeline_ms = 0.0;
                    effect.blend_completed = true;
                    debug!("blend to neutral complete");
                }
            }
        }
        effect
    }
}
