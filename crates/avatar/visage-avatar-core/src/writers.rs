//! Per-tick writer ordering.
//!
//! Several systems write face weights during one tick. Their order is
//! fixed so overlapping slots resolve the same way every frame: playback
//! first, blinking last. The blinker riding on top is what keeps the eyes
//! blinking mid-speech.

/// The systems that write face weights each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WriterKind {
    /// Keyframe playback, including the blend-to-neutral window.
    Keyframes,
    /// The procedural blink envelope.
    Blink,
}

/// Application order within one tick. Later entries win overlapping slots.
pub const WRITE_ORDER: [WriterKind; 2] = [WriterKind::Keyframes, WriterKind::Blink];
