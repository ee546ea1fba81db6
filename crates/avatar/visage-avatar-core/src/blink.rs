//! Procedural blinking.
//!
//! A blink is a fixed four-phase envelope on the two eyelid slots: close,
//! hold, reopen, rest. Whatever weights those slots held when the blink
//! began are treated as the floor; the envelope rides on top of them and
//! the exact floor values come back when the blink ends, so an emotion
//! that half-closes the eyes survives a blink untouched.

use log::debug;
use rand::Rng;

use crate::config::BlinkTuning;

/// Phase boundaries on the blink timeline, milliseconds. Nothing is
/// written during the lead-in before the first boundary.
pub const BLINK_TIMING_MS: [f32; 4] = [200.0, 400.0, 450.0, 600.0];

/// Eyelid targets at the corresponding boundaries: closed between the
/// second and third, open again at the last.
pub const BLINK_TARGETS: [f32; 4] = [0.0, 1.0, 1.0, 0.0];

/// Drives the two blink slots of the face weight vector.
#[derive(Debug, Clone)]
pub struct Blinker {
    enabled: bool,
    left_slot: usize,
    right_slot: usize,
    tuning: BlinkTuning,
    /// Milliseconds into the current blink envelope.
    timeline_ms: f32,
    phase: usize,
    /// Time left until the next blink starts. Zero or below means a blink
    /// is due (or running).
    countdown_ms: f32,
    /// Slot values captured when the current blink began.
    baseline: [f32; 2],
}

impl Blinker {
    pub fn new(left_slot: usize, right_slot: usize, tuning: BlinkTuning) -> Self {
        Self {
            enabled: false,
            left_slot,
            right_slot,
            tuning,
            timeline_ms: 0.0,
            phase: 0,
            countdown_ms: 0.0,
            baseline: [0.0; 2],
        }
    }

    pub fn slots(&self) -> (usize, usize) {
        (self.left_slot, self.right_slot)
    }

    pub fn set_slots(&mut self, left: usize, right: usize) {
        self.left_slot = left;
        self.right_slot = right;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn time_to_next_blink(&self) -> f32 {
        self.countdown_ms
    }

    /// Enables blinking with an immediate first blink.
    pub fn start(&mut self) {
        self.enabled = true;
        self.timeline_ms = 0.0;
        self.phase = 0;
        self.countdown_ms = 0.0;
        debug!(
            "blinker enabled on slots ({}, {})",
            self.left_slot, self.right_slot
        );
    }

    /// Freezes the blinker. Slots keep their current values.
    pub fn stop(&mut self) {
        self.enabled = false;
    }

    pub fn update(&mut self, dt_ms: f32, face: &mut [f32]) {
        if !self.enabled {
            return;
        }
        if self.countdown_ms > 0.0 {
            self.countdown_ms -= dt_ms;
            return;
        }
        let (l, r) = (self.left_slot, self.right_slot);
        if l >= face.len() || r >= face.len() {
            return;
        }

        if self.timeline_ms == 0.0 {
            self.baseline = [face[l], face[r]];
        }
        self.timeline_ms += dt_ms;
        if self.timeline_ms <= BLINK_TIMING_MS[0] {
            return;
        }

        let from = BLINK_TIMING_MS[self.phase];
        let to = BLINK_TIMING_MS[self.phase + 1];
        let direction = BLINK_TARGETS[self.phase + 1] - BLINK_TARGETS[self.phase];
        let progress = (self.timeline_ms - from) / (to - from);
        let weight = if direction > 0.0 {
            progress
        } else if direction < 0.0 {
            1.0 - progress
        } else {
            1.0
        };
        let weight = weight.clamp(0.0, 1.0);

        // The envelope rides on the captured floor per eye.
        face[l] = weight + (1.0 - weight) * self.baseline[0];
        face[r] = weight + (1.0 - weight) * self.baseline[1];

        if self.timeline_ms >= to && self.phase != BLINK_TIMING_MS.len() - 2 {
            self.phase += 1;
        }
        if self.timeline_ms >= BLINK_TIMING_MS[BLINK_TIMING_MS.len() - 1] {
            face[l] = self.baseline[0];
            face[r] = self.baseline[1];
            self.timeline_ms = 0.0;
            self.phase = 0;
            self.countdown_ms = self.next_interval();
        }
    }

    fn next_interval(&self) -> f32 {
        let mut rng = rand::rng();
        let jitter = (rng.random::<f32>() * 2.0 - 1.0) * self.tuning.jitter_ms;
        self.tuning.base_interval_ms + jitter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blinker() -> Blinker {
        let mut b = Blinker::new(0, 1, BlinkTuning::default());
        b.start();
        b
    }

    /// Steps in 50 ms ticks until the blink timeline reaches `target_ms`.
    fn run_to(b: &mut Blinker, face: &mut [f32], target_ms: f32) {
        let mut elapsed = 0.0;
        while elapsed < target_ms {
            b.update(50.0, face);
            elapsed += 50.0;
        }
    }

    #[test]
    fn test_lead_in_writes_nothing() {
        let mut b = blinker();
        let mut face = [0.25, 0.25, 0.9];
        run_to(&mut b, &mut face, 200.0);
        assert_eq!(face, [0.25, 0.25, 0.9]);
    }

    #[test]
    fn test_blink_closes_holds_and_reopens() {
        let mut b = blinker();
        let mut face = [0.0, 0.0];

        run_to(&mut b, &mut face, 300.0);
        assert_eq!(face, [0.5, 0.5]);

        run_to(&mut b, &mut face, 150.0); // timeline 450, inside the hold
        assert_eq!(face, [1.0, 1.0]);

        run_to(&mut b, &mut face, 150.0); // timeline 600, envelope done
        assert_eq!(face, [0.0, 0.0]);
        assert!(b.time_to_next_blink() > 0.0);
    }

    #[test]
    fn test_baseline_is_restored_exactly() {
        let mut b = blinker();
        let mut face = [0.3, 0.7];
        run_to(&mut b, &mut face, 600.0);
        assert_eq!(face, [0.3, 0.7]);
    }

    #[test]
    fn test_envelope_never_dips_below_the_baseline() {
        let mut b = blinker();
        let mut face = [0.4, 0.4];
        let mut elapsed = 0.0;
        while elapsed < 600.0 {
            b.update(10.0, &mut face);
            elapsed += 10.0;
            assert!(face[0] >= 0.4 - 1e-6, "dipped to {} at {} ms", face[0], elapsed);
        }
    }

    #[test]
    fn test_next_blink_lands_inside_the_jitter_window() {
        let mut b = blinker();
        let mut face = [0.0, 0.0];
        run_to(&mut b, &mut face, 600.0);
        let pause = b.time_to_next_blink();
        assert!((2700.0..=3700.0).contains(&pause), "pause was {pause}");
    }

    #[test]
    fn test_disabled_blinker_is_inert() {
        let mut b = Blinker::new(0, 1, BlinkTuning::default());
        let mut face = [0.0, 0.0];
        for _ in 0..100 {
            b.update(16.0, &mut face);
        }
        assert_eq!(face, [0.0, 0.0]);
    }

    #[test]
    fn test_out_of_range_slots_are_skipped() {
        let mut b = Blinker::new(5, 6, BlinkTuning::default());
        b.start();
        let mut face = [0.0, 0.0];
        run_to(&mut b, &mut face, 600.0);
        assert_eq!(face, [0.0, 0.0]);
    }
}
