//! The fixed-timestep animation thread.
//!
//! The scheduler owns the [`Avatar`] outright: commands arrive over a
//! channel, the audio position over an atomic, and each tick publishes a
//! [`FrameSnapshot`] into a triple buffer the render side reads without
//! locks. Ticks target the avatar's configured rate (60 Hz by default);
//! an overlong tick forfeits up to [`MAX_FRAME_SKIPS`] frame periods of
//! debt instead of busy-looping to catch up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use visage_avatar_core::avatar::Avatar;

use crate::clock::AudioClock;
use crate::commands::AvatarCommand;
use crate::snapshot::FrameSnapshot;
use crate::timing::TickStats;

/// Most frame periods of debt one overrun may swallow. Anything beyond
/// is forgiven, which drops animation time rather than freezing the loop.
pub const MAX_FRAME_SKIPS: u32 = 5;

/// How many whole frame periods of debt to absorb, capped. Returns the
/// absorbed period count and the forgiven remainder in milliseconds.
fn absorb_overrun(debt_ms: f32, period_ms: f32) -> (u32, f32) {
    let mut skipped = 0;
    let mut debt = debt_ms;
    while debt > 0.0 && skipped < MAX_FRAME_SKIPS {
        debt -= period_ms;
        skipped += 1;
    }
    (skipped, debt.max(0.0))
}

/// Handle on the running animation thread.
///
/// Dropping the handle stops the thread. The last published snapshot
/// stays readable until then, so a stopped avatar holds its final pose
/// instead of snapping to neutral.
pub struct AnimationScheduler {
    command_tx: mpsc::Sender<AvatarCommand>,
    snapshot_out: triple_buffer::Output<FrameSnapshot>,
    clock: AudioClock,
    running: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl AnimationScheduler {
    /// Moves the avatar onto a named animator thread and starts ticking.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] if the thread fails to spawn.
    pub fn spawn(avatar: Avatar) -> Result<Self, std::io::Error> {
        let (command_tx, command_rx) = mpsc::channel::<AvatarCommand>();
        let (snapshot_in, snapshot_out) =
            triple_buffer::triple_buffer(&FrameSnapshot::default());
        let clock = AudioClock::new();
        let running = Arc::new(AtomicBool::new(true));

        let thread_clock = clock.clone();
        let thread_running = Arc::clone(&running);
        let thread = thread::Builder::new()
            .name("visage-animator".into())
            .spawn(move || {
                Self::thread_loop(avatar, command_rx, thread_clock, thread_running, snapshot_in);
            })?;

        Ok(Self {
            command_tx,
            snapshot_out,
            clock,
            running,
            thread: Some(thread),
        })
    }

    /// Queues a control-surface command (non-blocking send).
    pub fn send(&self, command: AvatarCommand) {
        let _ = self.command_tx.send(command);
    }

    /// A clock handle for the audio pipeline to drive.
    pub fn clock(&self) -> AudioClock {
        self.clock.clone()
    }

    /// The most recent published frame. Reading never blocks the
    /// animator; between ticks the same snapshot is returned again.
    pub fn latest(&mut self) -> &FrameSnapshot {
        self.snapshot_out.read()
    }

    /// Stops the animator and waits for it to exit. Safe to call more
    /// than once; later calls do nothing.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
            info!("animator stopped");
        }
    }

    fn thread_loop(
        mut avatar: Avatar,
        command_rx: mpsc::Receiver<AvatarCommand>,
        clock: AudioClock,
        running: Arc<AtomicBool>,
        mut snapshot_in: triple_buffer::Input<FrameSnapshot>,
    ) {
        let tick_hz = avatar.config().tick_hz;
        let period_ms = 1000.0 / tick_hz;
        let period = Duration::from_secs_f32(period_ms / 1000.0);
        let mut stats = TickStats::new(tick_hz);
        let mut seq: u64 = 0;
        let mut last_start = Instant::now();
        info!("animator running at {tick_hz} Hz ({period_ms:.2} ms period)");

        while running.load(Ordering::Relaxed) {
            let start = Instant::now();
            stats.record(start.duration_since(last_start).as_secs_f32() * 1000.0);
            last_start = start;

            while let Ok(command) = command_rx.try_recv() {
                command.apply(&mut avatar);
            }
            avatar.set_audio_time(clock.get());
            avatar.tick(period_ms);

            seq += 1;
            snapshot_in.write(FrameSnapshot::capture(&avatar, seq, stats.smoothed_hz()));

            let elapsed = start.elapsed();
            match period.checked_sub(elapsed) {
                Some(sleep) => thread::sleep(sleep),
                None => {
                    let debt_ms = (elapsed - period).as_secs_f32() * 1000.0;
                    let (skipped, forgiven) = absorb_overrun(debt_ms, period_ms);
                    if forgiven > 0.0 {
                        warn!(
                            "animator overran by {debt_ms:.1} ms: absorbed {skipped} periods, forgave {forgiven:.1} ms"
                        );
                    } else {
                        debug!("animator overran by {debt_ms:.1} ms: absorbed {skipped} periods");
                    }
                }
            }
        }
        debug!("animator loop exited after {seq} ticks");
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: f32 = 1000.0 / 60.0;

    #[test]
    fn test_small_overrun_absorbs_one_period() {
        let (skipped, forgiven) = absorb_overrun(PERIOD * 0.5, PERIOD);
        assert_eq!(skipped, 1);
        assert_eq!(forgiven, 0.0);
    }

    #[test]
    fn test_triple_length_tick_stays_inside_the_cap() {
        // A tick lasting three periods leaves two periods of debt.
        let (skipped, forgiven) = absorb_overrun(PERIOD * 2.0, PERIOD);
        assert_eq!(skipped, 2);
        assert_eq!(forgiven, 0.0);
        assert!(skipped <= MAX_FRAME_SKIPS);
    }

    #[test]
    fn test_huge_debt_is_capped_and_forgiven() {
        let (skipped, forgiven) = absorb_overrun(PERIOD * 20.0, PERIOD);
        assert_eq!(skipped, MAX_FRAME_SKIPS);
        assert!((forgiven - PERIOD * 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_no_debt_skips_nothing() {
        assert_eq!(absorb_overrun(0.0, PERIOD), (0, 0.0));
    }
}
