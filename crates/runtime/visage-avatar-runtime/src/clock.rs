//! The shared audio position.
//!
//! Lip-sync playback follows wherever the audio pipeline says it is, so
//! the position crosses threads as a single atomic overwrite. There is no
//! queue: only the latest value matters, and a media callback must never
//! block on the animator.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Cloneable handle on the current audio position in milliseconds.
///
/// One clone goes to the playback driver, one to the scheduler. Writes
/// overwrite; a seek or a restart is just another `set`.
#[derive(Clone, Debug, Default)]
pub struct AudioClock {
    ms: Arc<AtomicU32>,
}

impl AudioClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the position. Callable from any thread.
    pub fn set(&self, ms: u32) {
        self.ms.store(ms, Ordering::Relaxed);
    }

    pub fn get(&self) -> u32 {
        self.ms.load(Ordering::Relaxed)
    }
}
