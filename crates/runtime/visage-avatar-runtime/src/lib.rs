//! Visage Avatar Runtime
//!
//! The execution half of the engine: a named animation thread running the
//! avatar at a fixed 60 Hz timestep, a command channel for the control
//! surface, an atomic audio clock writable from media callbacks, and a
//! lock-free triple-buffered snapshot the render side reads at its own
//! cadence. The core crate stays single-threaded; everything concurrent
//! lives here.

pub mod clock;
pub mod commands;
pub mod scheduler;
pub mod snapshot;
pub mod timing;

pub use clock::AudioClock;
pub use commands::AvatarCommand;
pub use scheduler::{AnimationScheduler, MAX_FRAME_SKIPS};
pub use snapshot::FrameSnapshot;
pub use timing::TickStats;
