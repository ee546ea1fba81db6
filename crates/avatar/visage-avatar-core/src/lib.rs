#![allow(dead_code)]
//! Visage Avatar Core (renderer-agnostic)
//!
//! Blendshape face animation for a talking avatar: the weighted-sum mesh
//! blender, audio-clock keyframe playback, procedural blinking and idle
//! motion, face-to-mouth weight coupling, and the scene/head/eyes rig.
//! Rendering and audio decoding live elsewhere; this crate turns an audio
//! position and a handful of commands into weight vectors and transforms.

pub mod avatar;
pub mod blender;
pub mod blink;
pub mod config;
pub mod coupling;
pub mod definition;
pub mod error;
pub mod gaze;
pub mod library;
pub mod mesh;
pub mod player;
pub mod pose;
pub mod rig;
pub mod track;
pub mod writers;

// Re-exports for consumers (runtime, demos)
pub use avatar::{Avatar, VISEME_THRESHOLD};
pub use blender::{evaluate, BlendScratch};
pub use blink::{Blinker, BLINK_TARGETS, BLINK_TIMING_MS};
pub use config::{BlinkTuning, Config, GazeTuning, SwayTuning};
pub use coupling::{CouplingEntry, CouplingTable};
pub use definition::{AnimationDef, AvatarDefinition, BlinkSlots, EyePlacement, KeyDef, NamedPose};
pub use error::VisageError;
pub use gaze::{GazeWander, HeadSway};
pub use library::{NamedLibrary, PoseLibrary, TrackLibrary};
pub use mesh::{BlendShapeMesh, ShapeDelta, ShapeGeometry};
pub use player::{KeyframePlayer, PlaybackState, TickEffect};
pub use pose::FacePose;
pub use rig::{EyePair, HeadEyeRig, RigNode, RigTransforms, MAX_ROTATION_DEG};
pub use track::{KeyFrame, Track};
pub use writers::{WriterKind, WRITE_ORDER};
