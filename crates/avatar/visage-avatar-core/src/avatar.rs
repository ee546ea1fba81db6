//! The avatar facade.
//!
//! Owns the face mesh, the mouth meshes (teeth, tongue), the pose and
//! animation libraries, playback, procedural motion, and the rig, and is
//! the only type callers need on the simulation side. One `tick` advances
//! everything in writer order; `compose` hands back the rig transforms for
//! rendering whenever the caller wants them.

use glam::{Mat4, Vec3};
use log::{debug, info, warn};

use crate::blink::Blinker;
use crate::config::Config;
use crate::coupling::CouplingTable;
use crate::definition::AvatarDefinition;
use crate::error::VisageError;
use crate::gaze::{GazeWander, HeadSway};
use crate::library::{PoseLibrary, TrackLibrary};
use crate::mesh::{BlendShapeMesh, ShapeGeometry};
use crate::player::KeyframePlayer;
use crate::pose::FacePose;
use crate::rig::{HeadEyeRig, RigTransforms};
use crate::track::{KeyFrame, Track};
use crate::writers::{WriterKind, WRITE_ORDER};

/// Face weight below which a viseme does not claim a slot. Slots at or
/// under the threshold keep whatever the emotion put there.
pub const VISEME_THRESHOLD: f32 = 0.01;

/// Copies `src` into `dst` when the lengths agree; logs and skips when
/// they do not. Whole-vector writes never resize a weight vector.
fn copy_guarded(dst: &mut [f32], src: &[f32], what: &str) {
    if dst.len() == src.len() {
        dst.copy_from_slice(src);
    } else {
        warn!(
            "{what} skipped: {} weights for {} slots",
            src.len(),
            dst.len()
        );
    }
}

/// A complete animated character.
pub struct Avatar {
    config: Config,
    face: BlendShapeMesh,
    /// Secondary meshes sharing the mouth shape space. All of them receive
    /// identical weight writes.
    mouth: Vec<BlendShapeMesh>,
    mouth_shapes: usize,
    coupling: CouplingTable,
    emotions: PoseLibrary,
    visemes: PoseLibrary,
    animations: TrackLibrary,
    /// Face slots viseme/emotion mixing operates on.
    mouth_region: Vec<usize>,
    player: KeyframePlayer,
    blinker: Blinker,
    rig: HeadEyeRig,
    gaze: GazeWander,
    sway: HeadSway,
}

impl Avatar {
    /// Builds an avatar from validated meshes. All mouth meshes must agree
    /// on a shape count; they are written as one space.
    pub fn new(
        face: BlendShapeMesh,
        mouth: Vec<BlendShapeMesh>,
        config: Config,
    ) -> Result<Self, VisageError> {
        let mouth_shapes = mouth.first().map(|m| m.shape_count()).unwrap_or(0);
        for mesh in &mouth {
            if mesh.shape_count() != mouth_shapes {
                return Err(VisageError::WeightCountMismatch {
                    mesh: mesh.name().to_string(),
                    expected: mouth_shapes,
                    actual: mesh.shape_count(),
                });
            }
        }
        Ok(Self {
            face,
            mouth,
            mouth_shapes,
            coupling: CouplingTable::new(),
            emotions: PoseLibrary::new(),
            visemes: PoseLibrary::new(),
            animations: TrackLibrary::new(),
            mouth_region: Vec::new(),
            player: KeyframePlayer::new(config.blend_out_ms),
            blinker: Blinker::new(0, 0, config.blink),
            rig: HeadEyeRig::new(),
            gaze: GazeWander::new(config.gaze),
            sway: HeadSway::new(config.sway),
            config,
        })
    }

    /// Builds an avatar from a pipeline definition plus its geometry.
    pub fn from_definition(
        definition: &AvatarDefinition,
        face: ShapeGeometry,
        mouth: Vec<ShapeGeometry>,
        config: Config,
    ) -> Result<Self, VisageError> {
        let face = BlendShapeMesh::new(face)?;
        let mouth = mouth
            .into_iter()
            .map(BlendShapeMesh::new)
            .collect::<Result<Vec<_>, _>>()?;

        let mut avatar = Self::new(face, mouth, config)?;
        definition.validate(avatar.face.shape_count(), avatar.mouth_shapes)?;

        if let Some(blink) = &definition.blink {
            avatar.blinker.set_slots(blink.left, blink.right);
        }
        if let Some(eyes) = &definition.eyes {
            avatar.rig.eyes.left_translation = Vec3::from_array(eyes.left);
            avatar.rig.eyes.right_translation = Vec3::from_array(eyes.right);
        }
        avatar.coupling = CouplingTable::from_pairs(
            &definition.couplings,
            avatar.face.shape_count(),
            avatar.mouth_shapes,
        );
        avatar.mouth_region = definition.resolve_mouth_region();
        for pose in &definition.emotions {
            avatar.emotions.insert(
                &pose.name,
                FacePose {
                    face: pose.face.clone(),
                    mouth: pose.mouth.clone(),
                },
            );
        }
        for pose in &definition.visemes {
            avatar.visemes.insert(
                &pose.name,
                FacePose {
                    face: pose.face.clone(),
                    mouth: pose.mouth.clone(),
                },
            );
        }
        for animation in &definition.animations {
            let keys = animation
                .keys
                .iter()
                .map(|k| KeyFrame::with_aux(k.t, FacePose::new(k.face.clone()), k.aux))
                .collect();
            avatar.animations.insert(&animation.name, Track::from_keys(keys));
        }

        info!(
            "avatar '{}' built: {} face shapes, {} mouth shapes across {} meshes, {} couplings, {} animations",
            definition.name,
            avatar.face.shape_count(),
            avatar.mouth_shapes,
            avatar.mouth.len(),
            avatar.coupling.len(),
            avatar.animations.len()
        );
        Ok(avatar)
    }

    // --- simulation ---------------------------------------------------

    /// Advances one animation tick. Writers run in their fixed order, the
    /// coupling table propagates face weights into the mouth space, and the
    /// procedural generators feed the rig.
    pub fn tick(&mut self, dt_ms: f32) {
        for writer in WRITE_ORDER {
            match writer {
                WriterKind::Keyframes => {
                    let effect = self.player.tick(dt_ms, self.face.weights_mut());
                    if effect.blend_completed {
                        self.blinker.start();
                    }
                }
                WriterKind::Blink => self.blinker.update(dt_ms, self.face.weights_mut()),
            }
        }
        self.apply_coupling();

        self.gaze.update(dt_ms);
        self.sway.update(dt_ms);
        let nod = Vec3::new(self.player.aux(), 0.0, 0.0);
        self.rig.head.set_rotation_offset(self.sway.offset() + nod);
    }

    /// World transforms for the current rig state.
    pub fn compose(&self, parent: Mat4) -> RigTransforms {
        self.rig.compose(parent, self.gaze.offset())
    }

    fn apply_coupling(&mut self) {
        let face = self.face.weights();
        for mesh in &mut self.mouth {
            self.coupling.apply(face, mesh.weights_mut());
        }
    }

    // --- keyframe playback ---------------------------------------------

    /// Swaps in a stored animation. The current track is cleared first, so
    /// an unknown name leaves the player empty rather than on stale keys.
    pub fn set_animation(&mut self, name: &str) {
        let track = match self.animations.get(name) {
            Some(track) => track.clone(),
            None => {
                debug!("unknown animation '{name}'");
                Track::new()
            }
        };
        self.player.set_track(track);
    }

    pub fn clear_animation(&mut self) {
        self.player.clear_track();
    }

    /// Starts playback of the loaded track. Returns whether it started.
    pub fn start_animation(&mut self) -> bool {
        self.player.start()
    }

    pub fn stop_animation(&mut self) {
        self.player.stop();
    }

    pub fn toggle_pause(&mut self) {
        self.player.toggle_pause();
    }

    /// Audio position feed, milliseconds since the clip began.
    pub fn set_audio_time(&mut self, ms: u32) {
        self.player.set_audio_time(ms);
    }

    /// Eases the whole face back to neutral and re-enables blinking when
    /// the ease lands.
    pub fn set_neutral_face(&mut self) {
        self.player.blend_to_neutral(self.face.weights());
    }

    /// Appends a key to the live track, keeping time order.
    pub fn add_key(&mut self, time_ms: u32, pose: FacePose, aux: f32) {
        self.player.add_key(KeyFrame::with_aux(time_ms, pose, aux));
    }

    /// Replaces the live track wholesale.
    pub fn set_keys(&mut self, keys: Vec<KeyFrame>) {
        self.player.set_track(Track::from_keys(keys));
    }

    /// Appends a key holding a stored emotion pose.
    pub fn set_emotion_keyframe(&mut self, time_ms: u32, emotion: &str) {
        let Some(pose) = self.emotions.get(emotion) else {
            debug!("unknown emotion '{emotion}' for keyframe at {time_ms} ms");
            return;
        };
        let key = KeyFrame::new(time_ms, pose.clone());
        self.player.add_key(key);
    }

    /// Stores a named track for later [`Avatar::set_animation`] calls.
    pub fn add_animation(&mut self, name: &str, keys: Vec<KeyFrame>) {
        self.animations.insert(name, Track::from_keys(keys));
    }

    pub fn animation_names(&self) -> Vec<String> {
        self.animations.names()
    }

    // --- poses ----------------------------------------------------------

    /// Applies a stored emotion to the face and, when the pose covers it,
    /// the mouth space.
    pub fn set_emotion(&mut self, name: &str) {
        let Some(pose) = self.emotions.get(name) else {
            debug!("unknown emotion '{name}'");
            return;
        };
        copy_guarded(self.face.weights_mut(), &pose.face, "emotion face write");
        if let Some(mouth_pose) = &pose.mouth {
            for mesh in &mut self.mouth {
                copy_guarded(mesh.weights_mut(), mouth_pose, "emotion mouth write");
            }
        }
    }

    /// Mixes a viseme into the current expression. `emotion_weight` is how
    /// much of the existing face survives on the slots the viseme claims:
    /// 0 is a pure viseme, 1 leaves the face alone.
    pub fn set_viseme(&mut self, name: &str, emotion_weight: f32) {
        let Some(pose) = self.visemes.get(name) else {
            debug!("unknown viseme '{name}'");
            return;
        };
        let face = self.face.weights_mut();
        if pose.face.len() == face.len() {
            mix_viseme(face, &pose.face, emotion_weight);
        }
        if let Some(mouth_pose) = &pose.mouth {
            for mesh in &mut self.mouth {
                let weights = mesh.weights_mut();
                if mouth_pose.len() == weights.len() {
                    mix_viseme(weights, mouth_pose, emotion_weight);
                }
            }
        }
    }

    /// Applies an emotion, then re-balances the mouth region between the
    /// emotion and a viseme: `weight` is the emotion share. Coupling runs
    /// even when a name misses, so the mouth meshes never desync.
    pub fn blend_viseme_emotion(&mut self, viseme: &str, emotion: &str, weight: f32) {
        let viseme_pose = self.visemes.get(viseme).cloned();
        let emotion_pose = self.emotions.get(emotion).cloned();
        match (viseme_pose, emotion_pose) {
            (Some(vis), Some(emo)) => {
                self.set_emotion(emotion);
                let face = self.face.weights_mut();
                for &slot in &self.mouth_region {
                    if slot < face.len() && slot < emo.face.len() && slot < vis.face.len() {
                        face[slot] = weight * emo.face[slot] + (1.0 - weight) * vis.face[slot];
                    }
                }
            }
            _ => debug!("unknown viseme '{viseme}' or emotion '{emotion}'"),
        }
        self.apply_coupling();
    }

    /// Writes a raw pose onto the face (and mouth when covered).
    pub fn set_face_pose(&mut self, pose: &FacePose) {
        copy_guarded(self.face.weights_mut(), &pose.face, "face pose write");
        if let Some(mouth_pose) = &pose.mouth {
            for mesh in &mut self.mouth {
                copy_guarded(mesh.weights_mut(), mouth_pose, "mouth pose write");
            }
        }
    }

    pub fn add_emotion(&mut self, name: &str, pose: FacePose) {
        self.emotions.insert(name, pose);
    }

    pub fn add_viseme(&mut self, name: &str, pose: FacePose) {
        self.visemes.insert(name, pose);
    }

    pub fn emotion_names(&self) -> Vec<String> {
        self.emotions.names()
    }

    pub fn viseme_names(&self) -> Vec<String> {
        self.visemes.names()
    }

    /// Replaces the face slots viseme/emotion mixing operates on. Slots
    /// outside the face space are dropped with a warning.
    pub fn set_mouth_region(&mut self, slots: Vec<usize>) {
        let shapes = self.face.shape_count();
        self.mouth_region = slots
            .into_iter()
            .filter(|&slot| {
                if slot >= shapes {
                    warn!("dropping mouth region slot {slot}: face has {shapes} shapes");
                    return false;
                }
                true
            })
            .collect();
    }

    // --- raw weights ----------------------------------------------------

    /// Sets one face weight. Slot 0 anchors the neutral shape and stays
    /// read-only through this path, as do out-of-range slots.
    pub fn set_face_weight(&mut self, slot: usize, weight: f32) {
        let face = self.face.weights_mut();
        if slot > 0 && slot < face.len() {
            face[slot] = weight;
        }
    }

    /// Sets one mouth weight across every mouth mesh. Same slot rules as
    /// [`Avatar::set_face_weight`].
    pub fn set_mouth_weight(&mut self, slot: usize, weight: f32) {
        if slot == 0 || slot >= self.mouth_shapes {
            return;
        }
        for mesh in &mut self.mouth {
            mesh.weights_mut()[slot] = weight;
        }
    }

    pub fn set_face_weights(&mut self, weights: &[f32]) {
        copy_guarded(self.face.weights_mut(), weights, "face weights write");
    }

    pub fn set_mouth_weights(&mut self, weights: &[f32]) {
        for mesh in &mut self.mouth {
            copy_guarded(mesh.weights_mut(), weights, "mouth weights write");
        }
    }

    // --- blinking -------------------------------------------------------

    pub fn enable_blinking(&mut self, enabled: bool) {
        if enabled {
            self.blinker.start();
        } else {
            self.blinker.stop();
        }
    }

    /// Points the blinker at different eyelid slots. Out-of-range slots are
    /// refused and the current ones stay.
    pub fn set_blink_slots(&mut self, left: usize, right: usize) {
        let shapes = self.face.shape_count();
        if left >= shapes || right >= shapes {
            warn!("blink slots ({left}, {right}) out of range for {shapes} face shapes");
            return;
        }
        self.blinker.set_slots(left, right);
    }

    // --- coupling -------------------------------------------------------

    /// Adds a face to mouth coupling at runtime. Returns whether the pair
    /// was accepted.
    pub fn add_coupling(&mut self, face_slot: usize, mouth_slot: usize) -> bool {
        self.coupling
            .insert(face_slot, mouth_slot, self.face.shape_count(), self.mouth_shapes)
    }

    // --- rig ------------------------------------------------------------

    pub fn set_head_rotation(&mut self, degrees: Vec3) {
        self.rig.head.set_rotation(degrees);
    }

    pub fn set_head_translation(&mut self, translation: Vec3) {
        self.rig.head.translation = translation;
    }

    pub fn set_eye_rotation(&mut self, degrees: Vec3) {
        self.rig.eyes.set_rotation(degrees);
    }

    pub fn set_eye_translations(&mut self, left: Vec3, right: Vec3) {
        self.rig.eyes.left_translation = left;
        self.rig.eyes.right_translation = right;
    }

    /// Eyes hold gaze against head turns when enabled.
    pub fn set_follow_eyes(&mut self, follow: bool) {
        self.rig.eyes.follow_head = follow;
    }

    pub fn set_scene_rotation(&mut self, degrees: Vec3) {
        self.rig.scene.set_rotation(degrees);
    }

    pub fn set_scene_translation(&mut self, translation: Vec3) {
        self.rig.scene.translation = translation;
    }

    // --- idle head motion -------------------------------------------------

    pub fn enable_head_motion(&mut self, enabled: bool) {
        self.sway.set_enabled(enabled);
    }

    pub fn set_head_motion_range(&mut self, pitch_deg: f32, yaw_deg: f32, roll_deg: f32) {
        self.sway.set_range(pitch_deg, yaw_deg, roll_deg);
    }

    /// Per-axis sway speed in `[0, 1]`.
    pub fn set_head_motion_speed(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.sway.set_speed(pitch, yaw, roll);
    }

    // --- accessors --------------------------------------------------------

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn face(&self) -> &BlendShapeMesh {
        &self.face
    }

    pub fn mouth_meshes(&self) -> &[BlendShapeMesh] {
        &self.mouth
    }

    pub fn face_weights(&self) -> &[f32] {
        self.face.weights()
    }

    /// The shared mouth-space weights, read from the first mouth mesh.
    pub fn mouth_weights(&self) -> &[f32] {
        self.mouth.first().map(|m| m.weights()).unwrap_or(&[])
    }

    pub fn mouth_region(&self) -> &[usize] {
        &self.mouth_region
    }

    pub fn player(&self) -> &KeyframePlayer {
        &self.player
    }

    pub fn blinker(&self) -> &Blinker {
        &self.blinker
    }

    pub fn rig(&self) -> &HeadEyeRig {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut HeadEyeRig {
        &mut self.rig
    }
}

/// The viseme mix on slots the viseme claims: `a` of the current value
/// survives, the rest snaps to the viseme.
fn mix_viseme(current: &mut [f32], viseme: &[f32], a: f32) {
    for (slot, &v) in current.iter_mut().zip(viseme) {
        if v > VISEME_THRESHOLD {
            *slot = a * (*slot - v) + v;
        }
    }
}
