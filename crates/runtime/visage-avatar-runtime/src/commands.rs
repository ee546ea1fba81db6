//! The control surface as a message type.
//!
//! Everything a UI or network layer may ask of the avatar travels over
//! the scheduler's channel as one of these and is applied on the animator
//! thread, so the avatar itself never needs a lock. Sends are fire and
//! forget; a command sent to a stopped scheduler is simply dropped.

use glam::Vec3;

use visage_avatar_core::avatar::Avatar;
use visage_avatar_core::pose::FacePose;
use visage_avatar_core::track::KeyFrame;

/// One control-surface call, queued for the animator thread.
#[derive(Clone, Debug)]
pub enum AvatarCommand {
    // Playback
    SetAnimation(String),
    ClearAnimation,
    StartAnimation,
    StopAnimation,
    TogglePause,
    SetNeutralFace,

    // Track editing on the live player
    AddKey { time_ms: u32, pose: FacePose, aux: f32 },
    SetKeys(Vec<KeyFrame>),
    SetEmotionKeyframe { time_ms: u32, emotion: String },
    AddAnimation { name: String, keys: Vec<KeyFrame> },

    // Poses
    SetEmotion(String),
    SetViseme { name: String, emotion_weight: f32 },
    BlendVisemeEmotion { viseme: String, emotion: String, weight: f32 },
    SetFacePose(FacePose),
    AddEmotion { name: String, pose: FacePose },
    AddViseme { name: String, pose: FacePose },
    SetMouthRegion(Vec<usize>),

    // Raw weights
    SetFaceWeight { slot: usize, weight: f32 },
    SetMouthWeight { slot: usize, weight: f32 },
    SetFaceWeights(Vec<f32>),
    SetMouthWeights(Vec<f32>),

    // Blinking and coupling
    EnableBlinking(bool),
    SetBlinkSlots { left: usize, right: usize },
    AddCoupling { face: usize, mouth: usize },

    // Rig
    SetHeadRotation(Vec3),
    SetHeadTranslation(Vec3),
    SetEyeRotation(Vec3),
    SetEyeTranslations { left: Vec3, right: Vec3 },
    SetFollowEyes(bool),
    SetSceneRotation(Vec3),
    SetSceneTranslation(Vec3),

    // Idle head motion
    EnableHeadMotion(bool),
    SetHeadMotionRange { pitch_deg: f32, yaw_deg: f32, roll_deg: f32 },
    SetHeadMotionSpeed { pitch: f32, yaw: f32, roll: f32 },
}

impl AvatarCommand {
    /// Applies the command. Runs on the animator thread, between ticks.
    pub fn apply(self, avatar: &mut Avatar) {
        match self {
            Self::SetAnimation(name) => avatar.set_animation(&name),
            Self::ClearAnimation => avatar.clear_animation(),
            Self::StartAnimation => {
                avatar.start_animation();
            }
            Self::StopAnimation => avatar.stop_animation(),
            Self::TogglePause => avatar.toggle_pause(),
            Self::SetNeutralFace => avatar.set_neutral_face(),

            Self::AddKey { time_ms, pose, aux } => avatar.add_key(time_ms, pose, aux),
            Self::SetKeys(keys) => avatar.set_keys(keys),
            Self::SetEmotionKeyframe { time_ms, emotion } => {
                avatar.set_emotion_keyframe(time_ms, &emotion)
            }
            Self::AddAnimation { name, keys } => avatar.add_animation(&name, keys),

            Self::SetEmotion(name) => avatar.set_emotion(&name),
            Self::SetViseme { name, emotion_weight } => avatar.set_viseme(&name, emotion_weight),
            Self::BlendVisemeEmotion { viseme, emotion, weight } => {
                avatar.blend_viseme_emotion(&viseme, &emotion, weight)
            }
            Self::SetFacePose(pose) => avatar.set_face_pose(&pose),
            Self::AddEmotion { name, pose } => avatar.add_emotion(&name, pose),
            Self::AddViseme { name, pose } => avatar.add_viseme(&name, pose),
            Self::SetMouthRegion(slots) => avatar.set_mouth_region(slots),

            Self::SetFaceWeight { slot, weight } => avatar.set_face_weight(slot, weight),
            Self::SetMouthWeight { slot, weight } => avatar.set_mouth_weight(slot, weight),
            Self::SetFaceWeights(weights) => avatar.set_face_weights(&weights),
            Self::SetMouthWeights(weights) => avatar.set_mouth_weights(&weights),

            Self::EnableBlinking(enabled) => avatar.enable_blinking(enabled),
            Self::SetBlinkSlots { left, right } => avatar.set_blink_slots(left, right),
            Self::AddCoupling { face, mouth } => {
                avatar.add_coupling(face, mouth);
            }

            Self::SetHeadRotation(v) => avatar.set_head_rotation(v),
            Self::SetHeadTranslation(v) => avatar.set_head_translation(v),
            Self::SetEyeRotation(v) => avatar.set_eye_rotation(v),
            Self::SetEyeTranslations { left, right } => avatar.set_eye_translations(left, right),
            Self::SetFollowEyes(follow) => avatar.set_follow_eyes(follow),
            Self::SetSceneRotation(v) => avatar.set_scene_rotation(v),
            Self::SetSceneTranslation(v) => avatar.set_scene_translation(v),

            Self::EnableHeadMotion(enabled) => avatar.enable_head_motion(enabled),
            Self::SetHeadMotionRange { pitch_deg, yaw_deg, roll_deg } => {
                avatar.set_head_motion_range(pitch_deg, yaw_deg, roll_deg)
            }
            Self::SetHeadMotionSpeed { pitch, yaw, roll } => {
                avatar.set_head_motion_speed(pitch, yaw, roll)
            }
        }
    }
}
