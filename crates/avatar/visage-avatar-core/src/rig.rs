//! The scene / head / eyes transform hierarchy.
//!
//! Rotations are stored in degrees and converted at the glam boundary.
//! Every local transform is translate-then-rotate with a fixed X, Y, Z
//! axis order: `parent * T * Rx * Ry * Rz`.

use glam::{Mat4, Vec2, Vec3};

/// Per-axis clamp for rig rotations, degrees. Applied when a rotation is
/// set, not when it is composed.
pub const MAX_ROTATION_DEG: f32 = 45.0;

fn clamp_rotation(v: Vec3) -> Vec3 {
    v.clamp(Vec3::splat(-MAX_ROTATION_DEG), Vec3::splat(MAX_ROTATION_DEG))
}

fn local_matrix(translation: Vec3, rotation_deg: Vec3) -> Mat4 {
    Mat4::from_translation(translation)
        * Mat4::from_rotation_x(rotation_deg.x.to_radians())
        * Mat4::from_rotation_y(rotation_deg.y.to_radians())
        * Mat4::from_rotation_z(rotation_deg.z.to_radians())
}

/// A single rig joint: user-set rotation plus a procedural offset layered
/// on top of it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RigNode {
    pub translation: Vec3,
    rotation: Vec3,
    rotation_offset: Vec3,
}

impl RigNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Sets the user rotation, clamped per axis.
    pub fn set_rotation(&mut self, degrees: Vec3) {
        self.rotation = clamp_rotation(degrees);
    }

    pub fn rotation_offset(&self) -> Vec3 {
        self.rotation_offset
    }

    /// Procedural additive rotation (sway, nod). Not clamped; the
    /// generators bound their own output.
    pub fn set_rotation_offset(&mut self, degrees: Vec3) {
        self.rotation_offset = degrees;
    }

    /// Rotation actually composed: user rotation plus the offset.
    pub fn effective_rotation(&self) -> Vec3 {
        self.rotation + self.rotation_offset
    }
}

/// Both eyes: shared rotation, separate placements. Eyes pitch and yaw
/// only; rolling an eyeball is not a thing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EyePair {
    pub left_translation: Vec3,
    pub right_translation: Vec3,
    rotation: Vec3,
    /// When set, the eyes counter-rotate against the head each compose so
    /// gaze stays fixed while the head turns.
    pub follow_head: bool,
}

impl EyePair {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, degrees: Vec3) {
        self.rotation = clamp_rotation(degrees);
    }
}

/// World transforms for one composed frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RigTransforms {
    pub scene: Mat4,
    pub head: Mat4,
    pub left_eye: Mat4,
    pub right_eye: Mat4,
}

/// The full hierarchy. Compose walks scene, then head, then both eyes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeadEyeRig {
    pub scene: RigNode,
    pub head: RigNode,
    pub eyes: EyePair,
}

impl HeadEyeRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composes world transforms under `parent`. `gaze_offset` is the
    /// procedural wander in degrees (pitch, yaw), added on top of either
    /// the set eye rotation or the follow counter-rotation.
    pub fn compose(&self, parent: Mat4, gaze_offset: Vec2) -> RigTransforms {
        let scene = parent * local_matrix(self.scene.translation, self.scene.effective_rotation());
        let head = scene * local_matrix(self.head.translation, self.head.effective_rotation());

        let base = if self.eyes.follow_head {
            let h = self.head.effective_rotation();
            Vec3::new(-h.x, -h.y, 0.0)
        } else {
            self.eyes.rotation()
        };
        let eye_rotation = Vec3::new(base.x + gaze_offset.x, base.y + gaze_offset.y, 0.0);

        RigTransforms {
            scene,
            head,
            left_eye: head * local_matrix(self.eyes.left_translation, eye_rotation),
            right_eye: head * local_matrix(self.eyes.right_translation, eye_rotation),
        }
    }
}
