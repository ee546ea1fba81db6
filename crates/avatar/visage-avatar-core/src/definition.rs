//! Avatar description records.
//!
//! The serde mirror of what an asset pipeline exports for one character:
//! blink slots, eye placement, coupling pairs, the mouth region, and the
//! named emotion / viseme / animation tables. Geometry ships separately;
//! these records only reference shape slots by index, so everything here
//! is validated against the actual shape counts before an avatar is built.

use serde::{Deserialize, Serialize};

use crate::avatar::VISEME_THRESHOLD;
use crate::coupling::CouplingEntry;
use crate::error::VisageError;

/// Eyelid slot indices in the face shape space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkSlots {
    pub left: usize,
    pub right: usize,
}

/// Eye socket positions relative to the head node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EyePlacement {
    pub left: [f32; 3],
    pub right: [f32; 3],
}

/// A named pose over the face space, optionally covering the mouth space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedPose {
    pub name: String,
    pub face: Vec<f32>,
    #[serde(default)]
    pub mouth: Option<Vec<f32>>,
}

/// One keyframe of a stored animation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyDef {
    /// Milliseconds on the audio timeline.
    pub t: u32,
    pub face: Vec<f32>,
    /// Head-nod channel, degrees of pitch.
    #[serde(default)]
    pub aux: f32,
}

/// A named keyframe track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationDef {
    pub name: String,
    pub keys: Vec<KeyDef>,
}

/// Everything the pipeline says about one avatar, minus the geometry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AvatarDefinition {
    pub name: String,
    #[serde(default)]
    pub blink: Option<BlinkSlots>,
    #[serde(default)]
    pub eyes: Option<EyePlacement>,
    #[serde(default)]
    pub couplings: Vec<CouplingEntry>,
    /// Face slots that count as the mouth region for viseme mixing. When
    /// absent, the region is derived from the viseme poses themselves.
    #[serde(default)]
    pub mouth_region: Option<Vec<usize>>,
    #[serde(default)]
    pub emotions: Vec<NamedPose>,
    #[serde(default)]
    pub visemes: Vec<NamedPose>,
    #[serde(default)]
    pub animations: Vec<AnimationDef>,
}

impl AvatarDefinition {
    pub fn from_json(json: &str) -> Result<Self, VisageError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, VisageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every index and vector length against the real shape counts.
    /// Couplings are not checked here; the coupling table drops bad pairs
    /// itself, entry by entry.
    pub fn validate(&self, face_shapes: usize, mouth_shapes: usize) -> Result<(), VisageError> {
        if let Some(blink) = &self.blink {
            for slot in [blink.left, blink.right] {
                if slot >= face_shapes {
                    return Err(VisageError::BlinkSlotOutOfRange {
                        slot,
                        shape_count: face_shapes,
                    });
                }
            }
        }
        for (kind, poses) in [("emotion", &self.emotions), ("viseme", &self.visemes)] {
            for pose in poses {
                if pose.face.len() != face_shapes {
                    return Err(VisageError::InvalidDefinition {
                        reason: format!(
                            "{kind} '{}' has {} face weights, mesh has {} shapes",
                            pose.name,
                            pose.face.len(),
                            face_shapes
                        ),
                    });
                }
                if let Some(mouth) = &pose.mouth {
                    if mouth.len() != mouth_shapes {
                        return Err(VisageError::InvalidDefinition {
                            reason: format!(
                                "{kind} '{}' has {} mouth weights, mouth space has {} shapes",
                                pose.name,
                                mouth.len(),
                                mouth_shapes
                            ),
                        });
                    }
                }
            }
        }
        if let Some(region) = &self.mouth_region {
            if let Some(&slot) = region.iter().find(|&&slot| slot >= face_shapes) {
                return Err(VisageError::InvalidDefinition {
                    reason: format!("mouth region slot {slot} is outside {face_shapes} shapes"),
                });
            }
        }
        for animation in &self.animations {
            for key in &animation.keys {
                if key.face.len() != face_shapes {
                    return Err(VisageError::InvalidTrack {
                        name: animation.name.clone(),
                        reason: format!(
                            "key at {} ms has {} face weights, mesh has {} shapes",
                            key.t,
                            key.face.len(),
                            face_shapes
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// The face slots viseme mixing operates on: the explicit region when
    /// present, otherwise every slot some viseme pushes past the claim
    /// threshold.
    pub fn resolve_mouth_region(&self) -> Vec<usize> {
        if let Some(region) = &self.mouth_region {
            return region.clone();
        }
        let mut slots = hashbrown::HashSet::new();
        for pose in &self.visemes {
            for (slot, &w) in pose.face.iter().enumerate() {
                if w > VISEME_THRESHOLD {
                    slots.insert(slot);
                }
            }
        }
        let mut region: Vec<usize> = slots.into_iter().collect();
        region.sort_unstable();
        region
    }
}
