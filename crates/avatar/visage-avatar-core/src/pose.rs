//! Face poses and the small interpolation helpers the rest of the crate
//! leans on.

use serde::{Deserialize, Serialize};

/// Linear interpolation between two scalars. `t` is not clamped; callers
/// that need clamping do it themselves.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Writes `lerp(a[i], b[i], t)` into `out`. All three slices must share a
/// length; the caller guards that.
#[inline]
pub fn lerp_slice(a: &[f32], b: &[f32], t: f32, out: &mut [f32]) {
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = lerp_f32(x, y, t);
    }
}

/// A full set of blendshape weights for the face, optionally paired with
/// weights for the shared mouth shape space (teeth, tongue).
///
/// Poses are plain data: nothing here knows about meshes or shape counts.
/// Length checks happen where a pose is applied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FacePose {
    pub face: Vec<f32>,
    #[serde(default)]
    pub mouth: Option<Vec<f32>>,
}

impl FacePose {
    /// Pose over the face space only.
    pub fn new(face: impl Into<Vec<f32>>) -> Self {
        Self {
            face: face.into(),
            mouth: None,
        }
    }

    /// Pose covering both the face and the mouth spaces.
    pub fn with_mouth(face: impl Into<Vec<f32>>, mouth: impl Into<Vec<f32>>) -> Self {
        Self {
            face: face.into(),
            mouth: Some(mouth.into()),
        }
    }

    /// All-zero pose over `face_shapes` slots.
    pub fn neutral(face_shapes: usize) -> Self {
        Self {
            face: vec![0.0; face_shapes],
            mouth: None,
        }
    }

    pub fn face_len(&self) -> usize {
        self.face.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp_f32(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp_f32(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp_f32(2.0, 6.0, 0.5), 4.0);
    }

    #[test]
    fn test_lerp_slice_writes_all_slots() {
        let a = [0.0, 1.0, -1.0];
        let b = [1.0, 0.0, 1.0];
        let mut out = [0.0; 3];
        lerp_slice(&a, &b, 0.25, &mut out);
        assert_eq!(out, [0.25, 0.75, -0.5]);
    }

    #[test]
    fn test_neutral_pose_is_zeroed() {
        let pose = FacePose::neutral(4);
        assert_eq!(pose.face, vec![0.0; 4]);
        assert!(pose.mouth.is_none());
    }
}
