//! Keyframe tracks.
//!
//! A track is a time-sorted list of face poses produced by a speech
//! pipeline. Key times are expected on a uniform grid; playback derives its
//! step size from the first two keys and never walks the list.

use crate::pose::FacePose;

/// One sampled pose on the track timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyFrame {
    /// Position on the audio timeline, milliseconds.
    pub time: u32,
    pub pose: FacePose,
    /// Auxiliary head-nod channel, degrees of pitch.
    pub aux: f32,
}

impl KeyFrame {
    pub fn new(time: u32, pose: FacePose) -> Self {
        Self {
            time,
            pose,
            aux: 0.0,
        }
    }

    pub fn with_aux(time: u32, pose: FacePose, aux: f32) -> Self {
        Self { time, pose, aux }
    }
}

/// Keyframes ordered by time, ties kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Track {
    keys: Vec<KeyFrame>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys(keys: Vec<KeyFrame>) -> Self {
        let mut track = Self { keys };
        track.keys.sort_by_key(|k| k.time);
        track
    }

    /// Inserts a key, keeping time order. Stable for equal times.
    pub fn push_key(&mut self, key: KeyFrame) {
        self.keys.push(key);
        self.keys.sort_by_key(|k| k.time);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&KeyFrame> {
        self.keys.get(index)
    }

    pub fn keys(&self) -> &[KeyFrame] {
        &self.keys
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Timestamp of the last key, or 0 for an empty track.
    pub fn last_frame_time(&self) -> u32 {
        self.keys.last().map(|k| k.time).unwrap_or(0)
    }

    /// Keyframe grid spacing, from the first two keys. `None` when the
    /// track is too short to define one.
    pub fn step_size(&self) -> Option<u32> {
        match self.keys.as_slice() {
            [first, second, ..] => Some(second.time - first.time),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(time: u32, level: f32) -> KeyFrame {
        KeyFrame::new(time, FacePose::new(vec![level]))
    }

    #[test]
    fn test_keys_sort_by_time() {
        let track = Track::from_keys(vec![key(66, 0.2), key(0, 0.0), key(33, 0.1)]);
        let times: Vec<u32> = track.keys().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0, 33, 66]);
    }

    #[test]
    fn test_equal_times_keep_insertion_order() {
        let mut track = Track::new();
        track.push_key(key(33, 0.1));
        track.push_key(key(33, 0.2));
        assert_eq!(track.get(0).unwrap().pose.face[0], 0.1);
        assert_eq!(track.get(1).unwrap().pose.face[0], 0.2);
    }

    #[test]
    fn test_step_size_needs_two_keys() {
        let mut track = Track::new();
        assert_eq!(track.step_size(), None);
        track.push_key(key(0, 0.0));
        assert_eq!(track.step_size(), None);
        track.push_key(key(33, 0.1));
        assert_eq!(track.step_size(), Some(33));
    }

    #[test]
    fn test_last_frame_time() {
        assert_eq!(Track::new().last_frame_time(), 0);
        let track = Track::from_keys(vec![key(0, 0.0), key(33, 0.1), key(66, 0.2)]);
        assert_eq!(track.last_frame_time(), 66);
    }
}
