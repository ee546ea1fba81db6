//! Named lookup tables for poses and tracks.

use indexmap::IndexMap;

use crate::pose::FacePose;
use crate::track::Track;

/// Emotion and viseme poses by name.
pub type PoseLibrary = NamedLibrary<FacePose>;

/// Prebaked animation tracks by name.
pub type TrackLibrary = NamedLibrary<Track>;

/// An insertion-ordered name table. Listing returns names in the order they
/// were first added, and re-inserting a name replaces the value without
/// moving it.
#[derive(Clone, Debug, Default)]
pub struct NamedLibrary<T> {
    entries: IndexMap<String, T>,
}

impl<T> NamedLibrary<T> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: T) {
        self.entries.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
