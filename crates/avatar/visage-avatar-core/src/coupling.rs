//! Face to mouth weight propagation.
//!
//! Lip and jaw shapes on the face mesh have counterparts on the teeth and
//! tongue meshes. The coupling table lists those slot pairs; applying it
//! copies each coupled face weight into the mouth space so the secondary
//! meshes track whatever the face is doing, whether the writer was a
//! keyframe, a viseme, or a direct set.

use log::warn;
use serde::{Deserialize, Serialize};

/// One directional copy from a face slot into a mouth slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouplingEntry {
    pub face: usize,
    pub mouth: usize,
}

/// Validated list of face to mouth copies.
///
/// Entries are checked against both shape spaces when added; anything out
/// of range is logged and dropped rather than carried as a latent panic.
#[derive(Clone, Debug, Default)]
pub struct CouplingTable {
    entries: Vec<CouplingEntry>,
}

impl CouplingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from raw pairs. Invalid pairs are dropped one by one;
    /// the rest of the table still loads.
    pub fn from_pairs(
        pairs: &[CouplingEntry],
        face_shapes: usize,
        mouth_shapes: usize,
    ) -> Self {
        let mut table = Self::new();
        for &entry in pairs {
            table.insert(entry.face, entry.mouth, face_shapes, mouth_shapes);
        }
        table
    }

    /// Adds one pair if both indices are in range. Returns whether the pair
    /// was accepted.
    pub fn insert(
        &mut self,
        face: usize,
        mouth: usize,
        face_shapes: usize,
        mouth_shapes: usize,
    ) -> bool {
        if face >= face_shapes || mouth >= mouth_shapes {
            warn!(
                "dropping coupling {face} -> {mouth}: out of range (face has {face_shapes} shapes, mouth has {mouth_shapes})"
            );
            return false;
        }
        self.entries.push(CouplingEntry { face, mouth });
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CouplingEntry] {
        &self.entries
    }

    /// Copies every coupled face weight into the mouth vector. Indices were
    /// validated against both shape spaces on insert.
    pub fn apply(&self, face: &[f32], mouth: &mut [f32]) {
        for entry in &self.entries {
            mouth[entry.mouth] = face[entry.face];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_copies_coupled_slots() {
        let mut table = CouplingTable::new();
        assert!(table.insert(0, 2, 3, 3));
        assert!(table.insert(2, 0, 3, 3));

        let face = [0.9, 0.5, 0.1];
        let mut mouth = [0.0, 7.0, 0.0];
        table.apply(&face, &mut mouth);
        assert_eq!(mouth, [0.1, 7.0, 0.9]);
    }

    #[test]
    fn test_out_of_range_pairs_are_dropped() {
        let pairs = [
            CouplingEntry { face: 0, mouth: 0 },
            CouplingEntry { face: 5, mouth: 0 },
            CouplingEntry { face: 1, mouth: 9 },
        ];
        let table = CouplingTable::from_pairs(&pairs, 3, 2);
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0], CouplingEntry { face: 0, mouth: 0 });
    }

    #[test]
    fn test_duplicate_targets_apply_in_order() {
        let mut table = CouplingTable::new();
        table.insert(0, 0, 2, 1);
        table.insert(1, 0, 2, 1);

        let mut mouth = [0.0];
        table.apply(&[0.2, 0.8], &mut mouth);
        assert_eq!(mouth, [0.8]);
    }
}
