//! Weighted-sum blendshape evaluation.
//!
//! Every evaluation starts from the neutral buffers and accumulates
//! `weight * delta` per shape, so repeated evaluation never drifts. Normals
//! go through the identical sum and are left unnormalized. This runs once
//! per displayed frame, not per simulation tick.

use crate::error::VisageError;
use crate::mesh::{BlendShapeMesh, ShapeGeometry};

/// Reusable output buffers for [`evaluate`]. Allocate once, feed it every
/// frame.
#[derive(Clone, Debug, Default)]
pub struct BlendScratch {
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
}

impl BlendScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scratch sized for a mesh up front, skipping the first-frame grow.
    pub fn for_geometry(geometry: &ShapeGeometry) -> Self {
        Self {
            vertices: Vec::with_capacity(geometry.neutral_vertices.len()),
            normals: Vec::with_capacity(geometry.neutral_normals.len()),
        }
    }
}

/// Blends `geometry` under `weights` into `out`.
///
/// Weights are applied as-is: negative and above-one values are legal and
/// honored. Shapes at exactly zero are skipped; with a handful of active
/// shapes out of dozens this is where the time goes.
pub fn evaluate(
    geometry: &ShapeGeometry,
    weights: &[f32],
    out: &mut BlendScratch,
) -> Result<(), VisageError> {
    if weights.len() != geometry.shape_count() {
        return Err(VisageError::WeightCountMismatch {
            mesh: geometry.name.clone(),
            expected: geometry.shape_count(),
            actual: weights.len(),
        });
    }
    blend_unchecked(geometry, weights, out);
    Ok(())
}

impl BlendShapeMesh {
    /// Blends this mesh with its own weights. Lengths are maintained by the
    /// mesh, so this cannot fail.
    pub fn evaluate(&self, out: &mut BlendScratch) {
        blend_unchecked(self.geometry(), self.weights(), out);
    }
}

fn blend_unchecked(geometry: &ShapeGeometry, weights: &[f32], out: &mut BlendScratch) {
    out.vertices.clear();
    out.vertices.extend_from_slice(&geometry.neutral_vertices);
    out.normals.clear();
    out.normals.extend_from_slice(&geometry.neutral_normals);

    for (delta, &w) in geometry.deltas.iter().zip(weights) {
        if w == 0.0 {
            continue;
        }
        for (o, &d) in out.vertices.iter_mut().zip(&delta.vertices) {
            *o += w * d;
        }
        for (o, &d) in out.normals.iter_mut().zip(&delta.normals) {
            *o += w * d;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::ShapeDelta;

    fn geometry() -> ShapeGeometry {
        ShapeGeometry {
            name: "face".to_string(),
            neutral_vertices: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            neutral_normals: vec![0.0, 1.0, 0.0, 0.0, 1.0, 0.0],
            deltas: vec![
                ShapeDelta {
                    name: "smile".to_string(),
                    vertices: vec![1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
                    normals: vec![0.5, 0.0, 0.0, 0.5, 0.0, 0.0],
                },
                ShapeDelta {
                    name: "jaw_open".to_string(),
                    vertices: vec![0.0, -2.0, 0.0, 0.0, -2.0, 0.0],
                    normals: vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                },
            ],
        }
    }

    #[test]
    fn test_zero_weights_return_exact_neutral() {
        let g = geometry();
        let mut out = BlendScratch::new();
        evaluate(&g, &[0.0, 0.0], &mut out).unwrap();
        assert_eq!(out.vertices, g.neutral_vertices);
        assert_eq!(out.normals, g.neutral_normals);
    }

    #[test]
    fn test_weighted_sum_matches_hand_computation() {
        let g = geometry();
        let mut out = BlendScratch::new();
        evaluate(&g, &[0.5, 0.25], &mut out).unwrap();
        // neutral + 0.5 * smile + 0.25 * jaw_open, exact in f32
        assert_eq!(out.vertices, vec![1.5, 1.5, 3.0, 4.5, 4.5, 6.0]);
        assert_eq!(out.normals, vec![0.25, 1.0, 0.0, 0.25, 1.0, 0.0]);
    }

    #[test]
    fn test_weights_are_not_clamped() {
        let g = geometry();
        let mut out = BlendScratch::new();
        evaluate(&g, &[-1.0, 2.0], &mut out).unwrap();
        assert_eq!(out.vertices[0], 0.0); // 1.0 + (-1.0) * 1.0
        assert_eq!(out.vertices[1], -2.0); // 2.0 + 2.0 * -2.0
    }

    #[test]
    fn test_repeated_evaluation_does_not_drift() {
        let g = geometry();
        let mut out = BlendScratch::new();
        evaluate(&g, &[0.3, 0.7], &mut out).unwrap();
        let first = out.vertices.clone();
        for _ in 0..100 {
            evaluate(&g, &[0.3, 0.7], &mut out).unwrap();
        }
        assert_eq!(out.vertices, first);
    }

    #[test]
    fn test_weight_count_mismatch_is_an_error() {
        let g = geometry();
        let mut out = BlendScratch::new();
        let err = evaluate(&g, &[0.5], &mut out).unwrap_err();
        assert!(matches!(err, VisageError::WeightCountMismatch { .. }));
    }
}
