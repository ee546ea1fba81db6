//! Blendshape mesh data.
//!
//! Geometry is immutable after load and shared behind an `Arc`; the only
//! per-frame mutable state is the weight vector. Vertex and normal buffers
//! are flat `f32` slabs, xyz interleaved (stride 3), and every delta buffer
//! matches the neutral buffers element for element.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::VisageError;

/// Per-shape displacement from the neutral mesh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeDelta {
    pub name: String,
    /// Vertex displacements, same layout and length as the neutral buffer.
    pub vertices: Vec<f32>,
    /// Normal displacements, same layout as `vertices`. Applied with the
    /// same weighted sum and never re-normalized.
    pub normals: Vec<f32>,
}

/// Immutable blendshape geometry: the neutral mesh plus one delta per shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeGeometry {
    pub name: String,
    pub neutral_vertices: Vec<f32>,
    pub neutral_normals: Vec<f32>,
    pub deltas: Vec<ShapeDelta>,
}

impl ShapeGeometry {
    pub fn vertex_count(&self) -> usize {
        self.neutral_vertices.len() / 3
    }

    pub fn shape_count(&self) -> usize {
        self.deltas.len()
    }

    /// Index of a named shape, if present.
    pub fn shape_index(&self, name: &str) -> Option<usize> {
        self.deltas.iter().position(|d| d.name == name)
    }

    /// Checks buffer lengths and stride. Run once at load; the blender
    /// indexes unchecked after this passes.
    pub fn validate(&self) -> Result<(), VisageError> {
        let n = self.neutral_vertices.len();
        if n == 0 {
            return Err(self.invalid("empty neutral vertex buffer"));
        }
        if n % 3 != 0 {
            return Err(self.invalid("neutral vertex buffer is not xyz interleaved"));
        }
        if self.neutral_normals.len() != n {
            return Err(self.invalid("neutral normal buffer length differs from vertices"));
        }
        for (i, delta) in self.deltas.iter().enumerate() {
            if delta.vertices.len() != n {
                return Err(self.invalid(format!(
                    "delta {} ({}) has {} vertex floats, neutral has {}",
                    i,
                    delta.name,
                    delta.vertices.len(),
                    n
                )));
            }
            if delta.normals.len() != n {
                return Err(self.invalid(format!(
                    "delta {} ({}) has {} normal floats, neutral has {}",
                    i,
                    delta.name,
                    delta.normals.len(),
                    n
                )));
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> VisageError {
        VisageError::InvalidGeometry {
            mesh: self.name.clone(),
            reason: reason.into(),
        }
    }
}

/// A renderable blendshape mesh: shared geometry plus its live weights.
///
/// Weights are unclamped by design; expressive poses may push past `[0, 1]`
/// and the weighted sum honors whatever is set.
#[derive(Clone, Debug)]
pub struct BlendShapeMesh {
    geometry: Arc<ShapeGeometry>,
    weights: Vec<f32>,
}

impl BlendShapeMesh {
    /// Validates the geometry and starts every weight at zero (the neutral
    /// expression).
    pub fn new(geometry: ShapeGeometry) -> Result<Self, VisageError> {
        geometry.validate()?;
        let weights = vec![0.0; geometry.shape_count()];
        Ok(Self {
            geometry: Arc::new(geometry),
            weights,
        })
    }

    /// Same as [`BlendShapeMesh::new`] for geometry that is already shared.
    pub fn from_shared(geometry: Arc<ShapeGeometry>) -> Result<Self, VisageError> {
        geometry.validate()?;
        let weights = vec![0.0; geometry.shape_count()];
        Ok(Self { geometry, weights })
    }

    pub fn name(&self) -> &str {
        &self.geometry.name
    }

    pub fn geometry(&self) -> &Arc<ShapeGeometry> {
        &self.geometry
    }

    pub fn shape_count(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// The weight vector keeps its length for the life of the mesh; writers
    /// overwrite slots, never resize.
    pub fn weights_mut(&mut self) -> &mut [f32] {
        &mut self.weights
    }

    /// Zeroes every weight.
    pub fn reset(&mut self) {
        self.weights.fill(0.0);
    }
}
