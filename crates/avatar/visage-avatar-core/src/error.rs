//! Error types for the avatar core

use serde::{Deserialize, Serialize};

/// Comprehensive error type for avatar operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum VisageError {
    /// Blendshape geometry failed validation
    #[error("Invalid geometry for mesh {mesh}: {reason}")]
    InvalidGeometry { mesh: String, reason: String },

    /// Weight vector length does not match the mesh shape count
    #[error("Weight count mismatch for mesh {mesh}: expected {expected}, got {actual}")]
    WeightCountMismatch {
        mesh: String,
        expected: usize,
        actual: usize,
    },

    /// Blink slot outside the face shape space
    #[error("Blink slot {slot} is out of range (face has {shape_count} shapes)")]
    BlinkSlotOutOfRange { slot: usize, shape_count: usize },

    /// Keyframe track rejected
    #[error("Invalid track {name}: {reason}")]
    InvalidTrack { name: String, reason: String },

    /// Avatar definition rejected
    #[error("Invalid avatar definition: {reason}")]
    InvalidDefinition { reason: String },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// IO error
    #[error("IO error: {reason}")]
    Io { reason: String },

    /// Generic avatar error
    #[error("Avatar error: {message}")]
    Generic { message: String },
}

impl VisageError {
    /// Create a new generic error
    pub fn new(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::WeightCountMismatch { .. }
                | Self::BlinkSlotOutOfRange { .. }
                | Self::InvalidTrack { .. }
                | Self::Io { .. }
        )
    }

    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidGeometry { .. } | Self::WeightCountMismatch { .. } => "geometry",
            Self::BlinkSlotOutOfRange { .. } | Self::InvalidTrack { .. } => "animation",
            Self::InvalidDefinition { .. } => "definition",
            Self::Serialization { .. } => "serialization",
            Self::Io { .. } => "io",
            Self::Generic { .. } => "generic",
        }
    }
}

impl From<std::io::Error> for VisageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for VisageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
