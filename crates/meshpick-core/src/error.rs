//! Error types for meshpick.
//!
//! Only contract violations by a caller are errors. "Nothing was picked" is
//! reported through sentinel values (an empty selection, an infinite
//! distance) and never through this type.

use thiserror::Error;

use crate::scene::ObjectId;

/// The main error type for meshpick operations.
#[derive(Error, Debug)]
pub enum MeshPickError {
    /// No object with the given id exists in the scene.
    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    /// The object exists but does not carry a mesh.
    #[error("object {0} has no mesh")]
    NotAMesh(ObjectId),

    /// A vertex index points past the end of the position array.
    #[error("vertex index {index} out of range (vertex count {count})")]
    VertexOutOfRange { index: usize, count: usize },

    /// A face index points past the end of the face list.
    #[error("face index {index} out of range (face count {count})")]
    FaceOutOfRange { index: usize, count: usize },

    /// A face's index list is not a non-empty multiple of three.
    #[error("face {face} has {len} indices, expected a non-empty multiple of 3")]
    InvalidTriangulation { face: usize, len: usize },

    /// A coincident-vertex table does not partition the vertex array.
    #[error("invalid shared vertex table: {0}")]
    InvalidSharedVertices(String),

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for meshpick operations.
pub type Result<T> = std::result::Result<T, MeshPickError>;
