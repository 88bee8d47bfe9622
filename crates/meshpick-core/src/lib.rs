//! Core data model for meshpick.
//!
//! This crate provides the types every picking and grouping operation works on:
//! - [`Mesh`] with faces, perimeter edges and a coincident-vertex table
//! - [`WingedEdgeGraph`] adjacency over a mesh or a subset of its faces
//! - [`ViewProjection`] and a concrete [`Camera`]
//! - Ray queries ([`raycast_face`], [`point_is_occluded`])
//! - [`Scene`] objects with per-mesh [`MeshSelection`] sets and the transient
//!   [`SceneSelection`] pick result
//! - Picker preferences and mode enums

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Index and pixel math converts between usize and f32 freely
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]

pub mod camera;
pub mod error;
pub mod math;
pub mod mesh;
pub mod options;
pub mod raycast;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod transform;
pub mod winged_edge;

pub use camera::{Camera, ProjectionMode, ViewProjection};
pub use error::{MeshPickError, Result};
pub use math::{Aabb, Ray, ScreenRect};
pub use mesh::{Edge, EdgeLookup, Face, FaceFrame, Mesh};
pub use options::{
    CullingMode, HandleOrientation, PickerOptions, PivotPoint, RectSelectMode,
    ScenePickerPreferences, SelectMode, SelectionModifierBehavior, MAX_POINTER_DISTANCE_FUZZY,
    MAX_POINTER_DISTANCE_PRECISE,
};
pub use raycast::{
    point_is_occluded, raycast_face, raycast_face_both_cull_modes, DualCullHit, RaycastHit,
};
pub use scene::{ObjectId, Scene, SceneObject};
pub use selection::{MeshSelection, PickedElement, SceneSelection};
pub use transform::Transform;
pub use winged_edge::{WingId, WingedEdge, WingedEdgeGraph};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
