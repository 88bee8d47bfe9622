//! meshpick: element picking and selection grouping for 3D mesh editors.
//!
//! Given a pointer position (or a drag rectangle) over a viewport and a set
//! of meshes, meshpick works out which vertex, edge or face the user means,
//! keeps a persistent per-mesh selection, and splits that selection into
//! groups a transform handle can pivot around.
//!
//! # Quick Start
//!
//! ```no_run
//! use meshpick::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut scene = Scene::new();
//!     let cube = scene.add_mesh("cube", Mesh::cube(2.0));
//!     let camera = Camera::new(Vec2::new(800.0, 600.0))
//!         .looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
//!
//!     let mut tool = SelectionTool::new(ScenePickerPreferences::default(), ToolSettings::default());
//!     let mut undo = NullRecorder;
//!     let at = Vec2::new(412.0, 291.0);
//!     tool.handle_event(&PointerEvent::down(at), &mut scene, &camera, &mut undo)?;
//!     tool.handle_event(&PointerEvent::up(at), &mut scene, &camera, &mut undo)?;
//!
//!     assert!(scene.is_selected(cube));
//!     for (id, groups) in tool.element_groups(&scene)? {
//!         for group in groups {
//!             println!("{id}: pivot at {}", group.position());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `meshpick-core` holds the data model: meshes, the winged-edge graph,
//!   cameras, raycasts, the scene and its selection sets
//! - `meshpick-select` holds the behavior: the element picker, rect
//!   selection and the element group builder
//! - this crate ties them to pointer events through [`SelectionTool`]

// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

mod tool;
mod undo;

pub use meshpick_core::{
    math, Aabb, Camera, CullingMode, Edge, EdgeLookup, Face, FaceFrame, HandleOrientation, Mat4,
    Mesh, MeshPickError, MeshSelection, ObjectId, PickedElement, PickerOptions, PivotPoint,
    ProjectionMode, Quat, Ray, RectSelectMode, Result, Scene, SceneObject, ScenePickerPreferences,
    SceneSelection, ScreenRect, SelectMode, SelectionModifierBehavior, Transform, Vec2, Vec3,
    Vec4, ViewProjection, WingedEdge, WingedEdgeGraph, MAX_POINTER_DISTANCE_FUZZY,
    MAX_POINTER_DISTANCE_PRECISE,
};
pub use meshpick_select::{
    build_groups, combine_selection, drag_select, pick_edge, pick_edges_in_rect,
    pick_faces_in_rect, pick_vertex, pick_vertices_in_rect, ElementGroup, PickQuery, PickResult,
    PickerSession, RectHits,
};
pub use tool::{
    Modifiers, PointerEvent, PointerEventKind, SelectionTool, ToolResponse, ToolSettings,
    DEFAULT_DRAG_THRESHOLD,
};
pub use undo::{NullRecorder, UndoLog, UndoRecorder};

/// Installs `env_logger` as the `log` backend.
///
/// Filtering follows `RUST_LOG`. Calling this more than once, or after the
/// host installed its own logger, does nothing.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
