//! Picking, rect selection and element grouping over a [`meshpick_core::Scene`].
//!
//! - [`PickerSession`] resolves a pointer position to a single vertex, edge or
//!   face, cycling through overlapping objects on repeated clicks
//! - [`drag_select`] and the `pick_*_in_rect` functions collect elements
//!   under a screen rectangle and merge them into the selection
//! - [`build_groups`] splits a mesh selection into [`ElementGroup`]s for
//!   manipulation handles

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Pixel math converts between usize and f32 freely
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_arguments)]

pub mod groups;
pub mod picker;
pub mod rect;

pub use groups::{build_groups, ElementGroup};
pub use picker::{pick_edge, pick_vertex, PickQuery, PickResult, PickerSession};
pub use rect::{
    combine_selection, drag_select, pick_edges_in_rect, pick_faces_in_rect,
    pick_vertices_in_rect, RectHits,
};
