//! Click and hover picking of single mesh elements.
//!
//! Each granularity has its own strategy:
//! - faces are raycast, with repeated clicks cycling through the stack of
//!   overlapping objects ([`PickerSession::pick_face`])
//! - vertices are the nearest unoccluded coincident-vertex representative in
//!   screen space ([`pick_vertex`])
//! - edges are the nearest face perimeter edge in screen space, preferring
//!   selected meshes ([`pick_edge`])
//!
//! "Nothing picked" is a [`PickResult`] with an infinite distance, never an
//! error.

mod edge;
mod face;
mod vertex;

pub use edge::pick_edge;
pub use vertex::pick_vertex;

use glam::Vec2;
use meshpick_core::{
    ObjectId, Scene, SceneSelection, ScenePickerPreferences, SelectMode, ViewProjection,
};

/// The outcome of a pick query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    /// What was picked. `object` may be set even when no element was.
    pub selection: SceneSelection,
    /// Screen distance in GUI pixels between the pointer and the picked
    /// element, or infinity when nothing was picked.
    pub distance: f32,
}

impl PickResult {
    /// A result with nothing picked.
    #[must_use]
    pub fn none() -> Self {
        Self {
            selection: SceneSelection::new(),
            distance: f32::INFINITY,
        }
    }

    /// A result with only the hovered object set.
    #[must_use]
    pub fn object_only(object: Option<ObjectId>) -> Self {
        Self {
            selection: SceneSelection {
                object,
                ..SceneSelection::new()
            },
            distance: f32::INFINITY,
        }
    }

    /// Whether an element was picked within `max_distance` pixels.
    #[must_use]
    pub fn is_within(&self, max_distance: f32) -> bool {
        self.selection.element.is_some() && self.distance <= max_distance
    }
}

impl Default for PickResult {
    fn default() -> Self {
        Self::none()
    }
}

/// Parameters of one pick query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickQuery {
    /// Pointer position in GUI pixels.
    pub point: Vec2,
    /// Whether meshes outside the object selection may be picked.
    pub allow_unselected: bool,
    /// Hover queries never advance the deep-click cursor.
    pub preview: bool,
    /// Modifier keys held; disables deep-click cycling.
    pub modifiers_held: bool,
    /// Second click of a double click; re-picks the current deep-click
    /// candidate instead of advancing.
    pub double_click: bool,
}

impl PickQuery {
    /// A click query that may pick unselected meshes.
    #[must_use]
    pub fn click(point: Vec2) -> Self {
        Self {
            point,
            allow_unselected: true,
            preview: false,
            modifiers_held: false,
            double_click: false,
        }
    }

    /// A hover query that may pick unselected meshes.
    #[must_use]
    pub fn hover(point: Vec2) -> Self {
        Self {
            preview: true,
            ..Self::click(point)
        }
    }

    /// Sets whether unselected meshes may be picked.
    #[must_use]
    pub fn with_allow_unselected(mut self, allow: bool) -> Self {
        self.allow_unselected = allow;
        self
    }

    /// Sets whether modifier keys are held.
    #[must_use]
    pub fn with_modifiers_held(mut self, held: bool) -> Self {
        self.modifiers_held = held;
        self
    }

    /// Sets whether this is the second click of a double click.
    #[must_use]
    pub fn with_double_click(mut self, double: bool) -> Self {
        self.double_click = double;
        self
    }

    /// How far a repeated click moves down the stack of overlapping
    /// candidates.
    fn deep_click_step(&self) -> usize {
        usize::from(!self.double_click)
    }
}

/// Identity of the last candidate returned by a click, used to cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct DeepClickKey {
    pub(crate) object: ObjectId,
    pub(crate) face: Option<usize>,
}

/// Picker state that persists between queries.
///
/// Only the deep-click cursor lives here; each viewport owns its own
/// session.
#[derive(Debug, Clone, Default)]
pub struct PickerSession {
    previous: Option<DeepClickKey>,
}

impl PickerSession {
    /// Creates a session with no deep-click history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the deep-click history.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Picks one element at the granularity `mode`.
    ///
    /// Preferences are clamped before use, so out-of-range or NaN values
    /// behave like their nearest valid setting.
    pub fn pick(
        &mut self,
        mode: SelectMode,
        scene: &Scene,
        camera: &dyn ViewProjection,
        prefs: &ScenePickerPreferences,
        query: &PickQuery,
    ) -> PickResult {
        let prefs = &prefs.clamped();
        let result = match mode {
            SelectMode::Face => self.pick_face(scene, camera, prefs, query),
            SelectMode::Vertex => pick_vertex(scene, camera, prefs, query),
            SelectMode::Edge => pick_edge(scene, camera, prefs, query),
        };
        log::debug!(
            "{mode:?} pick at ({:.1}, {:.1}): {:?} at {:.2}px",
            query.point.x,
            query.point.y,
            result.selection.element,
            result.distance
        );
        result
    }
}
