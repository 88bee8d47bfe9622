//! Configuration options for picking and selection.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Pointer distance (in GUI pixels) used by the forgiving "fuzzy" picking mode.
pub const MAX_POINTER_DISTANCE_FUZZY: f32 = 128.0;

/// Pointer distance (in GUI pixels) used by the "precise" picking mode.
pub const MAX_POINTER_DISTANCE_PRECISE: f32 = 12.0;

/// Smallest pointer distance accepted; smaller values are clamped up.
pub const MIN_POINTER_DISTANCE: f32 = 1.0;

/// Largest pointer distance accepted; larger values are clamped down.
pub const MAX_POINTER_DISTANCE: f32 = 4096.0;

/// Preferences that drive a single click or drag pick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenePickerPreferences {
    /// Maximum distance (GUI pixels) between pointer and element for a hit.
    pub max_pointer_distance: f32,

    /// Which triangle sides are ignored by face raycasts.
    pub cull_mode: CullingMode,

    /// How a drag selection combines with the existing selection when an
    /// append modifier is held.
    pub selection_modifier_behavior: SelectionModifierBehavior,

    /// Whether drag selection needs elements fully or partially inside the rect.
    pub rect_select_mode: RectSelectMode,
}

impl Default for ScenePickerPreferences {
    fn default() -> Self {
        Self {
            max_pointer_distance: MAX_POINTER_DISTANCE_FUZZY,
            cull_mode: CullingMode::Back,
            selection_modifier_behavior: SelectionModifierBehavior::Difference,
            rect_select_mode: RectSelectMode::Partial,
        }
    }
}

impl ScenePickerPreferences {
    /// Creates preferences with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates preferences using the precise pointer distance.
    #[must_use]
    pub fn precise() -> Self {
        Self::default().with_max_pointer_distance(MAX_POINTER_DISTANCE_PRECISE)
    }

    /// Parses preferences from JSON, filling missing fields with defaults.
    ///
    /// Out-of-range values are clamped rather than rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let prefs: Self = serde_json::from_str(json)?;
        Ok(prefs.clamped())
    }

    /// Sets the maximum pointer distance, clamped to a sane range.
    #[must_use]
    pub fn with_max_pointer_distance(mut self, distance: f32) -> Self {
        self.max_pointer_distance = clamp_pointer_distance(distance);
        self
    }

    /// Sets the culling mode.
    #[must_use]
    pub fn with_cull_mode(mut self, cull_mode: CullingMode) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    /// Sets the selection modifier behavior.
    #[must_use]
    pub fn with_selection_modifier_behavior(mut self, behavior: SelectionModifierBehavior) -> Self {
        self.selection_modifier_behavior = behavior;
        self
    }

    /// Sets the rect select mode.
    #[must_use]
    pub fn with_rect_select_mode(mut self, mode: RectSelectMode) -> Self {
        self.rect_select_mode = mode;
        self
    }

    /// Returns a copy with every numeric field clamped into range.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.max_pointer_distance = clamp_pointer_distance(self.max_pointer_distance);
        self
    }

    /// Returns the squared maximum pointer distance.
    #[must_use]
    pub fn max_pointer_distance_squared(&self) -> f32 {
        self.max_pointer_distance * self.max_pointer_distance
    }

    /// Options for rect selection derived from these preferences.
    ///
    /// Depth testing is enabled only when back faces are culled.
    #[must_use]
    pub fn picker_options(&self) -> PickerOptions {
        PickerOptions {
            depth_test: self.cull_mode == CullingMode::Back,
            rect_select_mode: self.rect_select_mode,
        }
    }
}

fn clamp_pointer_distance(distance: f32) -> f32 {
    if distance.is_nan() {
        MAX_POINTER_DISTANCE_FUZZY
    } else {
        distance.clamp(MIN_POINTER_DISTANCE, MAX_POINTER_DISTANCE)
    }
}

/// Options for rect (drag) selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerOptions {
    /// Exclude elements hidden behind other geometry.
    pub depth_test: bool,
    /// Whether elements must be fully or partially inside the rect.
    pub rect_select_mode: RectSelectMode,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            depth_test: true,
            rect_select_mode: RectSelectMode::Partial,
        }
    }
}

/// Which triangle sides a raycast ignores.
///
/// A triangle is front facing when its winding normal points back toward
/// the ray origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CullingMode {
    /// Both sides are hit.
    None,
    /// Back-facing triangles are ignored.
    #[default]
    Back,
    /// Front-facing triangles are ignored.
    Front,
}

/// How a drag selection combines with the existing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SelectionModifierBehavior {
    /// Union of the existing selection and the new hits.
    Add,
    /// Existing selection minus the new hits.
    Subtract,
    /// Elements in exactly one of the two sets.
    #[default]
    Difference,
}

/// Containment rule for rect selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RectSelectMode {
    /// Elements overlapping the rect are hit.
    #[default]
    Partial,
    /// Only elements entirely inside the rect are hit.
    Complete,
}

/// The element granularity being picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SelectMode {
    /// Vertex selection.
    Vertex,
    /// Edge selection.
    Edge,
    /// Face selection.
    #[default]
    Face,
}

/// Where manipulation handles pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PivotPoint {
    /// One group per mesh, centered on the selection bounds.
    #[default]
    Center,
    /// One group per connected cluster of selected elements.
    IndividualOrigins,
    /// One group per mesh, placed on the most recently selected element.
    ActiveElement,
}

/// How manipulation handles are oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HandleOrientation {
    /// Aligned with the world axes.
    #[default]
    World,
    /// Aligned with the mesh's transform.
    ActiveObject,
    /// Aligned with the element's normal frame.
    ActiveElement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preferences() {
        let prefs = ScenePickerPreferences::default();
        assert_eq!(prefs.max_pointer_distance, MAX_POINTER_DISTANCE_FUZZY);
        assert_eq!(prefs.cull_mode, CullingMode::Back);
        assert_eq!(
            prefs.selection_modifier_behavior,
            SelectionModifierBehavior::Difference
        );
        assert_eq!(prefs.rect_select_mode, RectSelectMode::Partial);
    }

    #[test]
    fn test_pointer_distance_is_clamped() {
        let prefs = ScenePickerPreferences::new().with_max_pointer_distance(-5.0);
        assert_eq!(prefs.max_pointer_distance, MIN_POINTER_DISTANCE);

        let prefs = ScenePickerPreferences::new().with_max_pointer_distance(1.0e9);
        assert_eq!(prefs.max_pointer_distance, MAX_POINTER_DISTANCE);

        let prefs = ScenePickerPreferences::new().with_max_pointer_distance(f32::NAN);
        assert_eq!(prefs.max_pointer_distance, MAX_POINTER_DISTANCE_FUZZY);
    }

    #[test]
    fn test_from_json_fills_defaults_and_clamps() {
        let prefs =
            ScenePickerPreferences::from_json(r#"{ "max_pointer_distance": 0.01 }"#).unwrap();
        assert_eq!(prefs.max_pointer_distance, MIN_POINTER_DISTANCE);
        assert_eq!(prefs.cull_mode, CullingMode::Back);

        let prefs = ScenePickerPreferences::from_json(
            r#"{ "cull_mode": "None", "selection_modifier_behavior": "Add" }"#,
        )
        .unwrap();
        assert_eq!(prefs.cull_mode, CullingMode::None);
        assert_eq!(prefs.selection_modifier_behavior, SelectionModifierBehavior::Add);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(ScenePickerPreferences::from_json("not json").is_err());
    }

    #[test]
    fn test_picker_options_depth_test_follows_culling() {
        let prefs = ScenePickerPreferences::default();
        assert!(prefs.picker_options().depth_test);

        let prefs = prefs.with_cull_mode(CullingMode::None);
        assert!(!prefs.picker_options().depth_test);
    }
}
