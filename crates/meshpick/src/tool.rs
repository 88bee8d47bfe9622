//! Pointer-driven selection tool.
//!
//! [`SelectionTool`] turns a stream of pointer events into picks, element
//! toggles and drag selections against a [`Scene`]. A press released within
//! [`ToolSettings::drag_threshold`] pixels of travel is a click; anything
//! longer is a drag, re-evaluated on every update against the selection as
//! it was when the drag started.

use glam::Vec2;
use meshpick_core::{
    HandleOrientation, MeshSelection, ObjectId, PivotPoint, Result, Scene, ScenePickerPreferences,
    ScreenRect, SelectMode, ViewProjection,
};
use meshpick_select::{build_groups, drag_select, ElementGroup, PickQuery, PickResult, PickerSession};
use serde::{Deserialize, Serialize};

use crate::undo::UndoRecorder;

/// Pointer travel (GUI pixels) below which a press counts as a click.
pub const DEFAULT_DRAG_THRESHOLD: f32 = 5.0;

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Shift key.
    pub shift: bool,
    /// Control key.
    pub control: bool,
    /// Alt (option) key.
    pub alt: bool,
    /// Command (super) key.
    pub command: bool,
}

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        command: false,
    };

    /// Only shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Whether the held keys extend the selection instead of replacing it.
    pub fn append(&self) -> bool {
        self.shift || self.control || self.command
    }

    /// Whether any modifier is held.
    pub fn any(&self) -> bool {
        self.append() || self.alt
    }
}

/// What happened to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button pressed.
    Down,
    /// Moved with the button held.
    Drag,
    /// Button released.
    Up,
    /// Moved with no button held.
    Move,
}

/// One pointer event in GUI pixels (origin at the top left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerEventKind,
    /// Pointer position in GUI pixels.
    pub position: Vec2,
    /// Modifier keys held at the time.
    pub modifiers: Modifiers,
    /// 2 on the second press of a double click.
    pub click_count: u32,
}

impl PointerEvent {
    /// Creates an event with no modifiers and a click count of 1.
    pub fn new(kind: PointerEventKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            modifiers: Modifiers::NONE,
            click_count: 1,
        }
    }

    /// A button press.
    pub fn down(position: Vec2) -> Self {
        Self::new(PointerEventKind::Down, position)
    }

    /// A move with the button held.
    pub fn drag(position: Vec2) -> Self {
        Self::new(PointerEventKind::Drag, position)
    }

    /// A button release.
    pub fn up(position: Vec2) -> Self {
        Self::new(PointerEventKind::Up, position)
    }

    /// A hover move with no button held.
    pub fn moved(position: Vec2) -> Self {
        Self::new(PointerEventKind::Move, position)
    }

    /// Sets the held modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Sets the click count.
    pub fn with_click_count(mut self, click_count: u32) -> Self {
        self.click_count = click_count;
        self
    }
}

/// Settings of the selection tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Element granularity picked and grouped.
    pub select_mode: SelectMode,
    /// Where element groups pivot.
    pub pivot: PivotPoint,
    /// How element groups are oriented.
    pub orientation: HandleOrientation,
    /// Expand group indices to whole coincident-vertex sets.
    pub collect_coincident: bool,
    /// Pointer travel (GUI pixels) that turns a press into a drag.
    pub drag_threshold: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            select_mode: SelectMode::Face,
            pivot: PivotPoint::Center,
            orientation: HandleOrientation::World,
            collect_coincident: true,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }
}

impl ToolSettings {
    /// Creates settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut settings: Self = serde_json::from_str(json)?;
        if !settings.drag_threshold.is_finite() || settings.drag_threshold < 0.0 {
            settings.drag_threshold = DEFAULT_DRAG_THRESHOLD;
        }
        Ok(settings)
    }

    /// Sets the element granularity.
    pub fn with_select_mode(mut self, mode: SelectMode) -> Self {
        self.select_mode = mode;
        self
    }

    /// Sets the group pivot.
    pub fn with_pivot(mut self, pivot: PivotPoint) -> Self {
        self.pivot = pivot;
        self
    }

    /// Sets the group orientation.
    pub fn with_orientation(mut self, orientation: HandleOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets whether groups take whole coincident-vertex sets.
    pub fn with_collect_coincident(mut self, collect: bool) -> Self {
        self.collect_coincident = collect;
        self
    }

    /// Sets the click/drag travel threshold in GUI pixels.
    pub fn with_drag_threshold(mut self, threshold: f32) -> Self {
        self.drag_threshold = threshold;
        self
    }
}

/// What an event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolResponse {
    /// Nothing a host needs to redraw.
    Unchanged,
    /// The hover pick differs from the previous one.
    HoverChanged,
    /// The object or element selection may have changed.
    SelectionChanged,
}

/// Object and element selection captured when a drag starts.
#[derive(Debug, Clone)]
struct SelectionSnapshot {
    objects: Vec<ObjectId>,
    elements: Vec<(ObjectId, MeshSelection)>,
}

impl SelectionSnapshot {
    fn capture(scene: &Scene) -> Self {
        Self {
            objects: scene.selected().to_vec(),
            elements: scene
                .iter()
                .map(|o| (o.id(), o.selection().clone()))
                .collect(),
        }
    }

    fn restore(&self, scene: &mut Scene) -> Result<()> {
        for (id, selection) in &self.elements {
            if let Some((_, current)) = scene.get_mut(*id).and_then(|o| o.mesh_and_selection_mut()) {
                current.clone_from(selection);
            }
        }
        // Objects removed mid-drag are dropped from the restored selection
        let objects: Vec<ObjectId> = self
            .objects
            .iter()
            .copied()
            .filter(|&id| scene.get(id).is_some())
            .collect();
        scene.set_selection(objects)
    }
}

#[derive(Debug, Clone)]
struct Press {
    origin: Vec2,
    last: Vec2,
    travelled: f32,
    click_count: u32,
    drag: Option<SelectionSnapshot>,
}

/// Event-driven selection tool for one viewport.
#[derive(Debug, Clone)]
pub struct SelectionTool {
    prefs: ScenePickerPreferences,
    settings: ToolSettings,
    session: PickerSession,
    hover: PickResult,
    press: Option<Press>,
}

impl SelectionTool {
    /// Creates a tool.
    pub fn new(prefs: ScenePickerPreferences, settings: ToolSettings) -> Self {
        Self {
            prefs: prefs.clamped(),
            settings,
            session: PickerSession::new(),
            hover: PickResult::none(),
            press: None,
        }
    }

    /// The clamped picker preferences in use.
    pub fn preferences(&self) -> &ScenePickerPreferences {
        &self.prefs
    }

    /// Replaces the picker preferences.
    pub fn set_preferences(&mut self, prefs: ScenePickerPreferences) {
        self.prefs = prefs.clamped();
    }

    /// The tool settings.
    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    /// Replaces the tool settings. Changing the select mode forgets the
    /// deep-click history.
    pub fn set_settings(&mut self, settings: ToolSettings) {
        if settings.select_mode != self.settings.select_mode {
            self.session.reset();
        }
        self.settings = settings;
    }

    /// The latest hover pick.
    pub fn hover(&self) -> &PickResult {
        &self.hover
    }

    /// Whether a drag selection is in progress.
    pub fn is_dragging(&self) -> bool {
        self.press.as_ref().is_some_and(|p| p.drag.is_some())
    }

    /// The rect of the drag in progress.
    pub fn drag_rect(&self) -> Option<ScreenRect> {
        self.press
            .as_ref()
            .filter(|p| p.drag.is_some())
            .map(|p| ScreenRect::from_corners(p.origin, p.last))
    }

    /// Abandons a press or drag in progress, leaving the selection as it is.
    pub fn cancel(&mut self) {
        self.press = None;
    }

    /// Handles one pointer event.
    pub fn handle_event(
        &mut self,
        event: &PointerEvent,
        scene: &mut Scene,
        camera: &dyn ViewProjection,
        undo: &mut dyn UndoRecorder,
    ) -> Result<ToolResponse> {
        match event.kind {
            PointerEventKind::Move => Ok(self.update_hover(event, scene, camera)),
            PointerEventKind::Down => {
                self.press = Some(Press {
                    origin: event.position,
                    last: event.position,
                    travelled: 0.0,
                    click_count: event.click_count,
                    drag: None,
                });
                Ok(ToolResponse::Unchanged)
            }
            PointerEventKind::Drag => self.update_drag(event, scene, camera, undo),
            PointerEventKind::Up => {
                let response = self.update_drag(event, scene, camera, undo)?;
                let Some(press) = self.press.take() else {
                    return Ok(ToolResponse::Unchanged);
                };
                if press.drag.is_some() {
                    return Ok(response);
                }
                self.click(event, press.click_count, scene, camera, undo)?;
                Ok(ToolResponse::SelectionChanged)
            }
        }
    }

    fn update_hover(
        &mut self,
        event: &PointerEvent,
        scene: &Scene,
        camera: &dyn ViewProjection,
    ) -> ToolResponse {
        let query = PickQuery::hover(event.position).with_modifiers_held(event.modifiers.any());
        let result = self
            .session
            .pick(self.settings.select_mode, scene, camera, &self.prefs, &query);
        let previous = std::mem::replace(&mut self.hover, result);
        if previous.selection == self.hover.selection {
            ToolResponse::Unchanged
        } else {
            ToolResponse::HoverChanged
        }
    }

    fn update_drag(
        &mut self,
        event: &PointerEvent,
        scene: &mut Scene,
        camera: &dyn ViewProjection,
        undo: &mut dyn UndoRecorder,
    ) -> Result<ToolResponse> {
        let threshold = self.settings.drag_threshold;
        let Some(press) = self.press.as_mut() else {
            return Ok(ToolResponse::Unchanged);
        };

        let delta = event.position - press.last;
        press.travelled += delta.x.abs() + delta.y.abs();
        press.last = event.position;

        if press.drag.is_none() {
            if press.travelled < threshold {
                return Ok(ToolResponse::Unchanged);
            }
            undo.record_selection("Drag Select", scene.selected());
            press.drag = Some(SelectionSnapshot::capture(scene));
            log::debug!("drag selection started at ({:.1}, {:.1})", press.origin.x, press.origin.y);
        }

        let rect = ScreenRect::from_corners(press.origin, press.last);
        if let Some(snapshot) = &press.drag {
            snapshot.restore(scene)?;
        }
        drag_select(
            scene,
            camera,
            &rect,
            self.settings.select_mode,
            &self.prefs,
            event.modifiers.append(),
        )?;
        Ok(ToolResponse::SelectionChanged)
    }

    fn click(
        &mut self,
        event: &PointerEvent,
        click_count: u32,
        scene: &mut Scene,
        camera: &dyn ViewProjection,
        undo: &mut dyn UndoRecorder,
    ) -> Result<()> {
        let append = event.modifiers.append();
        let query = PickQuery::click(event.position)
            .with_modifiers_held(event.modifiers.any())
            .with_double_click(click_count >= 2);
        let result = self
            .session
            .pick(self.settings.select_mode, scene, camera, &self.prefs, &query);

        undo.record_selection("Change Selection", scene.selected());

        if !append {
            scene.clear_element_and_object_selection();
        }

        if result.distance > self.prefs.max_pointer_distance {
            if let Some(object) = result.selection.object {
                if append && scene.is_selected(object) {
                    scene.remove_from_selection(object);
                } else {
                    scene.add_to_selection(object)?;
                }
            }
            return Ok(());
        }

        let (Some(object), Some(element)) = (result.selection.mesh, result.selection.element) else {
            return Ok(());
        };
        scene.add_to_selection(object)?;
        if let Some((mesh, selection)) = scene.get_mut(object).and_then(|o| o.mesh_and_selection_mut()) {
            let selected = selection.toggle(mesh, element)?;
            log::debug!("{element:?} of {object} {}", if selected { "selected" } else { "deselected" });
        }
        Ok(())
    }

    /// Element groups for every selected mesh, built from the current
    /// selection.
    pub fn element_groups(&self, scene: &Scene) -> Result<Vec<(ObjectId, Vec<ElementGroup>)>> {
        let mut out = Vec::new();
        for &id in scene.selected() {
            let object = scene.object(id)?;
            let Some(mesh) = object.mesh() else {
                continue;
            };
            let groups = build_groups(
                mesh,
                object.selection(),
                self.settings.select_mode,
                self.settings.pivot,
                self.settings.orientation,
                self.settings.collect_coincident,
            )?;
            if !groups.is_empty() {
                out.push((id, groups));
            }
        }
        Ok(out)
    }
}
