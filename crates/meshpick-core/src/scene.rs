//! Scene objects and the object-level selection.

use std::collections::HashSet;

use glam::{Vec2, Vec3};

use crate::camera::ViewProjection;
use crate::error::{MeshPickError, Result};
use crate::math::Aabb;
use crate::mesh::Mesh;
use crate::options::CullingMode;
use crate::raycast::{point_is_occluded, raycast_face};
use crate::selection::MeshSelection;

/// Stable identifier of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An object in the scene, optionally carrying a mesh.
#[derive(Debug, Clone)]
pub struct SceneObject {
    id: ObjectId,
    name: String,
    mesh: Option<Mesh>,
    bounds: Option<Aabb>,
    /// Whether picking may return this object.
    pub selectable: bool,
    /// Hidden objects are neither picked nor occlude anything.
    pub visible: bool,
    selection: MeshSelection,
}

impl SceneObject {
    /// The object's id.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The object's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The mesh, if this is a mesh object.
    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    /// Replaces the mesh, dropping selected elements that no longer exist.
    pub fn set_mesh(&mut self, mesh: Mesh) {
        self.selection.retain_valid(&mesh);
        self.mesh = Some(mesh);
    }

    /// The persistent element selection.
    pub fn selection(&self) -> &MeshSelection {
        &self.selection
    }

    /// Mutable access to the persistent element selection together with the
    /// mesh it refers to.
    pub fn mesh_and_selection_mut(&mut self) -> Option<(&Mesh, &mut MeshSelection)> {
        let mesh = self.mesh.as_ref()?;
        Some((mesh, &mut self.selection))
    }

    /// World-space bounds: the mesh's vertex bounds, or the explicit bounds
    /// of a mesh-less object.
    pub fn world_bounds(&self) -> Option<Aabb> {
        match &self.mesh {
            Some(mesh) => mesh.world_bounds(0..mesh.vertex_count()),
            None => self.bounds,
        }
    }

    fn pickable(&self) -> bool {
        self.visible && self.selectable
    }
}

/// A set of objects plus the ordered object selection.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    selected: Vec<ObjectId>,
    next_id: u32,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, name: &str, mesh: Option<Mesh>, bounds: Option<Aabb>) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(SceneObject {
            id,
            name: name.to_string(),
            mesh,
            bounds,
            selectable: true,
            visible: true,
            selection: MeshSelection::new(),
        });
        log::debug!("added object {id} '{name}'");
        id
    }

    /// Adds a mesh object.
    pub fn add_mesh(&mut self, name: &str, mesh: Mesh) -> ObjectId {
        self.insert(name, Some(mesh), None)
    }

    /// Adds an object without a mesh, pickable through its world bounds.
    pub fn add_object(&mut self, name: &str, bounds: Aabb) -> ObjectId {
        self.insert(name, None, Some(bounds))
    }

    /// Gets an object.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Gets an object mutably.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Gets an object, or an error for an unknown id.
    pub fn object(&self, id: ObjectId) -> Result<&SceneObject> {
        self.get(id).ok_or(MeshPickError::ObjectNotFound(id))
    }

    /// Gets an object's mesh, or an error if the object is unknown or has none.
    pub fn mesh(&self, id: ObjectId) -> Result<&Mesh> {
        self.object(id)?.mesh().ok_or(MeshPickError::NotAMesh(id))
    }

    /// Removes an object and drops it from the selection.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let pos = self.objects.iter().position(|o| o.id == id)?;
        self.selected.retain(|&s| s != id);
        Some(self.objects.remove(pos))
    }

    /// Iterates objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Selected objects in selection order.
    pub fn selected(&self) -> &[ObjectId] {
        &self.selected
    }

    /// The most recently selected object.
    pub fn active_object(&self) -> Option<ObjectId> {
        self.selected.last().copied()
    }

    /// Whether an object is selected.
    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selected.contains(&id)
    }

    /// Replaces the object selection.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = ObjectId>) -> Result<()> {
        let mut out = Vec::new();
        for id in ids {
            self.object(id)?;
            if !out.contains(&id) {
                out.push(id);
            }
        }
        self.selected = out;
        Ok(())
    }

    /// Adds an object to the selection, making it the active object.
    pub fn add_to_selection(&mut self, id: ObjectId) -> Result<()> {
        self.object(id)?;
        self.selected.retain(|&s| s != id);
        self.selected.push(id);
        Ok(())
    }

    /// Removes an object from the selection.
    pub fn remove_from_selection(&mut self, id: ObjectId) {
        self.selected.retain(|&s| s != id);
    }

    /// Selected objects that carry a mesh, in selection order.
    pub fn selected_meshes(&self) -> impl Iterator<Item = (ObjectId, &Mesh)> {
        self.selected
            .iter()
            .filter_map(|&id| self.get(id).and_then(|o| o.mesh().map(|m| (id, m))))
    }

    /// Meshes of every visible object.
    pub fn visible_meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.objects
            .iter()
            .filter(|o| o.visible)
            .filter_map(SceneObject::mesh)
    }

    /// Clears the element selection of every mesh.
    pub fn clear_element_selection(&mut self) {
        for object in &mut self.objects {
            object.selection.clear();
        }
    }

    /// Clears both the element selection and the object selection.
    pub fn clear_element_and_object_selection(&mut self) {
        self.clear_element_selection();
        self.selected.clear();
    }

    /// Whether `point` is hidden from the camera by any visible mesh.
    pub fn is_occluded(&self, camera: &dyn ViewProjection, point: Vec3) -> bool {
        point_is_occluded(camera, self.visible_meshes(), point)
    }

    /// The nearest pickable object under a GUI point and its ray distance.
    ///
    /// Meshes are raycast with `cull`; mesh-less objects are hit through
    /// their bounds. Objects in `ignore` are skipped. On equal distances the
    /// object added first wins.
    pub fn pick_topmost(
        &self,
        camera: &dyn ViewProjection,
        point: Vec2,
        cull: CullingMode,
        ignore: &HashSet<ObjectId>,
    ) -> Option<(ObjectId, f32)> {
        let ray = camera.screen_to_ray(point);
        let mut best: Option<(ObjectId, f32)> = None;

        for object in self.objects.iter().filter(|o| o.pickable()) {
            if ignore.contains(&object.id) {
                continue;
            }
            let distance = match &object.mesh {
                Some(mesh) => raycast_face(&ray, mesh, cull).map(|h| h.distance),
                None => object.bounds.and_then(|b| b.ray_intersection(&ray)),
            };
            if let Some(d) = distance {
                if best.map_or(true, |(_, bd)| d < bd) {
                    best = Some((object.id, d));
                }
            }
        }

        best
    }

    /// The topmost object under a GUI point.
    pub fn hovered(
        &self,
        camera: &dyn ViewProjection,
        point: Vec2,
        cull: CullingMode,
    ) -> Option<ObjectId> {
        self.pick_topmost(camera, point, cull, &HashSet::new())
            .map(|(id, _)| id)
    }

    /// Every object under a GUI point, nearest first.
    pub fn all_overlapping(
        &self,
        camera: &dyn ViewProjection,
        point: Vec2,
        cull: CullingMode,
    ) -> Vec<ObjectId> {
        let mut ignore = HashSet::new();
        let mut stack = Vec::new();
        while let Some((id, _)) = self.pick_topmost(camera, point, cull, &ignore) {
            ignore.insert(id);
            stack.push(id);
        }
        stack
    }
}
