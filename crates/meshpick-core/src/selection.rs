//! Pick results and persistent per-mesh selection sets.

use std::collections::HashSet;

use crate::error::{MeshPickError, Result};
use crate::mesh::{Edge, Mesh};
use crate::options::SelectMode;
use crate::scene::ObjectId;

/// The single element a pick landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickedElement {
    /// A vertex index.
    Vertex(usize),
    /// A mesh-local edge.
    Edge(Edge),
    /// A face index.
    Face(usize),
}

/// Result of one pick query.
///
/// A fresh value is produced by every query. Hosts that redraw on hover
/// changes keep the previous value and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneSelection {
    /// The object under the pointer, even when no element was picked.
    pub object: Option<ObjectId>,
    /// The object whose mesh owns `element`.
    pub mesh: Option<ObjectId>,
    /// The picked element.
    pub element: Option<PickedElement>,
}

impl SceneSelection {
    /// An empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A selection of just an object.
    #[must_use]
    pub fn object(object: ObjectId) -> Self {
        Self {
            object: Some(object),
            ..Self::default()
        }
    }

    /// A selection of one element of an object's mesh.
    #[must_use]
    pub fn element(object: ObjectId, element: PickedElement) -> Self {
        Self {
            object: Some(object),
            mesh: Some(object),
            element: Some(element),
        }
    }

    /// Resets every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether no mesh element was picked. The hovered object may still be set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mesh.is_none() && self.element.is_none()
    }

    /// The picked vertex, if any.
    #[must_use]
    pub fn vertex(&self) -> Option<usize> {
        match self.element {
            Some(PickedElement::Vertex(v)) => Some(v),
            _ => None,
        }
    }

    /// The picked edge, if any.
    #[must_use]
    pub fn edge(&self) -> Option<Edge> {
        match self.element {
            Some(PickedElement::Edge(e)) => Some(e),
            _ => None,
        }
    }

    /// The picked face, if any.
    #[must_use]
    pub fn face(&self) -> Option<usize> {
        match self.element {
            Some(PickedElement::Face(f)) => Some(f),
            _ => None,
        }
    }
}

/// The persistent selection of one mesh.
///
/// Each granularity keeps its own ordered list; the last entry is the
/// active element. Edges are stored in local form but compared through
/// the mesh's coincident-vertex table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeshSelection {
    vertices: Vec<usize>,
    edges: Vec<Edge>,
    faces: Vec<usize>,
}

impl MeshSelection {
    /// An empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected vertex indices in selection order.
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Selected edges in selection order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Selected face indices in selection order.
    pub fn faces(&self) -> &[usize] {
        &self.faces
    }

    /// Whether nothing is selected at any granularity.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty() && self.faces.is_empty()
    }

    /// Whether nothing is selected at the given granularity.
    pub fn is_empty_for(&self, mode: SelectMode) -> bool {
        match mode {
            SelectMode::Vertex => self.vertices.is_empty(),
            SelectMode::Edge => self.edges.is_empty(),
            SelectMode::Face => self.faces.is_empty(),
        }
    }

    /// Clears every granularity.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.faces.clear();
    }

    /// The most recently selected vertex.
    pub fn active_vertex(&self) -> Option<usize> {
        self.vertices.last().copied()
    }

    /// The most recently selected edge.
    pub fn active_edge(&self) -> Option<Edge> {
        self.edges.last().copied()
    }

    /// The most recently selected face.
    pub fn active_face(&self) -> Option<usize> {
        self.faces.last().copied()
    }

    /// Whether `vertex` is selected.
    pub fn contains_vertex(&self, vertex: usize) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Whether an edge coincident with `edge` is selected.
    pub fn contains_edge(&self, mesh: &Mesh, edge: Edge) -> bool {
        let key = mesh.edge_lookup(edge);
        self.edges.iter().any(|&e| mesh.edge_lookup(e) == key)
    }

    /// Whether `face` is selected.
    pub fn contains_face(&self, face: usize) -> bool {
        self.faces.contains(&face)
    }

    /// Replaces the vertex selection, dropping duplicates.
    pub fn set_vertices(
        &mut self,
        mesh: &Mesh,
        vertices: impl IntoIterator<Item = usize>,
    ) -> Result<()> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for v in vertices {
            mesh.check_vertex(v)?;
            if seen.insert(v) {
                out.push(v);
            }
        }
        self.vertices = out;
        Ok(())
    }

    /// Replaces the edge selection, dropping coincident duplicates.
    pub fn set_edges(&mut self, mesh: &Mesh, edges: impl IntoIterator<Item = Edge>) -> Result<()> {
        let mut out: Vec<Edge> = Vec::new();
        let mut keys = HashSet::new();
        for e in edges {
            mesh.check_vertex(e.a)?;
            mesh.check_vertex(e.b)?;
            if keys.insert(mesh.edge_lookup(e)) {
                out.push(e);
            }
        }
        self.edges = out;
        Ok(())
    }

    /// Replaces the face selection, dropping duplicates.
    pub fn set_faces(&mut self, mesh: &Mesh, faces: impl IntoIterator<Item = usize>) -> Result<()> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for f in faces {
            mesh.face(f)?;
            if seen.insert(f) {
                out.push(f);
            }
        }
        self.faces = out;
        Ok(())
    }

    /// Toggles a vertex together with its coincident group.
    ///
    /// If any vertex of the group is selected the whole group is removed,
    /// otherwise the group is added with `vertex` last (active). Returns
    /// whether the vertex is selected afterwards.
    pub fn toggle_vertex(&mut self, mesh: &Mesh, vertex: usize) -> Result<bool> {
        mesh.check_vertex(vertex)?;
        let group = mesh.coincident(vertex);
        if group.iter().any(|v| self.vertices.contains(v)) {
            self.vertices.retain(|v| !group.contains(v));
            Ok(false)
        } else {
            self.vertices
                .extend(group.iter().copied().filter(|&v| v != vertex));
            self.vertices.push(vertex);
            Ok(true)
        }
    }

    /// Toggles an edge, matching either orientation and coincident duplicates.
    pub fn toggle_edge(&mut self, mesh: &Mesh, edge: Edge) -> Result<bool> {
        mesh.check_vertex(edge.a)?;
        mesh.check_vertex(edge.b)?;
        let key = mesh.edge_lookup(edge);
        let before = self.edges.len();
        self.edges.retain(|&e| mesh.edge_lookup(e) != key);
        if self.edges.len() == before {
            self.edges.push(edge);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Toggles a face.
    pub fn toggle_face(&mut self, mesh: &Mesh, face: usize) -> Result<bool> {
        mesh.face(face)?;
        if let Some(pos) = self.faces.iter().position(|&f| f == face) {
            self.faces.remove(pos);
            Ok(false)
        } else {
            self.faces.push(face);
            Ok(true)
        }
    }

    /// Toggles whichever element was picked.
    pub fn toggle(&mut self, mesh: &Mesh, element: PickedElement) -> Result<bool> {
        match element {
            PickedElement::Vertex(v) => self.toggle_vertex(mesh, v),
            PickedElement::Edge(e) => self.toggle_edge(mesh, e),
            PickedElement::Face(f) => self.toggle_face(mesh, f),
        }
    }

    /// Distinct vertex indices touched by the selection at `mode`, in
    /// selection order.
    pub fn vertex_indices(&self, mesh: &Mesh, mode: SelectMode) -> Result<Vec<usize>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut push = |v: usize| {
            if seen.insert(v) {
                out.push(v);
            }
        };
        match mode {
            SelectMode::Vertex => self.vertices.iter().copied().for_each(&mut push),
            SelectMode::Edge => {
                for e in &self.edges {
                    push(e.a);
                    push(e.b);
                }
            }
            SelectMode::Face => {
                for &f in &self.faces {
                    mesh.face(f)?
                        .distinct_indexes()
                        .iter()
                        .copied()
                        .for_each(&mut push);
                }
            }
        }
        Ok(out)
    }

    /// Drops entries that no longer exist in `mesh`.
    pub fn retain_valid(&mut self, mesh: &Mesh) {
        let (vc, fc) = (mesh.vertex_count(), mesh.face_count());
        let before = (self.vertices.len(), self.edges.len(), self.faces.len());
        self.vertices.retain(|&v| v < vc);
        self.edges.retain(|e| e.a < vc && e.b < vc);
        self.faces.retain(|&f| f < fc);
        if before != (self.vertices.len(), self.edges.len(), self.faces.len()) {
            log::debug!("dropped out-of-range entries from mesh selection");
        }
    }
}
