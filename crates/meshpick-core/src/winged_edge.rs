//! Winged-edge adjacency over a subset of a mesh's faces.
//!
//! Wings live in a flat arena and refer to each other by index. Each face
//! contributes one wing per perimeter edge, linked into a ring through
//! `next`/`previous`. Wings on the same (coincident) edge of two faces are
//! linked through `opposite`.

use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::mesh::{Edge, EdgeLookup, Mesh};

/// Index of a wing in its [`WingedEdgeGraph`].
pub type WingId = usize;

/// One face's half of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WingedEdge {
    /// The edge, local and coincident forms.
    pub edge: EdgeLookup,
    /// Index of the face this wing belongs to.
    pub face: usize,
    /// Next wing around the face.
    pub next: WingId,
    /// Previous wing around the face.
    pub previous: WingId,
    /// The wing on the neighbouring face sharing this edge.
    pub opposite: Option<WingId>,
}

/// Winged-edge arena.
#[derive(Debug, Clone, Default)]
pub struct WingedEdgeGraph {
    wings: Vec<WingedEdge>,
    face_start: HashMap<usize, WingId>,
}

impl WingedEdgeGraph {
    /// Builds the graph for the given faces of `mesh`.
    ///
    /// Duplicate face indices are ignored. Edges shared by more than two
    /// faces are non-manifold; only the first two wings found are paired.
    pub fn build(mesh: &Mesh, faces: impl IntoIterator<Item = usize>) -> Result<Self> {
        let mut graph = Self::default();
        let mut by_edge: HashMap<Edge, Vec<WingId>> = HashMap::new();

        for face_index in faces {
            if graph.face_start.contains_key(&face_index) {
                continue;
            }
            let face = mesh.face(face_index)?;
            let ring = sort_edges_by_adjacency(face.edges());
            if ring.is_empty() {
                continue;
            }

            let first = graph.wings.len();
            let n = ring.len();
            graph.face_start.insert(face_index, first);
            for (k, &edge) in ring.iter().enumerate() {
                let lookup = mesh.edge_lookup(edge);
                by_edge.entry(lookup.common).or_default().push(first + k);
                graph.wings.push(WingedEdge {
                    edge: lookup,
                    face: face_index,
                    next: first + (k + 1) % n,
                    previous: first + (k + n - 1) % n,
                    opposite: None,
                });
            }
        }

        for (common, ids) in by_edge {
            if ids.len() < 2 {
                continue;
            }
            if ids.len() > 2 {
                log::warn!(
                    "non-manifold edge {}-{} is shared by {} faces, pairing the first two",
                    common.a,
                    common.b,
                    ids.len()
                );
            }
            graph.wings[ids[0]].opposite = Some(ids[1]);
            graph.wings[ids[1]].opposite = Some(ids[0]);
        }

        Ok(graph)
    }

    /// Builds the graph for every face of `mesh`.
    #[must_use]
    pub fn from_mesh(mesh: &Mesh) -> Self {
        // Face indices from the mesh's own range are always valid
        Self::build(mesh, 0..mesh.face_count()).unwrap_or_default()
    }

    /// All wings.
    pub fn wings(&self) -> &[WingedEdge] {
        &self.wings
    }

    /// A wing by id.
    pub fn get(&self, id: WingId) -> Option<&WingedEdge> {
        self.wings.get(id)
    }

    /// Iterates wings with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (WingId, &WingedEdge)> {
        self.wings.iter().enumerate()
    }

    /// The first wing of `face`'s ring, if the face is part of the graph.
    pub fn face_wing(&self, face: usize) -> Option<WingId> {
        self.face_start.get(&face).copied()
    }

    /// Number of wings.
    pub fn len(&self) -> usize {
        self.wings.len()
    }

    /// Whether the graph has no wings.
    pub fn is_empty(&self) -> bool {
        self.wings.is_empty()
    }

    /// Ids of the wings around `face`, in ring order. Empty if the face is
    /// not part of the graph.
    pub fn face_wings(&self, face: usize) -> Vec<WingId> {
        let Some(start) = self.face_wing(face) else {
            return Vec::new();
        };
        let mut ring = vec![start];
        let mut cur = self.wings[start].next;
        while cur != start {
            ring.push(cur);
            cur = self.wings[cur].next;
        }
        ring
    }

    /// Faces that share an edge with `face`.
    pub fn adjacent_faces(&self, face: usize) -> Vec<usize> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for id in self.face_wings(face) {
            if let Some(opp) = self.wings[id].opposite {
                let f = self.wings[opp].face;
                if seen.insert(f) {
                    out.push(f);
                }
            }
        }
        out
    }
}

/// Orders perimeter edges so that each edge starts where the previous ended.
///
/// Edges that do not chain (for faces with holes or stray triangles) are
/// appended in their original order after the chain breaks.
fn sort_edges_by_adjacency(edges: &[Edge]) -> Vec<Edge> {
    let mut remaining: Vec<Edge> = edges.to_vec();
    let mut sorted = Vec::with_capacity(edges.len());

    while !remaining.is_empty() {
        let mut current = remaining.remove(0);
        sorted.push(current);
        while let Some(pos) = remaining.iter().position(|e| e.a == current.b) {
            current = remaining.remove(pos);
            sorted.push(current);
        }
    }

    sorted
}
