//! Mesh model: positions, faces, edges and coincident-vertex tables.
//!
//! A mesh is read-only as far as picking is concerned. Derived data (the
//! coincident-vertex lookup, vertex normals and tangents) is computed once at
//! construction.

use std::collections::HashMap;

use glam::{Quat, Vec2, Vec3, Vec4};

use crate::error::{MeshPickError, Result};
use crate::math::{look_rotation, triangle_normal, Aabb};
use crate::transform::Transform;

/// An edge between two mesh-local vertex indices, in the order given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    /// First vertex index.
    pub a: usize,
    /// Second vertex index.
    pub b: usize,
}

impl Edge {
    /// Creates an edge.
    #[must_use]
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// The same edge with the smaller index first.
    #[must_use]
    pub fn sorted(self) -> Self {
        if self.a <= self.b {
            self
        } else {
            Self::new(self.b, self.a)
        }
    }

    /// The same edge with its endpoints swapped.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self::new(self.b, self.a)
    }

    /// Whether `index` is one of the endpoints.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.a == index || self.b == index
    }
}

/// An edge paired with its orientation-independent coincident-vertex key.
///
/// Equality and hashing only consider `common`, so `(a, b)`, `(b, a)` and any
/// edge between coincident duplicates of `a` and `b` compare equal.
#[derive(Debug, Clone, Copy)]
pub struct EdgeLookup {
    /// The edge in mesh-local vertex indices.
    pub local: Edge,
    /// The edge in shared-vertex indices, smaller index first.
    pub common: Edge,
}

impl PartialEq for EdgeLookup {
    fn eq(&self, other: &Self) -> bool {
        self.common == other.common
    }
}

impl Eq for EdgeLookup {}

impl std::hash::Hash for EdgeLookup {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.common.hash(state);
    }
}

/// A polygon stored as a triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    indexes: Vec<usize>,
    distinct: Vec<usize>,
    edges: Vec<Edge>,
    submesh: usize,
}

impl Face {
    /// Creates a face from a triangulated index list.
    ///
    /// The list is validated when the face is added to a [`Mesh`].
    #[must_use]
    pub fn new(indexes: Vec<usize>) -> Self {
        let mut distinct = Vec::with_capacity(indexes.len());
        for &i in &indexes {
            if !distinct.contains(&i) {
                distinct.push(i);
            }
        }

        // Perimeter edges are the ones used by exactly one triangle of the face
        let mut counts: HashMap<Edge, usize> = HashMap::new();
        let mut ordered = Vec::with_capacity(indexes.len());
        for tri in indexes.chunks_exact(3) {
            for k in 0..3 {
                let edge = Edge::new(tri[k], tri[(k + 1) % 3]);
                *counts.entry(edge.sorted()).or_insert(0) += 1;
                ordered.push(edge);
            }
        }
        let edges = ordered
            .into_iter()
            .filter(|e| counts.get(&e.sorted()) == Some(&1))
            .collect();

        Self {
            indexes,
            distinct,
            edges,
            submesh: 0,
        }
    }

    /// Creates a quad face `a b c d` (counter-clockwise) split into two triangles.
    #[must_use]
    pub fn quad(a: usize, b: usize, c: usize, d: usize) -> Self {
        Self::new(vec![a, b, c, a, c, d])
    }

    /// Sets the submesh (material) tag.
    #[must_use]
    pub fn with_submesh(mut self, submesh: usize) -> Self {
        self.submesh = submesh;
        self
    }

    /// Triangulated vertex indices, three per triangle.
    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    /// Distinct vertex indices in first-appearance order.
    pub fn distinct_indexes(&self) -> &[usize] {
        &self.distinct
    }

    /// Perimeter edges.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Submesh (material) tag.
    pub fn submesh(&self) -> usize {
        self.submesh
    }

    /// Iterates the face's triangles.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indexes.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Whether the face has a perimeter edge matching `edge` in either direction.
    #[must_use]
    pub fn contains_edge(&self, edge: Edge) -> bool {
        let key = edge.sorted();
        self.edges.iter().any(|e| e.sorted() == key)
    }
}

/// Normal, tangent and bitangent of a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceFrame {
    /// Unit normal.
    pub normal: Vec3,
    /// Unit tangent with handedness in `w`.
    pub tangent: Vec4,
    /// Bitangent, `normal x tangent * w`.
    pub bitangent: Vec3,
}

/// A triangle mesh with polygonal faces and a local-to-world transform.
#[derive(Debug, Clone)]
pub struct Mesh {
    positions: Vec<Vec3>,
    faces: Vec<Face>,
    uvs: Option<Vec<Vec2>>,
    shared_vertices: Vec<Vec<usize>>,
    shared_lookup: Vec<usize>,
    normals: Vec<Vec3>,
    tangents: Vec<Vec4>,
    transform: Transform,
}

impl Mesh {
    /// Creates a mesh, grouping vertices with identical positions as coincident.
    pub fn new(positions: Vec<Vec3>, faces: Vec<Face>) -> Result<Self> {
        let count = positions.len();
        for (face_idx, face) in faces.iter().enumerate() {
            if face.indexes.is_empty() || face.indexes.len() % 3 != 0 {
                return Err(MeshPickError::InvalidTriangulation {
                    face: face_idx,
                    len: face.indexes.len(),
                });
            }
            if let Some(&index) = face.indexes.iter().find(|&&i| i >= count) {
                return Err(MeshPickError::VertexOutOfRange { index, count });
            }
        }

        Ok(Self::from_valid_parts(positions, faces, None))
    }

    /// Builds a mesh whose face indices are already known to be in range and
    /// whose UV channel (if any) matches the vertex count.
    pub(crate) fn from_valid_parts(
        positions: Vec<Vec3>,
        faces: Vec<Face>,
        uvs: Option<Vec<Vec2>>,
    ) -> Self {
        let shared_vertices = coincident_groups(&positions);
        let mut mesh = Self {
            shared_lookup: build_lookup(&shared_vertices, positions.len()),
            shared_vertices,
            positions,
            faces,
            uvs,
            normals: Vec::new(),
            tangents: Vec::new(),
            transform: Transform::identity(),
        };
        mesh.recompute();
        mesh
    }

    /// Replaces the coincident-vertex table.
    ///
    /// Every vertex must appear in exactly one group.
    pub fn with_shared_vertices(mut self, groups: Vec<Vec<usize>>) -> Result<Self> {
        let count = self.positions.len();
        let mut seen = vec![false; count];
        for group in &groups {
            if group.is_empty() {
                return Err(MeshPickError::InvalidSharedVertices(
                    "empty group".to_string(),
                ));
            }
            for &index in group {
                if index >= count {
                    return Err(MeshPickError::VertexOutOfRange { index, count });
                }
                if seen[index] {
                    return Err(MeshPickError::InvalidSharedVertices(format!(
                        "vertex {index} appears in more than one group"
                    )));
                }
                seen[index] = true;
            }
        }
        if let Some(missing) = seen.iter().position(|s| !s) {
            return Err(MeshPickError::InvalidSharedVertices(format!(
                "vertex {missing} is not in any group"
            )));
        }

        self.shared_lookup = build_lookup(&groups, count);
        self.shared_vertices = groups;
        Ok(self)
    }

    /// Adds a UV channel, used to derive tangents.
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Result<Self> {
        if uvs.len() != self.positions.len() {
            return Err(MeshPickError::SizeMismatch {
                expected: self.positions.len(),
                actual: uvs.len(),
            });
        }
        self.uvs = Some(uvs);
        self.recompute();
        Ok(self)
    }

    /// Sets the local-to-world transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Replaces the local-to-world transform.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// The local-to-world transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Local vertex positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Faces.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Returns a face, or an error for an out-of-range index.
    pub fn face(&self, index: usize) -> Result<&Face> {
        self.faces.get(index).ok_or(MeshPickError::FaceOutOfRange {
            index,
            count: self.faces.len(),
        })
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// UV channel, if present.
    pub fn uvs(&self) -> Option<&[Vec2]> {
        self.uvs.as_deref()
    }

    /// Per-vertex unit normals (zero for vertices used by no face).
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Per-vertex tangents with handedness in `w`.
    pub fn tangents(&self) -> &[Vec4] {
        &self.tangents
    }

    /// Coincident-vertex groups.
    pub fn shared_vertices(&self) -> &[Vec<usize>] {
        &self.shared_vertices
    }

    /// Checks a vertex index.
    pub fn check_vertex(&self, index: usize) -> Result<()> {
        if index < self.positions.len() {
            Ok(())
        } else {
            Err(MeshPickError::VertexOutOfRange {
                index,
                count: self.positions.len(),
            })
        }
    }

    /// The coincident group a vertex belongs to.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is out of range.
    pub fn shared_index(&self, vertex: usize) -> usize {
        self.shared_lookup[vertex]
    }

    /// All vertices coincident with `vertex`, itself included.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is out of range.
    pub fn coincident(&self, vertex: usize) -> &[usize] {
        &self.shared_vertices[self.shared_lookup[vertex]]
    }

    /// Expands indices to their full coincident groups, without duplicates,
    /// in first-appearance order.
    pub fn coincident_vertices(&self, indices: impl IntoIterator<Item = usize>) -> Vec<usize> {
        let mut seen = vec![false; self.shared_vertices.len()];
        let mut out = Vec::new();
        for index in indices {
            let group = self.shared_lookup[index];
            if !seen[group] {
                seen[group] = true;
                out.extend_from_slice(&self.shared_vertices[group]);
            }
        }
        out
    }

    /// The orientation-independent lookup key for a local edge.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint is out of range.
    pub fn edge_lookup(&self, edge: Edge) -> EdgeLookup {
        EdgeLookup {
            local: edge,
            common: Edge::new(self.shared_lookup[edge.a], self.shared_lookup[edge.b]).sorted(),
        }
    }

    /// World-space position of a vertex.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is out of range.
    pub fn world_position(&self, vertex: usize) -> Vec3 {
        self.transform.transform_point(self.positions[vertex])
    }

    /// Local bounds of the given vertices.
    pub fn local_bounds(&self, indices: impl IntoIterator<Item = usize>) -> Option<Aabb> {
        Aabb::from_points(indices.into_iter().map(|i| self.positions[i]))
    }

    /// World-space bounds of the given vertices.
    pub fn world_bounds(&self, indices: impl IntoIterator<Item = usize>) -> Option<Aabb> {
        Aabb::from_points(indices.into_iter().map(|i| self.world_position(i)))
    }

    /// The first face with `edge` on its perimeter, comparing coincident vertices.
    pub fn face_with_edge(&self, edge: Edge) -> Option<usize> {
        let key = self.edge_lookup(edge);
        self.faces
            .iter()
            .position(|f| f.edges.iter().any(|&e| self.edge_lookup(e) == key))
    }

    /// Normal, tangent and bitangent of a face, or `None` when degenerate.
    ///
    /// Uses the UV channel when present; otherwise the tangent follows the
    /// face's first perimeter edge.
    pub fn face_frame(&self, face: usize) -> Option<FaceFrame> {
        let face = self.faces.get(face)?;
        let [i0, i1, i2] = face.triangles().next()?;
        let (v0, v1, v2) = (self.positions[i0], self.positions[i1], self.positions[i2]);
        let normal = triangle_normal(v0, v1, v2).try_normalize()?;

        let (sdir, tdir) = match &self.uvs {
            Some(uvs) => uv_directions([v0, v1, v2], [uvs[i0], uvs[i1], uvs[i2]])?,
            None => {
                let edge = face.edges.first()?;
                let dir = self.positions[edge.b] - self.positions[edge.a];
                (dir, normal.cross(dir))
            }
        };

        let tangent = (sdir - normal * normal.dot(sdir)).try_normalize()?;
        let w = if normal.cross(tangent).dot(tdir) < 0.0 {
            -1.0
        } else {
            1.0
        };
        Some(FaceFrame {
            normal,
            tangent: tangent.extend(w),
            bitangent: normal.cross(tangent * w),
        })
    }

    /// World rotation of a face's normal frame; the mesh rotation when degenerate.
    pub fn face_rotation(&self, face: usize) -> Quat {
        self.face_frame(face)
            .and_then(|frame| look_rotation(frame.normal, frame.bitangent))
            .map_or(self.transform.rotation, |r| self.transform.rotation * r)
    }

    /// World rotation built from the averaged normals and tangents of `indices`.
    ///
    /// Falls back to the mesh rotation when either average is zero.
    pub fn vertex_rotation(&self, indices: impl IntoIterator<Item = usize>) -> Quat {
        let mut normal = Vec3::ZERO;
        let mut tangent = Vec4::ZERO;
        let mut count = 0.0_f32;
        for index in indices {
            normal += self.normals[index];
            tangent += self.tangents[index];
            count += 1.0;
        }
        if count == 0.0 {
            return self.transform.rotation;
        }
        normal /= count;
        tangent /= count;
        if normal.length_squared() <= f32::EPSILON || tangent.length_squared() <= f32::EPSILON {
            return self.transform.rotation;
        }

        let bitangent = normal.cross(tangent.truncate() * tangent.w);
        look_rotation(normal, bitangent)
            .map_or(self.transform.rotation, |r| self.transform.rotation * r)
    }

    /// Recomputes vertex normals and tangents.
    fn recompute(&mut self) {
        self.compute_vertex_normals();
        self.compute_tangents();
    }

    /// Vertex normals as the area-weighted average of incident face normals.
    fn compute_vertex_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);

        for face in &self.faces {
            for [a, b, c] in face.triangles() {
                // The unnormalized cross product is already area weighted
                let n = triangle_normal(self.positions[a], self.positions[b], self.positions[c]);
                self.normals[a] += n;
                self.normals[b] += n;
                self.normals[c] += n;
            }
        }

        for normal in &mut self.normals {
            *normal = normal.normalize_or_zero();
        }
    }

    /// Vertex tangents accumulated from each face's frame.
    fn compute_tangents(&mut self) {
        let mut sdirs = vec![Vec3::ZERO; self.positions.len()];
        let mut tdirs = vec![Vec3::ZERO; self.positions.len()];

        for face in &self.faces {
            for [a, b, c] in face.triangles() {
                let tri = [self.positions[a], self.positions[b], self.positions[c]];
                let dirs = match &self.uvs {
                    Some(uvs) => uv_directions(tri, [uvs[a], uvs[b], uvs[c]]),
                    None => face.edges.first().map(|e| {
                        let dir = self.positions[e.b] - self.positions[e.a];
                        (dir, triangle_normal(tri[0], tri[1], tri[2]).cross(dir))
                    }),
                };
                if let Some((sdir, tdir)) = dirs {
                    for i in [a, b, c] {
                        sdirs[i] += sdir;
                        tdirs[i] += tdir;
                    }
                }
            }
        }

        self.tangents = self
            .normals
            .iter()
            .zip(sdirs.iter().zip(&tdirs))
            .map(|(&n, (&s, &t))| {
                let tangent = (s - n * n.dot(s)).normalize_or_zero();
                let w = if n.cross(tangent).dot(t) < 0.0 { -1.0 } else { 1.0 };
                tangent.extend(w)
            })
            .collect();
    }
}

/// Texture-space tangent and bitangent directions of a triangle.
fn uv_directions(p: [Vec3; 3], uv: [Vec2; 3]) -> Option<(Vec3, Vec3)> {
    let (e1, e2) = (p[1] - p[0], p[2] - p[0]);
    let (s1, s2) = (uv[1].x - uv[0].x, uv[2].x - uv[0].x);
    let (t1, t2) = (uv[1].y - uv[0].y, uv[2].y - uv[0].y);
    let det = s1 * t2 - s2 * t1;
    if det.abs() <= f32::EPSILON {
        return None;
    }
    let r = 1.0 / det;
    Some(((e1 * t2 - e2 * t1) * r, (e2 * s1 - e1 * s2) * r))
}

/// Groups vertex indices by exact position.
fn coincident_groups(positions: &[Vec3]) -> Vec<Vec<usize>> {
    let mut by_position: HashMap<[u32; 3], usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (i, p) in positions.iter().enumerate() {
        // Normalize -0.0 so it groups with 0.0
        let key = [
            (p.x + 0.0).to_bits(),
            (p.y + 0.0).to_bits(),
            (p.z + 0.0).to_bits(),
        ];
        let group = *by_position.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[group].push(i);
    }
    groups
}

fn build_lookup(groups: &[Vec<usize>], count: usize) -> Vec<usize> {
    let mut lookup = vec![0; count];
    for (g, group) in groups.iter().enumerate() {
        for &i in group {
            lookup[i] = g;
        }
    }
    lookup
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangle_quad() -> Mesh {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        Mesh::new(positions, vec![Face::quad(0, 1, 2, 3)]).unwrap()
    }

    #[test]
    fn test_face_perimeter_excludes_diagonal() {
        let face = Face::quad(0, 1, 2, 3);
        assert_eq!(face.distinct_indexes(), &[0, 1, 2, 3]);
        assert_eq!(face.edges().len(), 4);
        assert!(!face.contains_edge(Edge::new(0, 2)));
        assert!(face.contains_edge(Edge::new(1, 0)));
    }

    #[test]
    fn test_invalid_triangulation_rejected() {
        let err = Mesh::new(vec![Vec3::ZERO; 3], vec![Face::new(vec![0, 1])]);
        assert!(matches!(
            err,
            Err(MeshPickError::InvalidTriangulation { face: 0, len: 2 })
        ));
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let err = Mesh::new(vec![Vec3::ZERO; 3], vec![Face::new(vec![0, 1, 7])]);
        assert!(matches!(
            err,
            Err(MeshPickError::VertexOutOfRange { index: 7, count: 3 })
        ));
    }

    #[test]
    fn test_coincident_vertices_grouped() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ZERO, Vec3::X, Vec3::NEG_Y];
        let faces = vec![Face::new(vec![0, 1, 2]), Face::new(vec![3, 5, 4])];
        let mesh = Mesh::new(positions, faces).unwrap();
        assert_eq!(mesh.shared_vertices().len(), 4);
        assert_eq!(mesh.coincident(3), &[0, 3]);
        assert_eq!(mesh.coincident_vertices([4, 1, 2]), vec![1, 4, 2]);
    }

    #[test]
    fn test_edge_lookup_is_orientation_independent() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ZERO, Vec3::X, Vec3::NEG_Y];
        let faces = vec![Face::new(vec![0, 1, 2]), Face::new(vec![3, 5, 4])];
        let mesh = Mesh::new(positions, faces).unwrap();
        assert_eq!(
            mesh.edge_lookup(Edge::new(0, 1)),
            mesh.edge_lookup(Edge::new(4, 3))
        );
        assert_ne!(
            mesh.edge_lookup(Edge::new(0, 1)),
            mesh.edge_lookup(Edge::new(0, 2))
        );
    }

    #[test]
    fn test_explicit_shared_vertices_validated() {
        let mesh = two_triangle_quad();
        assert!(mesh
            .clone()
            .with_shared_vertices(vec![vec![0, 1], vec![2]])
            .is_err());
        assert!(mesh
            .clone()
            .with_shared_vertices(vec![vec![0, 1], vec![1, 2, 3]])
            .is_err());
        let mesh = mesh
            .with_shared_vertices(vec![vec![0, 1], vec![2], vec![3]])
            .unwrap();
        assert_eq!(mesh.shared_index(1), 0);
    }

    #[test]
    fn test_uv_size_mismatch() {
        let mesh = two_triangle_quad();
        assert!(matches!(
            mesh.with_uvs(vec![Vec2::ZERO; 2]),
            Err(MeshPickError::SizeMismatch {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_vertex_normals_point_out_of_plane() {
        let mesh = two_triangle_quad();
        for n in mesh.normals() {
            assert!((*n - Vec3::Z).length() < 1e-5);
        }
    }

    #[test]
    fn test_face_frame_without_uvs() {
        let mesh = two_triangle_quad();
        let frame = mesh.face_frame(0).unwrap();
        assert!((frame.normal - Vec3::Z).length() < 1e-5);
        assert!(frame.tangent.truncate().dot(frame.normal).abs() < 1e-5);
        assert!(frame.bitangent.dot(frame.normal).abs() < 1e-5);
    }

    #[test]
    fn test_face_frame_with_uvs() {
        let uvs = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let mesh = two_triangle_quad().with_uvs(uvs).unwrap();
        let frame = mesh.face_frame(0).unwrap();
        assert!((frame.tangent.truncate() - Vec3::X).length() < 1e-5);
        assert!((frame.bitangent - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_face_rotation_looks_along_normal() {
        let mesh = two_triangle_quad();
        let rotation = mesh.face_rotation(0);
        assert!((rotation * Vec3::Z - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_vertex_rotation_falls_back_on_unused_vertex() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::splat(9.0)];
        let mesh = Mesh::new(positions, vec![Face::new(vec![0, 1, 2])])
            .unwrap()
            .with_transform(Transform::from_rotation(Quat::from_rotation_x(0.5)));
        assert_eq!(mesh.vertex_rotation([3]), Quat::from_rotation_x(0.5));
        assert_eq!(
            mesh.vertex_rotation(std::iter::empty()),
            Quat::from_rotation_x(0.5)
        );
    }

    #[test]
    fn test_face_with_edge_uses_coincident_vertices() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ZERO, Vec3::X, Vec3::NEG_Y];
        let faces = vec![Face::new(vec![0, 1, 2]), Face::new(vec![3, 5, 4])];
        let mesh = Mesh::new(positions, faces).unwrap();
        assert_eq!(mesh.face_with_edge(Edge::new(5, 4)), Some(1));
        assert_eq!(mesh.face_with_edge(Edge::new(4, 3)), Some(0));
        assert_eq!(mesh.face_with_edge(Edge::new(2, 5)), None);
    }
}
