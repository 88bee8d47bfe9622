//! Element groups: rigid clusters of selected vertices that share a pivot.
//!
//! A manipulation handle moves each group through its own frame. Vertices
//! are taken into group space with [`ElementGroup::pre_apply_matrix`], moved
//! by the handle delta, then taken back with
//! [`ElementGroup::post_apply_matrix`]. Under
//! [`PivotPoint::IndividualOrigins`] every connected cluster gets its own
//! frame, so the pair must be applied per group.

use std::collections::{HashMap, HashSet};

use glam::{Mat4, Quat, Vec3};
use meshpick_core::{
    Edge, EdgeLookup, HandleOrientation, Mesh, MeshSelection, PivotPoint, Result, SelectMode,
    WingId, WingedEdgeGraph,
};

/// A cluster of mesh-local vertex indices sharing one pivot transform.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementGroup {
    indices: Vec<usize>,
    position: Vec3,
    rotation: Quat,
    post_apply: Mat4,
    pre_apply: Mat4,
}

impl ElementGroup {
    /// Creates a group pivoting at a world `position` with world `rotation`.
    pub fn new(indices: Vec<usize>, position: Vec3, rotation: Quat) -> Self {
        let post_apply = Mat4::from_rotation_translation(rotation, position);
        Self {
            indices,
            position,
            rotation,
            post_apply,
            pre_apply: post_apply.inverse(),
        }
    }

    /// Mesh-local vertex indices in the group.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// World-space pivot.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// World-space orientation.
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Group space to world space.
    pub fn post_apply_matrix(&self) -> Mat4 {
        self.post_apply
    }

    /// World space to group space.
    pub fn pre_apply_matrix(&self) -> Mat4 {
        self.pre_apply
    }

    /// Moves the pivot.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.rebuild_matrices();
    }

    /// Reorients the pivot.
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.rebuild_matrices();
    }

    fn rebuild_matrices(&mut self) {
        self.post_apply = Mat4::from_rotation_translation(self.rotation, self.position);
        self.pre_apply = self.post_apply.inverse();
    }

    /// A world point in group space.
    pub fn to_group_space(&self, world: Vec3) -> Vec3 {
        self.pre_apply.transform_point3(world)
    }

    /// A group-space point in world space.
    pub fn to_world_space(&self, local: Vec3) -> Vec3 {
        self.post_apply.transform_point3(local)
    }

    /// Applies a group-space `delta` to a world point.
    pub fn transform_point(&self, world: Vec3, delta: Mat4) -> Vec3 {
        (self.post_apply * delta * self.pre_apply).transform_point3(world)
    }
}

/// Builds the element groups for a mesh's current selection.
///
/// `mode` picks which of the selection's lists is grouped. An empty
/// selection yields no groups. With `collect_coincident` each group's
/// indices are expanded to whole coincident-vertex sets.
pub fn build_groups(
    mesh: &Mesh,
    selection: &MeshSelection,
    mode: SelectMode,
    pivot: PivotPoint,
    orientation: HandleOrientation,
    collect_coincident: bool,
) -> Result<Vec<ElementGroup>> {
    if selection.is_empty_for(mode) {
        return Ok(Vec::new());
    }

    let groups = match pivot {
        PivotPoint::IndividualOrigins => match mode {
            SelectMode::Vertex => vertex_groups(mesh, selection, orientation, collect_coincident),
            SelectMode::Edge => edge_groups(mesh, selection, orientation, collect_coincident),
            SelectMode::Face => face_groups(mesh, selection, orientation, collect_coincident)?,
        },
        PivotPoint::ActiveElement => {
            match active_element_group(mesh, selection, mode, orientation, collect_coincident)? {
                Some(group) => vec![group],
                None => center_group(mesh, selection, mode, orientation, collect_coincident)?
                    .into_iter()
                    .collect(),
            }
        }
        PivotPoint::Center => center_group(mesh, selection, mode, orientation, collect_coincident)?
            .into_iter()
            .collect(),
    };

    log::trace!(
        "{} element groups for {mode:?} selection ({pivot:?}, {orientation:?})",
        groups.len()
    );
    Ok(groups)
}

fn selected_indices(
    mesh: &Mesh,
    selection: &MeshSelection,
    mode: SelectMode,
    collect_coincident: bool,
) -> Result<Vec<usize>> {
    let indices = selection.vertex_indices(mesh, mode)?;
    Ok(if collect_coincident {
        mesh.coincident_vertices(indices)
    } else {
        indices
    })
}

/// World position of the local bounds center of `indices`.
fn pivot_of(mesh: &Mesh, indices: impl IntoIterator<Item = usize>) -> Option<Vec3> {
    mesh.local_bounds(indices)
        .map(|b| mesh.transform().transform_point(b.center()))
}

fn oriented(mesh: &Mesh, orientation: HandleOrientation, element: impl FnOnce() -> Quat) -> Quat {
    match orientation {
        HandleOrientation::World => Quat::IDENTITY,
        HandleOrientation::ActiveObject => mesh.transform().rotation,
        HandleOrientation::ActiveElement => element(),
    }
}

fn edge_rotation(mesh: &Mesh, edge: Edge) -> Quat {
    mesh.vertex_rotation([edge.a, edge.b])
}

/// Rotation of one element of the selection list for `mode`.
fn element_rotation(mesh: &Mesh, selection: &MeshSelection, mode: SelectMode, first: bool) -> Quat {
    let pick = |len: usize| if first { 0 } else { len.saturating_sub(1) };
    let fallback = mesh.transform().rotation;
    match mode {
        SelectMode::Face => selection
            .faces()
            .get(pick(selection.faces().len()))
            .map_or(fallback, |&f| mesh.face_rotation(f)),
        SelectMode::Edge => selection
            .edges()
            .get(pick(selection.edges().len()))
            .map_or(fallback, |&e| edge_rotation(mesh, e)),
        SelectMode::Vertex => selection
            .vertices()
            .get(pick(selection.vertices().len()))
            .map_or(fallback, |&v| mesh.vertex_rotation([v])),
    }
}

fn center_group(
    mesh: &Mesh,
    selection: &MeshSelection,
    mode: SelectMode,
    orientation: HandleOrientation,
    collect_coincident: bool,
) -> Result<Option<ElementGroup>> {
    let indices = selected_indices(mesh, selection, mode, collect_coincident)?;
    let Some(bounds) = mesh.world_bounds(indices.iter().copied()) else {
        return Ok(None);
    };
    let position = bounds.center();
    let rotation = oriented(mesh, orientation, || element_rotation(mesh, selection, mode, true));
    Ok(Some(ElementGroup::new(indices, position, rotation)))
}

fn active_element_group(
    mesh: &Mesh,
    selection: &MeshSelection,
    mode: SelectMode,
    orientation: HandleOrientation,
    collect_coincident: bool,
) -> Result<Option<ElementGroup>> {
    let position = match mode {
        SelectMode::Face => match selection.active_face() {
            Some(face) => pivot_of(mesh, mesh.face(face)?.distinct_indexes().iter().copied()),
            None => None,
        },
        SelectMode::Edge => selection
            .active_edge()
            .and_then(|e| pivot_of(mesh, [e.a, e.b])),
        SelectMode::Vertex => selection
            .active_vertex()
            .map(|v| mesh.world_position(v)),
    };
    let Some(position) = position else {
        return Ok(None);
    };

    let indices = selected_indices(mesh, selection, mode, collect_coincident)?;
    let rotation = oriented(mesh, orientation, || element_rotation(mesh, selection, mode, false));
    Ok(Some(ElementGroup::new(indices, position, rotation)))
}

fn cluster_group(
    mesh: &Mesh,
    orientation: HandleOrientation,
    indices: Vec<usize>,
) -> Option<ElementGroup> {
    let position = pivot_of(mesh, indices.iter().copied())?;
    let rotation = oriented(mesh, orientation, || mesh.vertex_rotation(indices.iter().copied()));
    Some(ElementGroup::new(indices, position, rotation))
}

/// One group per selected logical vertex.
fn vertex_groups(
    mesh: &Mesh,
    selection: &MeshSelection,
    orientation: HandleOrientation,
    collect_coincident: bool,
) -> Vec<ElementGroup> {
    let mut order = Vec::new();
    let mut members: HashMap<usize, Vec<usize>> = HashMap::new();
    for &v in selection.vertices() {
        let shared = mesh.shared_index(v);
        let entry = members.entry(shared).or_default();
        if entry.is_empty() {
            order.push(shared);
        }
        entry.push(v);
    }

    order
        .into_iter()
        .filter_map(|shared| {
            let selected = members.remove(&shared)?;
            let indices = if collect_coincident {
                mesh.coincident_vertices(selected)
            } else {
                selected
            };
            cluster_group(mesh, orientation, indices)
        })
        .collect()
}

/// Wings around the coincident vertex `vertex`, starting from a wing on it.
///
/// Within a face ring the two wings touching a vertex are `next`/`previous`
/// neighbours, and `opposite` crosses into the adjacent face.
fn vertex_fan(graph: &WingedEdgeGraph, start: WingId, vertex: usize) -> Vec<WingId> {
    let mut fan = vec![start];
    let mut visited = HashSet::from([start]);
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        let Some(wing) = graph.get(id) else {
            continue;
        };
        for next in [Some(wing.next), Some(wing.previous), wing.opposite]
            .into_iter()
            .flatten()
        {
            let touches = graph.get(next).is_some_and(|w| w.edge.common.contains(vertex));
            if touches && visited.insert(next) {
                fan.push(next);
                stack.push(next);
            }
        }
    }
    fan
}

/// One group per cluster of selected edges connected through shared
/// vertices.
fn edge_groups(
    mesh: &Mesh,
    selection: &MeshSelection,
    orientation: HandleOrientation,
    collect_coincident: bool,
) -> Vec<ElementGroup> {
    let graph = WingedEdgeGraph::from_mesh(mesh);
    let mut wing_of: HashMap<Edge, WingId> = HashMap::new();
    for (id, wing) in graph.iter() {
        wing_of.entry(wing.edge.common).or_insert(id);
    }

    let selected: Vec<EdgeLookup> = selection.edges().iter().map(|&e| mesh.edge_lookup(e)).collect();
    let by_common: HashMap<Edge, EdgeLookup> = selected.iter().map(|l| (l.common, *l)).collect();
    let mut visited: HashSet<Edge> = HashSet::new();
    let mut groups = Vec::new();

    for seed in &selected {
        if !visited.insert(seed.common) {
            continue;
        }
        let mut cluster = Vec::new();
        let mut stack = vec![*seed];
        while let Some(lookup) = stack.pop() {
            cluster.push(lookup.local);
            let Some(&wing) = wing_of.get(&lookup.common) else {
                continue;
            };
            for vertex in [lookup.common.a, lookup.common.b] {
                for id in vertex_fan(&graph, wing, vertex) {
                    let Some(common) = graph.get(id).map(|w| w.edge.common) else {
                        continue;
                    };
                    if let Some(&other) = by_common.get(&common) {
                        if visited.insert(common) {
                            stack.push(other);
                        }
                    }
                }
            }
        }

        let endpoints: Vec<usize> = cluster.iter().flat_map(|e| [e.a, e.b]).collect();
        let indices = if collect_coincident {
            mesh.coincident_vertices(endpoints)
        } else {
            let mut seen = HashSet::new();
            endpoints.into_iter().filter(|&v| seen.insert(v)).collect()
        };
        groups.extend(cluster_group(mesh, orientation, indices));
    }
    groups
}

/// One group per island of selected faces connected through shared edges.
fn face_groups(
    mesh: &Mesh,
    selection: &MeshSelection,
    orientation: HandleOrientation,
    collect_coincident: bool,
) -> Result<Vec<ElementGroup>> {
    let graph = WingedEdgeGraph::build(mesh, selection.faces().iter().copied())?;
    let mut visited = HashSet::new();
    let mut groups = Vec::new();

    for &seed in selection.faces() {
        if !visited.insert(seed) {
            continue;
        }
        let mut island = Vec::new();
        let mut stack = vec![seed];
        while let Some(face) = stack.pop() {
            island.push(face);
            for neighbour in graph.adjacent_faces(face) {
                if visited.insert(neighbour) {
                    stack.push(neighbour);
                }
            }
        }

        let mut seen = HashSet::new();
        let mut indices = Vec::new();
        for &face in &island {
            for &v in mesh.face(face)?.distinct_indexes() {
                if seen.insert(v) {
                    indices.push(v);
                }
            }
        }
        if collect_coincident {
            indices = mesh.coincident_vertices(indices);
        }
        groups.extend(cluster_group(mesh, orientation, indices));
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshpick_core::Transform;
    use proptest::prelude::*;

    fn cube_with_faces(faces: &[usize]) -> (Mesh, MeshSelection) {
        let mesh = Mesh::cube(2.0);
        let mut selection = MeshSelection::new();
        selection.set_faces(&mesh, faces.iter().copied()).unwrap();
        (mesh, selection)
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-4
    }

    #[test]
    fn test_opposite_faces_form_two_groups() {
        let (mesh, selection) = cube_with_faces(&[4, 5]);
        let groups = build_groups(
            &mesh,
            &selection,
            SelectMode::Face,
            PivotPoint::IndividualOrigins,
            HandleOrientation::World,
            false,
        )
        .unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.indices().len() == 4));
        assert!(approx(groups[0].position(), Vec3::new(0.0, 0.0, 1.0)));
        assert!(approx(groups[1].position(), Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_adjacent_faces_form_one_group() {
        let (mesh, selection) = cube_with_faces(&[0, 4]);
        let groups = build_groups(
            &mesh,
            &selection,
            SelectMode::Face,
            PivotPoint::IndividualOrigins,
            HandleOrientation::World,
            false,
        )
        .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].indices().len(), 8);
    }

    #[test]
    fn test_center_pivot_single_group() {
        let (mesh, selection) = cube_with_faces(&[4, 5]);
        let groups = build_groups(
            &mesh,
            &selection,
            SelectMode::Face,
            PivotPoint::Center,
            HandleOrientation::World,
            false,
        )
        .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].indices().len(), 8);
        assert!(approx(groups[0].position(), Vec3::ZERO));
        assert_eq!(groups[0].rotation(), Quat::IDENTITY);
    }

    #[test]
    fn test_active_element_uses_last_face() {
        let mesh = Mesh::cube(2.0)
            .with_transform(Transform::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        let mut selection = MeshSelection::new();
        selection.set_faces(&mesh, [4, 0]).unwrap();
        let groups = build_groups(
            &mesh,
            &selection,
            SelectMode::Face,
            PivotPoint::ActiveElement,
            HandleOrientation::ActiveElement,
            false,
        )
        .unwrap();
        assert_eq!(groups.len(), 1);
        // Face 0 is +X
        assert!(approx(groups[0].position(), Vec3::new(6.0, 0.0, 0.0)));
        let forward = groups[0].rotation() * Vec3::Z;
        assert!(approx(forward, Vec3::X));
    }

    #[test]
    fn test_active_element_without_active_falls_back_to_center() {
        let (mesh, selection) = cube_with_faces(&[4, 5]);
        // No active edge in a face-only selection
        let active = active_element_group(
            &mesh,
            &selection,
            SelectMode::Edge,
            HandleOrientation::World,
            false,
        )
        .unwrap();
        assert!(active.is_none());

        // With a single element the active element and the center agree
        let (mesh, selection) = cube_with_faces(&[2]);
        let build = |pivot| {
            build_groups(&mesh, &selection, SelectMode::Face, pivot, HandleOrientation::World, false)
                .unwrap()
        };
        let (active, center) = (build(PivotPoint::ActiveElement), build(PivotPoint::Center));
        assert!(approx(active[0].position(), center[0].position()));
        assert_eq!(active[0].indices(), center[0].indices());
    }

    #[test]
    fn test_center_uses_world_bounds_of_rotated_mesh() {
        let mesh = Mesh::cube(2.0).with_transform(Transform::from_rotation(Quat::from_rotation_z(
            std::f32::consts::FRAC_PI_4,
        )));
        // An L of three corners on the front face
        let pick = |p: Vec3| {
            mesh.shared_vertices()
                .iter()
                .map(|g| g[0])
                .find(|&v| mesh.positions()[v] == p)
                .unwrap()
        };
        let corners = [
            pick(Vec3::new(1.0, 1.0, 1.0)),
            pick(Vec3::new(-1.0, 1.0, 1.0)),
            pick(Vec3::new(1.0, -1.0, 1.0)),
        ];
        let mut selection = MeshSelection::new();
        selection.set_vertices(&mesh, corners).unwrap();

        let groups = build_groups(
            &mesh,
            &selection,
            SelectMode::Vertex,
            PivotPoint::Center,
            HandleOrientation::World,
            false,
        )
        .unwrap();
        let expected = mesh.world_bounds(corners).unwrap().center();
        assert!(approx(groups[0].position(), expected));
        assert!(approx(expected, Vec3::new(0.0, std::f32::consts::FRAC_1_SQRT_2, 1.0)));
    }

    #[test]
    fn test_object_orientation_uses_mesh_rotation() {
        let rotation = Quat::from_rotation_y(0.5);
        let mesh = Mesh::cube(2.0).with_transform(Transform::from_rotation(rotation));
        let mut selection = MeshSelection::new();
        selection.set_faces(&mesh, [2]).unwrap();
        let groups = build_groups(
            &mesh,
            &selection,
            SelectMode::Face,
            PivotPoint::Center,
            HandleOrientation::ActiveObject,
            false,
        )
        .unwrap();
        assert!(groups[0].rotation().abs_diff_eq(rotation, 1e-6));
    }

    #[test]
    fn test_empty_selection_has_no_groups() {
        let mesh = Mesh::cube(1.0);
        for pivot in [PivotPoint::Center, PivotPoint::IndividualOrigins, PivotPoint::ActiveElement] {
            let groups = build_groups(
                &mesh,
                &MeshSelection::new(),
                SelectMode::Edge,
                pivot,
                HandleOrientation::World,
                true,
            )
            .unwrap();
            assert!(groups.is_empty());
        }
    }

    #[test]
    fn test_vertex_groups_per_logical_vertex() {
        let mesh = Mesh::cube(2.0);
        let mut selection = MeshSelection::new();
        let a = mesh.shared_vertices()[0][0];
        let b = mesh.shared_vertices()[1][0];
        selection.toggle_vertex(&mesh, a).unwrap();
        selection.toggle_vertex(&mesh, b).unwrap();
        let groups = build_groups(
            &mesh,
            &selection,
            SelectMode::Vertex,
            PivotPoint::IndividualOrigins,
            HandleOrientation::World,
            true,
        )
        .unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.indices().len() == 3));
        assert!(approx(groups[0].position(), mesh.world_position(a)));
    }

    #[test]
    fn test_edge_groups_follow_shared_vertices() {
        let mesh = Mesh::cube(2.0);
        // Two edges of the front face meeting at a corner, and the opposite
        // edge of the back face
        let front = mesh.faces()[4].edges();
        let back = mesh.faces()[5].edges();
        let mut selection = MeshSelection::new();
        selection
            .set_edges(&mesh, [front[0], front[1], back[0]])
            .unwrap();
        let groups = build_groups(
            &mesh,
            &selection,
            SelectMode::Edge,
            PivotPoint::IndividualOrigins,
            HandleOrientation::World,
            false,
        )
        .unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].indices().len(), 3);
        assert_eq!(groups[1].indices().len(), 2);
    }

    #[test]
    fn test_set_position_rebuilds_matrices() {
        let mut group = ElementGroup::new(vec![0], Vec3::ZERO, Quat::IDENTITY);
        group.set_position(Vec3::new(1.0, 2.0, 3.0));
        group.set_rotation(Quat::from_rotation_x(1.0));
        let p = Vec3::new(-4.0, 0.5, 2.0);
        assert!(approx(group.to_world_space(group.to_group_space(p)), p));
        assert!(approx(group.to_world_space(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_transform_point_rotates_about_pivot() {
        let group = ElementGroup::new(vec![], Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY);
        let delta = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let moved = group.transform_point(Vec3::new(2.0, 0.0, 0.0), delta);
        assert!(approx(moved, Vec3::new(1.0, 1.0, 0.0)));
    }

    proptest! {
        #[test]
        fn prop_pre_post_round_trip(
            px in -100.0f32..100.0, py in -100.0f32..100.0, pz in -100.0f32..100.0,
            gx in -50.0f32..50.0, gy in -50.0f32..50.0, gz in -50.0f32..50.0,
            ax in -3.0f32..3.0, ay in -3.0f32..3.0,
        ) {
            let mut group = ElementGroup::new(vec![], Vec3::new(gx, gy, gz), Quat::from_euler(glam::EulerRot::XYZ, ax, ay, 0.0));
            let p = Vec3::new(px, py, pz);
            prop_assert!(group.to_world_space(group.to_group_space(p)).distance(p) < 1e-2);

            group.set_rotation(Quat::from_rotation_z(ax));
            group.set_position(Vec3::new(gz, gx, gy));
            prop_assert!(group.to_world_space(group.to_group_space(p)).distance(p) < 1e-2);
            prop_assert!((group.pre_apply_matrix() * group.post_apply_matrix()).abs_diff_eq(Mat4::IDENTITY, 1e-4));
        }
    }
}
