//! Rect (drag) selection.
//!
//! The `pick_*_in_rect` functions collect the elements of every selected mesh
//! that fall inside a GUI-space rectangle. [`drag_select`] combines those hits
//! with each mesh's persistent selection.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use glam::{Vec2, Vec3};
use meshpick_core::math::{point_in_triangle_2d, triangle_normal};
use meshpick_core::{
    EdgeLookup, Face, Mesh, MeshSelection, ObjectId, PickerOptions, RectSelectMode, Result, Scene,
    ScenePickerPreferences, ScreenRect, SelectMode, SelectionModifierBehavior, ViewProjection,
};

/// Elements hit by a rect, per object, in mesh order without duplicates.
pub type RectHits<T> = HashMap<ObjectId, Vec<T>>;

/// Projects a world point, or `None` when it is in front of the near plane.
fn project(camera: &dyn ViewProjection, world: Vec3) -> Option<Vec2> {
    let p = camera.world_to_screen(world);
    (p.z >= camera.near_clip() && p.x.is_finite() && p.y.is_finite()).then(|| p.truncate())
}

fn rect_meshes(scene: &Scene) -> impl Iterator<Item = (ObjectId, &Mesh)> {
    scene
        .selected_meshes()
        .filter(move |(id, _)| scene.get(*id).is_some_and(|o| o.visible && o.selectable))
}

/// Coincident-vertex representatives inside `rect`.
///
/// Each logical vertex is reported once, as the first index of its
/// coincident group. Containment mode makes no difference for points.
pub fn pick_vertices_in_rect(
    scene: &Scene,
    camera: &dyn ViewProjection,
    rect: &ScreenRect,
    options: &PickerOptions,
) -> RectHits<usize> {
    let mut hits = RectHits::new();
    for (id, mesh) in rect_meshes(scene) {
        let mut picked = Vec::new();
        for group in mesh.shared_vertices() {
            let Some(&vertex) = group.first() else {
                continue;
            };
            let world = mesh.world_position(vertex);
            if !project(camera, world).is_some_and(|p| rect.contains(p)) {
                continue;
            }
            if options.depth_test && scene.is_occluded(camera, world) {
                continue;
            }
            picked.push(vertex);
        }
        if !picked.is_empty() {
            hits.insert(id, picked);
        }
    }
    hits
}

/// Edges inside (or, in partial mode, crossing) `rect`.
///
/// Edges are keyed by [`EdgeLookup`], so an edge shared by two faces, or
/// duplicated across coincident vertices, is reported once. With depth
/// testing an edge counts when its midpoint or one of its endpoints is
/// visible.
pub fn pick_edges_in_rect(
    scene: &Scene,
    camera: &dyn ViewProjection,
    rect: &ScreenRect,
    options: &PickerOptions,
) -> RectHits<EdgeLookup> {
    let mut hits = RectHits::new();
    for (id, mesh) in rect_meshes(scene) {
        let mut seen = HashSet::new();
        let mut picked = Vec::new();
        for face in mesh.faces() {
            for &edge in face.edges() {
                let lookup = mesh.edge_lookup(edge);
                if !seen.insert(lookup) {
                    continue;
                }
                let (wa, wb) = (mesh.world_position(edge.a), mesh.world_position(edge.b));
                let (Some(a), Some(b)) = (project(camera, wa), project(camera, wb)) else {
                    continue;
                };
                let inside = match options.rect_select_mode {
                    RectSelectMode::Complete => rect.contains(a) && rect.contains(b),
                    RectSelectMode::Partial => rect.intersects_segment(a, b),
                };
                if !inside {
                    continue;
                }
                if options.depth_test
                    && [wa.lerp(wb, 0.5), wa, wb]
                        .into_iter()
                        .all(|p| scene.is_occluded(camera, p))
                {
                    continue;
                }
                picked.push(lookup);
            }
        }
        if !picked.is_empty() {
            hits.insert(id, picked);
        }
    }
    hits
}

/// Faces inside (or, in partial mode, overlapping) `rect`.
///
/// A face overlaps the rect when one of its vertices is inside it, a rect
/// corner is inside one of its projected triangles, or one of its edges
/// crosses the rect. With depth testing only faces turned toward the camera
/// whose center or one of whose vertices is visible count.
pub fn pick_faces_in_rect(
    scene: &Scene,
    camera: &dyn ViewProjection,
    rect: &ScreenRect,
    options: &PickerOptions,
) -> RectHits<usize> {
    let mut hits = RectHits::new();
    for (id, mesh) in rect_meshes(scene) {
        let mut picked = Vec::new();
        for (index, face) in mesh.faces().iter().enumerate() {
            let world: Vec<Vec3> = face
                .distinct_indexes()
                .iter()
                .map(|&v| mesh.world_position(v))
                .collect();
            let Some(screen) = world
                .iter()
                .map(|&p| project(camera, p))
                .collect::<Option<Vec<Vec2>>>()
            else {
                continue;
            };

            let inside = match options.rect_select_mode {
                RectSelectMode::Complete => screen.iter().all(|&p| rect.contains(p)),
                RectSelectMode::Partial => face_overlaps_rect(face, &screen, rect),
            };
            if !inside {
                continue;
            }
            if options.depth_test && !face_is_visible(scene, camera, mesh, face, &world) {
                continue;
            }
            picked.push(index);
        }
        if !picked.is_empty() {
            hits.insert(id, picked);
        }
    }
    hits
}

/// `screen` holds the projected distinct vertices of `face`, in order.
fn face_overlaps_rect(face: &Face, screen: &[Vec2], rect: &ScreenRect) -> bool {
    if screen.iter().any(|&p| rect.contains(p)) {
        return true;
    }
    let distinct = face.distinct_indexes();
    let at = |v: usize| distinct.iter().position(|&d| d == v).map(|i| screen[i]);

    let corners = rect.corners();
    for [a, b, c] in face.triangles() {
        let (Some(a), Some(b), Some(c)) = (at(a), at(b), at(c)) else {
            continue;
        };
        if corners.iter().any(|&k| point_in_triangle_2d(k, a, b, c)) {
            return true;
        }
    }
    face.edges().iter().any(|e| match (at(e.a), at(e.b)) {
        (Some(a), Some(b)) => rect.intersects_segment(a, b),
        _ => false,
    })
}

fn face_is_visible(
    scene: &Scene,
    camera: &dyn ViewProjection,
    mesh: &Mesh,
    face: &Face,
    world: &[Vec3],
) -> bool {
    let Some([a, b, c]) = face.triangles().next() else {
        return false;
    };
    let normal = triangle_normal(
        mesh.world_position(a),
        mesh.world_position(b),
        mesh.world_position(c),
    );
    let center = world.iter().copied().sum::<Vec3>() / world.len().max(1) as f32;
    let Some(center_screen) = project(camera, center) else {
        return false;
    };
    if camera.screen_to_ray(center_screen).direction.dot(normal) >= 0.0 {
        return false;
    }
    std::iter::once(center)
        .chain(world.iter().copied())
        .any(|p| !scene.is_occluded(camera, p))
}

/// Combines an existing selection with rect hits.
///
/// Both inputs are treated as sets. The result keeps the existing order for
/// retained elements, followed by newly added hits in hit order.
pub fn combine_selection<T: Copy + Eq + Hash>(
    behavior: SelectionModifierBehavior,
    existing: &[T],
    hits: &[T],
) -> Vec<T> {
    let hit_set: HashSet<T> = hits.iter().copied().collect();
    let existing_set: HashSet<T> = existing.iter().copied().collect();
    let mut out = Vec::new();
    let mut seen = HashSet::new();

    let keep_existing = |e: &T| match behavior {
        SelectionModifierBehavior::Add => true,
        SelectionModifierBehavior::Subtract | SelectionModifierBehavior::Difference => {
            !hit_set.contains(e)
        }
    };
    for e in existing.iter().filter(|e| keep_existing(e)) {
        if seen.insert(*e) {
            out.push(*e);
        }
    }

    if behavior != SelectionModifierBehavior::Subtract {
        for h in hits.iter().filter(|h| !existing_set.contains(h)) {
            if seen.insert(*h) {
                out.push(*h);
            }
        }
    }
    out
}

/// Applies a drag selection over `rect` at the granularity `mode`.
///
/// Without `append` the element selection of every mesh is replaced by the
/// hits; with it the hits are combined per mesh using the preferred
/// [`SelectionModifierBehavior`]. A drag that hits nothing without `append`
/// clears both the element and object selections. Returns whether anything
/// was hit.
pub fn drag_select(
    scene: &mut Scene,
    camera: &dyn ViewProjection,
    rect: &ScreenRect,
    mode: SelectMode,
    prefs: &ScenePickerPreferences,
    append: bool,
) -> Result<bool> {
    let options = prefs.picker_options();
    let behavior = prefs.selection_modifier_behavior;

    if !append {
        scene.clear_element_selection();
    }

    let hit_anything = match mode {
        SelectMode::Vertex => {
            let hits = pick_vertices_in_rect(scene, camera, rect, &options);
            apply_hits(scene, &hits, |mesh, selection, picked| {
                let existing: Vec<usize> = selection
                    .vertices()
                    .iter()
                    .filter_map(|&v| mesh.coincident(v).first().copied())
                    .collect();
                let combined = if append {
                    combine_selection(behavior, &existing, picked)
                } else {
                    picked.to_vec()
                };
                selection.set_vertices(mesh, mesh.coincident_vertices(combined))
            })?
        }
        SelectMode::Edge => {
            let hits = pick_edges_in_rect(scene, camera, rect, &options);
            apply_hits(scene, &hits, |mesh, selection, picked| {
                let existing: Vec<EdgeLookup> =
                    selection.edges().iter().map(|&e| mesh.edge_lookup(e)).collect();
                let combined = if append {
                    combine_selection(behavior, &existing, picked)
                } else {
                    picked.to_vec()
                };
                selection.set_edges(mesh, combined.into_iter().map(|l| l.local))
            })?
        }
        SelectMode::Face => {
            let hits = pick_faces_in_rect(scene, camera, rect, &options);
            apply_hits(scene, &hits, |mesh, selection, picked| {
                let combined = if append {
                    combine_selection(behavior, selection.faces(), picked)
                } else {
                    picked.to_vec()
                };
                selection.set_faces(mesh, combined)
            })?
        }
    };

    if !hit_anything && !append {
        log::debug!("drag selection hit nothing, clearing selection");
        scene.clear_element_and_object_selection();
    }
    Ok(hit_anything)
}

/// Runs `apply` on every selected mesh with its hits (empty when missed).
/// Runs `apply` on every selected mesh with its hits (empty when missed).
fn apply_hits<T>(
    scene: &mut Scene,
    hits: &RectHits<T>,
    mut apply: impl FnMut(&Mesh, &mut MeshSelection, &[T]) -> Result<()>,
) -> Result<bool> {
    let selected = scene.selected().to_vec();
    for id in selected {
        let picked = hits.get(&id).map_or(&[][..], Vec::as_slice);
        if let Some((mesh, selection)) = scene.get_mut(id).and_then(|o| o.mesh_and_selection_mut()) {
            apply(mesh, selection, picked)?;
        }
    }
    let count: usize = hits.values().map(Vec::len).sum();
    log::debug!("drag selection hit {count} elements on {} meshes", hits.len());
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshpick_core::{Camera, CullingMode, Edge, Transform};
    use proptest::prelude::*;

    fn camera() -> Camera {
        Camera::new(Vec2::new(800.0, 600.0)).looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO)
    }

    fn selected_cube() -> (Scene, ObjectId) {
        let mut scene = Scene::new();
        let id = scene.add_mesh("cube", Mesh::cube(2.0));
        scene.add_to_selection(id).unwrap();
        (scene, id)
    }

    fn full_screen() -> ScreenRect {
        ScreenRect::from_corners(Vec2::ZERO, Vec2::new(800.0, 600.0))
    }

    fn options(depth_test: bool, mode: RectSelectMode) -> PickerOptions {
        PickerOptions {
            depth_test,
            rect_select_mode: mode,
        }
    }

    #[test]
    fn test_vertices_respect_depth_test() {
        let (scene, id) = selected_cube();
        let cam = camera();
        let visible = pick_vertices_in_rect(&scene, &cam, &full_screen(), &options(true, RectSelectMode::Partial));
        assert_eq!(visible[&id].len(), 4);
        let all = pick_vertices_in_rect(&scene, &cam, &full_screen(), &options(false, RectSelectMode::Partial));
        assert_eq!(all[&id].len(), 8);
    }

    #[test]
    fn test_edges_deduplicated_by_lookup() {
        let (scene, id) = selected_cube();
        let cam = camera();
        let all = pick_edges_in_rect(&scene, &cam, &full_screen(), &options(false, RectSelectMode::Complete));
        assert_eq!(all[&id].len(), 12);
        let visible = pick_edges_in_rect(&scene, &cam, &full_screen(), &options(true, RectSelectMode::Complete));
        assert_eq!(visible[&id].len(), 8);
    }

    #[test]
    fn test_partial_face_rect_inside_face() {
        let (scene, id) = selected_cube();
        let cam = camera();
        let rect = ScreenRect::from_corners(Vec2::new(390.0, 290.0), Vec2::new(410.0, 310.0));
        let hits = pick_faces_in_rect(&scene, &cam, &rect, &options(true, RectSelectMode::Partial));
        assert_eq!(hits[&id], vec![4]);
        // The back face projects under the rect too
        let through = pick_faces_in_rect(&scene, &cam, &rect, &options(false, RectSelectMode::Partial));
        assert_eq!(through[&id], vec![4, 5]);
        let complete = pick_faces_in_rect(&scene, &cam, &rect, &options(false, RectSelectMode::Complete));
        assert!(complete.is_empty());
    }

    #[test]
    fn test_complete_faces_depth_tested() {
        let (scene, id) = selected_cube();
        let cam = camera();
        let all = pick_faces_in_rect(&scene, &cam, &full_screen(), &options(false, RectSelectMode::Complete));
        assert_eq!(all[&id].len(), 6);
        let front = pick_faces_in_rect(&scene, &cam, &full_screen(), &options(true, RectSelectMode::Complete));
        assert_eq!(front[&id], vec![4]);
    }

    #[test]
    fn test_unselected_meshes_ignored() {
        let mut scene = Scene::new();
        scene.add_mesh("cube", Mesh::cube(2.0));
        let hits = pick_faces_in_rect(&scene, &camera(), &full_screen(), &PickerOptions::default());
        assert!(hits.is_empty());
    }

    #[test]
    fn test_drag_over_empty_space_clears_everything() {
        let (mut scene, id) = selected_cube();
        scene
            .get_mut(id)
            .and_then(|o| o.mesh_and_selection_mut())
            .map(|(mesh, sel)| sel.set_faces(mesh, [0, 1]))
            .unwrap()
            .unwrap();
        let rect = ScreenRect::from_corners(Vec2::new(0.0, 0.0), Vec2::new(20.0, 20.0));
        let hit = drag_select(
            &mut scene,
            &camera(),
            &rect,
            SelectMode::Face,
            &ScenePickerPreferences::default(),
            false,
        )
        .unwrap();
        assert!(!hit);
        assert!(scene.selected().is_empty());
        assert!(scene.get(id).unwrap().selection().is_empty());
    }

    #[test]
    fn test_drag_append_difference_toggles_faces() {
        let (mut scene, id) = selected_cube();
        let prefs = ScenePickerPreferences::default();
        let rect = ScreenRect::from_corners(Vec2::new(390.0, 290.0), Vec2::new(410.0, 310.0));
        let cam = camera();

        scene
            .get_mut(id)
            .and_then(|o| o.mesh_and_selection_mut())
            .map(|(mesh, sel)| sel.set_faces(mesh, [0]))
            .unwrap()
            .unwrap();
        assert!(drag_select(&mut scene, &cam, &rect, SelectMode::Face, &prefs, true).unwrap());
        assert_eq!(scene.get(id).unwrap().selection().faces(), &[0, 4]);
        drag_select(&mut scene, &cam, &rect, SelectMode::Face, &prefs, true).unwrap();
        assert_eq!(scene.get(id).unwrap().selection().faces(), &[0]);
    }

    #[test]
    fn test_drag_vertices_expand_to_coincident_groups() {
        let (mut scene, id) = selected_cube();
        let prefs = ScenePickerPreferences::default().with_cull_mode(CullingMode::Back);
        drag_select(&mut scene, &camera(), &full_screen(), SelectMode::Vertex, &prefs, false).unwrap();
        // Four visible corners, three coincident copies each
        assert_eq!(scene.get(id).unwrap().selection().vertices().len(), 12);
    }

    #[test]
    fn test_drag_edges_by_lookup() {
        let mut scene = Scene::new();
        let id = scene.add_mesh(
            "cube",
            Mesh::cube(2.0).with_transform(Transform::from_translation(Vec3::new(0.0, 0.0, -1.0))),
        );
        scene.add_to_selection(id).unwrap();
        let prefs = ScenePickerPreferences::default().with_cull_mode(CullingMode::None);
        drag_select(&mut scene, &camera(), &full_screen(), SelectMode::Edge, &prefs, false).unwrap();
        let edges: Vec<Edge> = scene.get(id).unwrap().selection().edges().to_vec();
        assert_eq!(edges.len(), 12);
    }

    #[test]
    fn test_drag_over_dense_grid() {
        let mut scene = Scene::new();
        let id = scene.add_mesh("grid", meshpick_core::shapes::plane(6.0, 6.0, 120, 120));
        scene.add_to_selection(id).unwrap();
        let cam = camera();
        let prefs = ScenePickerPreferences::default().with_cull_mode(CullingMode::None);

        drag_select(&mut scene, &cam, &full_screen(), SelectMode::Vertex, &prefs, false).unwrap();
        let vertices = scene.get(id).unwrap().selection().vertices().to_vec();
        assert_eq!(vertices.len(), 121 * 121);
        assert_eq!(vertices.iter().copied().collect::<HashSet<_>>().len(), vertices.len());

        drag_select(&mut scene, &cam, &full_screen(), SelectMode::Edge, &prefs, false).unwrap();
        assert_eq!(scene.get(id).unwrap().selection().edges().len(), 2 * 120 * 121);

        // Appending the same hits again removes all of them
        drag_select(&mut scene, &cam, &full_screen(), SelectMode::Edge, &prefs, true).unwrap();
        assert!(scene.get(id).unwrap().selection().edges().is_empty());
    }

    fn as_set(v: &[u8]) -> HashSet<u8> {
        v.iter().copied().collect()
    }

    proptest! {
        #[test]
        fn prop_combination_laws(
            existing in proptest::collection::vec(0u8..32, 0..16),
            hits in proptest::collection::vec(0u8..32, 0..16),
        ) {
            let s = as_set(&existing);
            let h = as_set(&hits);

            let add = combine_selection(SelectionModifierBehavior::Add, &existing, &hits);
            prop_assert_eq!(as_set(&add), &s | &h);
            prop_assert_eq!(add.len(), as_set(&add).len());

            let sub = combine_selection(SelectionModifierBehavior::Subtract, &existing, &hits);
            prop_assert_eq!(as_set(&sub), &s - &h);

            let diff = combine_selection(SelectionModifierBehavior::Difference, &existing, &hits);
            prop_assert_eq!(as_set(&diff), &s ^ &h);

            let add_twice = combine_selection(SelectionModifierBehavior::Add, &add, &hits);
            prop_assert_eq!(as_set(&add_twice), as_set(&add));
            let sub_twice = combine_selection(SelectionModifierBehavior::Subtract, &sub, &hits);
            prop_assert_eq!(as_set(&sub_twice), as_set(&sub));
        }
    }
}
