use glam::{Vec2, Vec3};
use meshpick_core::math::{distance_point_segment, distance_point_segment_2d};
use meshpick_core::{
    raycast_face_both_cull_modes, Edge, Mesh, ObjectId, PickedElement, RaycastHit, Scene,
    SceneSelection, ScenePickerPreferences, ViewProjection,
};

use super::{PickQuery, PickResult};

/// Picks the edge nearest the pointer.
///
/// The hovered mesh contributes the edge of the face under the pointer that
/// lies closest to the hit point. If that mesh is selected the edge is
/// returned straight away; otherwise it is kept as a fallback and every face
/// edge of every selected mesh is scanned, the nearest one in screen space
/// within the pointer distance winning. The pointer distance is clamped
/// first, as [`ScenePickerPreferences::clamped`] does.
pub fn pick_edge(
    scene: &Scene,
    camera: &dyn ViewProjection,
    prefs: &ScenePickerPreferences,
    query: &PickQuery,
) -> PickResult {
    let hovered = scene.hovered(camera, query.point, prefs.cull_mode);
    let max_distance = prefs.clamped().max_pointer_distance;
    let mut fallback = None;

    if let Some(id) = hovered {
        let in_selection = scene.is_selected(id);
        let mesh = scene.get(id).and_then(|o| o.mesh());
        if let Some(mesh) = mesh.filter(|_| query.allow_unselected || in_selection) {
            if let Some((edge, distance)) = nearest_edge_on_mesh(mesh, camera, query.point) {
                if distance < max_distance {
                    let result = PickResult {
                        selection: SceneSelection::element(id, PickedElement::Edge(edge)),
                        distance,
                    };
                    if in_selection {
                        return result;
                    }
                    fallback = Some(result);
                }
            }
        }
    }

    let mut best: Option<(ObjectId, Edge)> = None;
    let mut best_distance = max_distance;
    for (id, mesh) in scene.selected_meshes() {
        if !scene.get(id).is_some_and(|o| o.selectable) {
            continue;
        }
        for face in mesh.faces() {
            for &edge in face.edges() {
                let Some(d) = screen_distance_to_edge(mesh, edge, camera, query.point) else {
                    continue;
                };
                if d < best_distance {
                    best = Some((id, edge));
                    best_distance = d;
                }
            }
        }
    }

    if let Some((id, edge)) = best {
        return PickResult {
            selection: SceneSelection::element(id, PickedElement::Edge(edge)),
            distance: best_distance,
        };
    }

    fallback.unwrap_or_else(|| PickResult::object_only(hovered))
}

/// The edge of `mesh` nearest the surface point under the pointer, with its
/// screen distance.
///
/// Both facings are raycast. Edges of the front-facing hit are always
/// considered; edges of the back-facing hit only when it is nearer the
/// camera, which happens on open or single-sided geometry seen from behind.
fn nearest_edge_on_mesh(
    mesh: &Mesh,
    camera: &dyn ViewProjection,
    point: Vec2,
) -> Option<(Edge, f32)> {
    let ray = camera.screen_to_ray(point);
    let dual = raycast_face_both_cull_modes(&ray, mesh);
    let mut nearest: Option<(Edge, f32)> = None;

    if let Some(front) = dual.front_facing {
        nearest_face_edge(mesh, &front, &mut nearest);
    }
    if let Some(back) = dual.back_facing {
        if dual.front_facing.map_or(true, |front| back.distance < front.distance) {
            nearest_face_edge(mesh, &back, &mut nearest);
        }
    }

    let (edge, _) = nearest?;
    let distance = screen_distance_to_edge(mesh, edge, camera, point)?;
    Some((edge, distance))
}

/// Updates `nearest` with the hit face's edge closest to the hit point,
/// measured in mesh-local space.
fn nearest_face_edge(mesh: &Mesh, hit: &RaycastHit, nearest: &mut Option<(Edge, f32)>) {
    let Some(face) = mesh.faces().get(hit.face) else {
        return;
    };
    let positions = mesh.positions();
    for &edge in face.edges() {
        let d = distance_point_segment(hit.point, positions[edge.a], positions[edge.b]);
        if nearest.map_or(true, |(_, best)| d < best) {
            *nearest = Some((edge, d));
        }
    }
}

/// Screen distance between `point` and the projection of `edge`, or `None`
/// when an endpoint is behind the camera.
fn screen_distance_to_edge(
    mesh: &Mesh,
    edge: Edge,
    camera: &dyn ViewProjection,
    point: Vec2,
) -> Option<f32> {
    let project = |index: usize| -> Option<Vec2> {
        let p: Vec3 = camera.world_to_screen(mesh.world_position(index));
        (p.z > 0.0 && p.x.is_finite() && p.y.is_finite()).then(|| p.truncate())
    };
    let a = project(edge.a)?;
    let b = project(edge.b)?;
    Some(distance_point_segment_2d(point, a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshpick_core::{Camera, Transform};

    fn camera() -> Camera {
        Camera::new(Vec2::new(800.0, 600.0)).looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO)
    }

    fn top_edge_pointer(cam: &Camera) -> Vec2 {
        // Just below the middle of the cube's front top edge
        cam.world_to_screen(Vec3::new(0.1, 0.9, 1.0)).truncate()
    }

    #[test]
    fn test_hovered_edge_picked() {
        let mut scene = Scene::new();
        let id = scene.add_mesh("cube", Mesh::cube(2.0));
        let cam = camera();
        let r = pick_edge(
            &scene,
            &cam,
            &ScenePickerPreferences::default(),
            &PickQuery::click(top_edge_pointer(&cam)),
        );
        assert_eq!(r.selection.mesh, Some(id));
        let edge = r.selection.edge().unwrap();
        let mesh = scene.mesh(id).unwrap();
        let (a, b) = (mesh.positions()[edge.a], mesh.positions()[edge.b]);
        assert!((a.y - 1.0).abs() < 1e-6 && (b.y - 1.0).abs() < 1e-6);
        assert!((a.z - 1.0).abs() < 1e-6 && (b.z - 1.0).abs() < 1e-6);
        assert!(r.distance > 0.0 && r.distance < 20.0);
    }

    #[test]
    fn test_far_pointer_returns_infinity() {
        let mut scene = Scene::new();
        let id = scene.add_mesh("cube", Mesh::cube(2.0));
        scene.add_to_selection(id).unwrap();
        let cam = camera();
        let r = pick_edge(
            &scene,
            &cam,
            &ScenePickerPreferences::precise(),
            &PickQuery::click(Vec2::new(5.0, 5.0)),
        );
        assert!(r.selection.is_empty());
        assert!(r.distance.is_infinite());
    }

    #[test]
    fn test_selected_mesh_beats_hovered_fallback() {
        let mut scene = Scene::new();
        scene.add_mesh("hovered", Mesh::cube(2.0));
        let selected = scene.add_mesh(
            "selected",
            Mesh::cube(2.0).with_transform(Transform::from_translation(Vec3::new(3.0, 0.0, 0.0))),
        );
        scene.add_to_selection(selected).unwrap();
        let cam = camera();
        // Pointer on the hovered cube, near its right edge, within range of
        // the selected cube's left edge
        let point = cam.world_to_screen(Vec3::new(0.95, 0.0, 1.0)).truncate();
        let r = pick_edge(&scene, &cam, &ScenePickerPreferences::default(), &PickQuery::click(point));
        assert_eq!(r.selection.mesh, Some(selected));
    }

    #[test]
    fn test_back_facing_edges_used_from_inside() {
        // A single quad facing away from the camera
        let mesh = Mesh::plane(2.0, 2.0).with_transform(Transform::from_rotation(
            glam::Quat::from_rotation_y(std::f32::consts::PI),
        ));
        let cam = camera();
        let point = cam.world_to_screen(Vec3::new(0.0, 0.9, 0.0)).truncate();
        let (edge, _) = nearest_edge_on_mesh(&mesh, &cam, point).unwrap();
        let (a, b) = (mesh.positions()[edge.a], mesh.positions()[edge.b]);
        assert!((a.y - 1.0).abs() < 1e-6 && (b.y - 1.0).abs() < 1e-6);
    }
}
