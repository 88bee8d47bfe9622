use glam::{Vec2, Vec3};
use meshpick_core::{
    Mesh, ObjectId, PickedElement, Scene, SceneSelection, ScenePickerPreferences, ViewProjection,
};

use super::{PickQuery, PickResult};

/// A candidate vertex gathered during the nearest-vertex search.
#[derive(Debug, Clone, Copy)]
struct VertexPickerEntry {
    object: ObjectId,
    vertex: usize,
    /// Squared screen distance to the pointer.
    screen_distance: f32,
    /// Candidates from an unselected mesh rank after every selected-mesh
    /// candidate within range.
    penalized: bool,
    world_position: Vec3,
}

impl VertexPickerEntry {
    fn rank(&self, max_distance_sq: f32) -> f32 {
        if self.penalized {
            self.screen_distance + max_distance_sq
        } else {
            self.screen_distance
        }
    }
}

/// Picks the nearest visible vertex to the pointer.
///
/// Candidates are one representative per coincident-vertex group of every
/// selected mesh, plus the hovered mesh when `allow_unselected` is set and
/// it is not already selected. Candidates farther than the pointer distance
/// (clamped into range) are dropped. The nearest one not occluded by scene
/// geometry wins.
pub fn pick_vertex(
    scene: &Scene,
    camera: &dyn ViewProjection,
    prefs: &ScenePickerPreferences,
    query: &PickQuery,
) -> PickResult {
    let hovered = scene.hovered(camera, query.point, prefs.cull_mode);
    let max_distance_sq = prefs.clamped().max_pointer_distance_squared();
    let mut entries = Vec::new();

    if query.allow_unselected {
        if let Some(id) = hovered.filter(|&id| !scene.is_selected(id)) {
            if let Some(mesh) = scene.get(id).and_then(|o| o.mesh()) {
                nearest_vertices(id, mesh, camera, query.point, max_distance_sq, true, &mut entries);
            }
        }
    }

    for (id, mesh) in scene.selected_meshes() {
        if scene.get(id).is_some_and(|o| o.selectable) {
            nearest_vertices(id, mesh, camera, query.point, max_distance_sq, false, &mut entries);
        }
    }

    // Stable, so equal distances keep gathering order
    entries.sort_by(|a, b| a.rank(max_distance_sq).total_cmp(&b.rank(max_distance_sq)));

    for entry in &entries {
        if scene.is_occluded(camera, entry.world_position) {
            log::trace!("vertex {} of {} is occluded", entry.vertex, entry.object);
            continue;
        }
        return PickResult {
            selection: SceneSelection::element(entry.object, PickedElement::Vertex(entry.vertex)),
            distance: entry.screen_distance.sqrt(),
        };
    }

    PickResult::object_only(hovered)
}

/// Appends the in-range coincident-vertex representatives of `mesh`.
fn nearest_vertices(
    object: ObjectId,
    mesh: &Mesh,
    camera: &dyn ViewProjection,
    point: Vec2,
    max_distance_sq: f32,
    penalized: bool,
    out: &mut Vec<VertexPickerEntry>,
) {
    for group in mesh.shared_vertices() {
        let Some(&vertex) = group.first() else {
            continue;
        };
        let world_position = mesh.world_position(vertex);
        let screen = camera.world_to_screen(world_position);
        if screen.z <= 0.0 {
            continue;
        }
        let screen_distance = screen.truncate().distance_squared(point);
        if screen_distance < max_distance_sq {
            out.push(VertexPickerEntry {
                object,
                vertex,
                screen_distance,
                penalized,
                world_position,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshpick_core::{Camera, Transform};

    fn camera() -> Camera {
        Camera::new(Vec2::new(800.0, 600.0)).looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO)
    }

    #[test]
    fn test_picks_nearest_front_corner() {
        let mut scene = Scene::new();
        let id = scene.add_mesh("cube", Mesh::cube(2.0));
        let cam = camera();
        let corner = cam.world_to_screen(Vec3::new(1.0, 1.0, 1.0)).truncate();
        let r = pick_vertex(
            &scene,
            &cam,
            &ScenePickerPreferences::default(),
            &PickQuery::click(corner + Vec2::new(-2.0, 1.0)),
        );
        assert_eq!(r.selection.mesh, Some(id));
        let v = r.selection.vertex().unwrap();
        let p = scene.mesh(id).unwrap().positions()[v];
        assert_eq!(p, Vec3::new(1.0, 1.0, 1.0));
        assert!((r.distance - 5.0_f32.sqrt()).abs() < 1e-2);
    }

    #[test]
    fn test_unselected_mesh_needs_allow_unselected() {
        let mut scene = Scene::new();
        scene.add_mesh("cube", Mesh::cube(2.0));
        let cam = camera();
        let corner = cam.world_to_screen(Vec3::new(1.0, 1.0, 1.0)).truncate();
        let r = pick_vertex(
            &scene,
            &cam,
            &ScenePickerPreferences::default(),
            &PickQuery::click(corner).with_allow_unselected(false),
        );
        assert!(r.selection.is_empty());
        assert!(r.distance.is_infinite());
    }

    #[test]
    fn test_selected_mesh_preferred_over_hovered() {
        let mut scene = Scene::new();
        let near = scene.add_mesh("near", Mesh::cube(2.0));
        let far = scene.add_mesh(
            "far",
            Mesh::cube(2.0).with_transform(Transform::from_translation(Vec3::new(0.6, 0.0, -4.0))),
        );
        scene.add_to_selection(far).unwrap();

        let cam = camera();
        let prefs = ScenePickerPreferences::default();
        let corner = cam.world_to_screen(Vec3::new(1.0, 1.0, 1.0)).truncate();
        let r = pick_vertex(&scene, &cam, &prefs, &PickQuery::click(corner));
        // The hovered cube's corner is right under the pointer, but a
        // selected mesh has an unoccluded vertex in range
        assert_eq!(r.selection.mesh, Some(far));
        assert_ne!(r.selection.mesh, Some(near));
    }

    #[test]
    fn test_exact_tie_goes_to_selected_mesh() {
        let mut scene = Scene::new();
        // Identical cubes: every candidate distance ties exactly, and the
        // first one added is the hovered one
        let hovered = scene.add_mesh("hovered", Mesh::cube(2.0));
        let selected = scene.add_mesh("selected", Mesh::cube(2.0));
        scene.add_to_selection(selected).unwrap();

        let cam = camera();
        let prefs = ScenePickerPreferences::default();
        let point = cam.world_to_screen(Vec3::new(1.0, 1.0, 1.0)).truncate() + Vec2::new(-2.0, 1.0);
        assert_eq!(scene.hovered(&cam, point, prefs.cull_mode), Some(hovered));

        let r = pick_vertex(&scene, &cam, &prefs, &PickQuery::click(point));
        assert_eq!(r.selection.mesh, Some(selected));
        assert!((r.distance - 5.0_f32.sqrt()).abs() < 1e-2);
    }

    #[test]
    fn test_penalty_ranks_after_every_in_range_candidate() {
        let entry = |penalized, screen_distance| VertexPickerEntry {
            object: ObjectId(0),
            vertex: 0,
            screen_distance,
            penalized,
            world_position: Vec3::ZERO,
        };
        let max_sq = 100.0;
        assert!(entry(true, 0.0).rank(max_sq) > entry(false, 99.0).rank(max_sq));
        assert_eq!(entry(true, 4.0).rank(max_sq), 104.0);
        assert_eq!(entry(false, 4.0).rank(max_sq), 4.0);
    }
}
