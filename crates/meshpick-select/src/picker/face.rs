use meshpick_core::{
    raycast_face, PickedElement, Scene, SceneSelection, ScenePickerPreferences, ViewProjection,
};

use super::{DeepClickKey, PickQuery, PickResult, PickerSession};

impl PickerSession {
    /// Picks the face under the pointer.
    ///
    /// Click queries consider every object stacked under the pointer. If the
    /// candidate returned by the previous click is in the stack, the one
    /// after it is returned instead, wrapping around, so repeated clicks on
    /// the same spot walk through the whole stack. Hover queries, and clicks
    /// with modifiers held, only look at the topmost object and never
    /// advance the cursor.
    ///
    /// Objects without a mesh (or meshes excluded by `allow_unselected`) are
    /// returned as object-only results with an infinite distance.
    pub fn pick_face(
        &mut self,
        scene: &Scene,
        camera: &dyn ViewProjection,
        prefs: &ScenePickerPreferences,
        query: &PickQuery,
    ) -> PickResult {
        let candidates = if query.preview || query.modifiers_held {
            scene
                .hovered(camera, query.point, prefs.cull_mode)
                .into_iter()
                .collect()
        } else {
            scene.all_overlapping(camera, query.point, prefs.cull_mode)
        };

        let ray = camera.screen_to_ray(query.point);
        let count = candidates.len();
        let mut picked: Option<(DeepClickKey, f32)> = None;
        let mut next = 0;

        for (i, &id) in candidates.iter().enumerate() {
            let mut face = None;
            let mut distance = f32::INFINITY;

            let mesh = scene.get(id).and_then(|o| o.mesh());
            if let Some(mesh) = mesh {
                if query.allow_unselected || scene.is_selected(id) {
                    if let Some(hit) = raycast_face(&ray, mesh, prefs.cull_mode) {
                        face = Some(hit.face);
                        let screen = camera.world_to_screen(hit.world_point(mesh));
                        distance = screen.truncate().distance(query.point);
                    }
                }
            }

            let key = DeepClickKey { object: id, face };
            if self.previous == Some(key) {
                next = (i + query.deep_click_step()) % count;
            }

            if next == i {
                picked = Some((key, distance));
                // Keep scanning on the first candidate in case a later one
                // matches the previous click.
                if next != 0 {
                    break;
                }
            }
        }

        if !query.preview {
            self.previous = picked.map(|(key, _)| key);
        }

        match picked {
            Some((key, distance)) => match key.face {
                Some(face) => {
                    log::trace!("face {face} of {} at {distance:.2}px", key.object);
                    PickResult {
                        selection: SceneSelection::element(key.object, PickedElement::Face(face)),
                        distance,
                    }
                }
                None => PickResult::object_only(Some(key.object)),
            },
            None => PickResult::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshpick_core::{Camera, CullingMode, Mesh, ObjectId, Transform};
    use glam::{Vec2, Vec3};

    fn camera() -> Camera {
        Camera::new(Vec2::new(800.0, 600.0)).looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO)
    }

    fn stacked(n: usize) -> (Scene, Vec<ObjectId>) {
        let mut scene = Scene::new();
        let ids = (0..n)
            .map(|i| {
                let mesh = Mesh::cube(1.0).with_transform(Transform::from_translation(Vec3::new(
                    0.0,
                    0.0,
                    -2.0 * i as f32,
                )));
                scene.add_mesh(&format!("cube{i}"), mesh)
            })
            .collect();
        (scene, ids)
    }

    const POINT: Vec2 = Vec2::new(412.0, 291.0);

    #[test]
    fn test_pick_front_face() {
        let (scene, ids) = stacked(1);
        let mut session = PickerSession::new();
        let r = session.pick_face(
            &scene,
            &camera(),
            &ScenePickerPreferences::default(),
            &PickQuery::click(POINT),
        );
        assert_eq!(r.selection.object, Some(ids[0]));
        assert_eq!(r.selection.face(), Some(4));
        assert!(r.distance < 0.5);
    }

    #[test]
    fn test_click_cycles_through_stack() {
        let (scene, ids) = stacked(3);
        let cam = camera();
        let prefs = ScenePickerPreferences::default();
        let mut session = PickerSession::new();

        let picked: Vec<_> = (0..6)
            .map(|_| {
                session
                    .pick_face(&scene, &cam, &prefs, &PickQuery::click(POINT))
                    .selection
                    .object
                    .unwrap()
            })
            .collect();
        assert_eq!(picked, vec![ids[0], ids[1], ids[2], ids[0], ids[1], ids[2]]);
    }

    #[test]
    fn test_double_click_keeps_candidate() {
        let (scene, ids) = stacked(3);
        let cam = camera();
        let prefs = ScenePickerPreferences::default();
        let mut session = PickerSession::new();

        session.pick_face(&scene, &cam, &prefs, &PickQuery::click(POINT));
        let second = session.pick_face(&scene, &cam, &prefs, &PickQuery::click(POINT));
        assert_eq!(second.selection.object, Some(ids[1]));
        let double = session.pick_face(
            &scene,
            &cam,
            &prefs,
            &PickQuery::click(POINT).with_double_click(true),
        );
        assert_eq!(double.selection.object, Some(ids[1]));
    }

    #[test]
    fn test_hover_does_not_advance() {
        let (scene, ids) = stacked(2);
        let cam = camera();
        let prefs = ScenePickerPreferences::default();
        let mut session = PickerSession::new();

        session.pick_face(&scene, &cam, &prefs, &PickQuery::click(POINT));
        for _ in 0..3 {
            let hover = session.pick_face(&scene, &cam, &prefs, &PickQuery::hover(POINT));
            assert_eq!(hover.selection.object, Some(ids[0]));
        }
        let click = session.pick_face(&scene, &cam, &prefs, &PickQuery::click(POINT));
        assert_eq!(click.selection.object, Some(ids[1]));
    }

    #[test]
    fn test_modifiers_disable_cycling() {
        let (scene, ids) = stacked(2);
        let cam = camera();
        let prefs = ScenePickerPreferences::default();
        let mut session = PickerSession::new();
        let query = PickQuery::click(POINT).with_modifiers_held(true);
        for _ in 0..3 {
            let r = session.pick_face(&scene, &cam, &prefs, &query);
            assert_eq!(r.selection.object, Some(ids[0]));
        }
    }

    #[test]
    fn test_unselected_mesh_is_object_only_when_disallowed() {
        let (scene, ids) = stacked(1);
        let mut session = PickerSession::new();
        let r = session.pick_face(
            &scene,
            &camera(),
            &ScenePickerPreferences::default(),
            &PickQuery::click(POINT).with_allow_unselected(false),
        );
        assert_eq!(r.selection.object, Some(ids[0]));
        assert!(r.selection.is_empty());
        assert!(r.distance.is_infinite());
    }

    #[test]
    fn test_empty_space_resets_cursor() {
        let (scene, ids) = stacked(2);
        let cam = camera();
        let prefs = ScenePickerPreferences::default().with_cull_mode(CullingMode::Back);
        let mut session = PickerSession::new();

        session.pick_face(&scene, &cam, &prefs, &PickQuery::click(POINT));
        let miss = session.pick_face(&scene, &cam, &prefs, &PickQuery::click(Vec2::new(5.0, 5.0)));
        assert!(miss.selection.object.is_none());
        assert!(miss.distance.is_infinite());
        let again = session.pick_face(&scene, &cam, &prefs, &PickQuery::click(POINT));
        assert_eq!(again.selection.object, Some(ids[0]));
    }
}
