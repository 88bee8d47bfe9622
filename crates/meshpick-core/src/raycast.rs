//! Ray queries against meshes.
//!
//! Rays are given in world space and tested in the mesh's local space. The
//! local ray direction is not renormalized, so hit distances are measured
//! in world-ray parameters.

use std::collections::HashSet;

use glam::Vec3;

use crate::camera::ViewProjection;
use crate::math::{ray_intersects_triangle, triangle_normal, Ray};
use crate::mesh::Mesh;
use crate::options::CullingMode;

/// Relative slack used when comparing a hit distance to a point's distance.
const OCCLUSION_BIAS: f32 = 1e-4;

/// The nearest intersection of a ray with a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Ray parameter of the hit.
    pub distance: f32,
    /// Hit point in mesh-local space.
    pub point: Vec3,
    /// Unit winding normal of the hit triangle, mesh-local.
    pub normal: Vec3,
    /// Index of the face that was hit.
    pub face: usize,
    /// Barycentric weight of the triangle's second vertex.
    pub u: f32,
    /// Barycentric weight of the triangle's third vertex.
    pub v: f32,
}

impl RaycastHit {
    /// The hit point in world space.
    #[must_use]
    pub fn world_point(&self, mesh: &Mesh) -> Vec3 {
        mesh.transform().transform_point(self.point)
    }
}

/// Nearest hits for each facing, as produced by
/// [`raycast_face_both_cull_modes`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DualCullHit {
    /// Nearest hit on a triangle facing the ray origin.
    pub front_facing: Option<RaycastHit>,
    /// Nearest hit on a triangle facing away from the ray origin.
    pub back_facing: Option<RaycastHit>,
}

/// Casts a world-space ray against every face of `mesh`.
///
/// Returns the nearest hit. On exact ties the first face (and first
/// triangle within it) wins.
#[must_use]
pub fn raycast_face(ray: &Ray, mesh: &Mesh, cull: CullingMode) -> Option<RaycastHit> {
    raycast_face_ignoring(ray, mesh, cull, &HashSet::new())
}

/// Like [`raycast_face`], skipping the faces in `ignore`.
#[must_use]
pub fn raycast_face_ignoring(
    ray: &Ray,
    mesh: &Mesh,
    cull: CullingMode,
    ignore: &HashSet<usize>,
) -> Option<RaycastHit> {
    let local = ray.to_local(mesh.transform());
    let positions = mesh.positions();
    let mut best: Option<RaycastHit> = None;

    for (face_index, face) in mesh.faces().iter().enumerate() {
        if ignore.contains(&face_index) {
            continue;
        }
        for [a, b, c] in face.triangles() {
            let (pa, pb, pc) = (positions[a], positions[b], positions[c]);
            let normal = triangle_normal(pa, pb, pc);
            let facing = local.direction.dot(normal);
            let culled = match cull {
                CullingMode::None => false,
                CullingMode::Back => facing >= 0.0,
                CullingMode::Front => facing <= 0.0,
            };
            if culled {
                continue;
            }

            let Some(hit) = ray_intersects_triangle(&local, pa, pb, pc) else {
                continue;
            };
            if best.is_some_and(|b| hit.distance >= b.distance) {
                continue;
            }
            best = Some(RaycastHit {
                distance: hit.distance,
                point: local.at(hit.distance),
                normal: normal.normalize_or_zero(),
                face: face_index,
                u: hit.u,
                v: hit.v,
            });
        }
    }

    best
}

/// Casts a ray once per facing, keeping the nearest front and back hit.
#[must_use]
pub fn raycast_face_both_cull_modes(ray: &Ray, mesh: &Mesh) -> DualCullHit {
    DualCullHit {
        front_facing: raycast_face(ray, mesh, CullingMode::Back),
        back_facing: raycast_face(ray, mesh, CullingMode::Front),
    }
}

/// Whether a world point is hidden from `camera` by any of `meshes`.
///
/// A ray is cast from the camera through the point's screen position; the
/// point is occluded if some front-facing triangle is hit clearly before it.
/// Points that do not project (behind the camera, degenerate viewport) are
/// never occluded.
pub fn point_is_occluded<'a>(
    camera: &dyn ViewProjection,
    meshes: impl IntoIterator<Item = &'a Mesh>,
    point: Vec3,
) -> bool {
    let screen = camera.world_to_screen(point);
    if !screen.x.is_finite() || !screen.y.is_finite() || screen.z <= 0.0 {
        return false;
    }

    let ray = camera.screen_to_ray(screen.truncate());
    let target = (point - ray.origin).dot(ray.direction);
    let limit = target - OCCLUSION_BIAS * target.max(1.0);

    meshes.into_iter().any(|mesh| {
        raycast_face(&ray, mesh, CullingMode::Back).is_some_and(|hit| hit.distance < limit)
    })
}
