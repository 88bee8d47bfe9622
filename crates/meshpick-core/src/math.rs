//! Geometry math utilities: rays, segments, bounds and screen rects.
//!
//! Everything here is a pure function of its inputs.

use glam::{Mat3, Quat, Vec2, Vec3};

use crate::transform::Transform;

/// Sine of the ray/plane angle below which a ray is treated as parallel to a
/// triangle.
const PARALLEL_EPSILON: f32 = 1e-7;

/// Squared sine of the corner angle below which a triangle is treated as
/// degenerate. Relative to edge lengths, so scale does not matter.
const DEGENERATE_EPSILON: f32 = 1e-12;

/// A half-line with an origin and a (not necessarily unit) direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin.
    pub origin: Vec3,
    /// Ray direction.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Returns the point at parameter `t`.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Expresses a world-space ray in the local space of `transform`.
    ///
    /// The direction is transformed but not renormalized, so parameters
    /// along the local ray match parameters along the world ray.
    #[must_use]
    pub fn to_local(&self, transform: &Transform) -> Self {
        let inverse = transform.inverse_matrix();
        Self {
            origin: inverse.transform_point3(self.origin),
            direction: inverse.transform_vector3(self.direction),
        }
    }
}

/// Intersection of a ray with a single triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Ray parameter of the hit.
    pub distance: f32,
    /// Barycentric weight of the second vertex.
    pub u: f32,
    /// Barycentric weight of the third vertex.
    pub v: f32,
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns `None` for degenerate triangles, rays parallel to the triangle
/// plane, and hits at or behind the ray origin.
#[must_use]
pub fn ray_intersects_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<TriangleHit> {
    let edge1 = b - a;
    let edge2 = c - a;
    let (len1, len2) = (edge1.length(), edge2.length());
    let cross = edge1.cross(edge2);
    if cross.length_squared() <= DEGENERATE_EPSILON * (len1 * len2).powi(2) {
        return None;
    }

    let h = ray.direction.cross(edge2);
    let det = edge1.dot(h);
    if det.abs() <= PARALLEL_EPSILON * cross.length() * ray.direction.length() {
        return None;
    }

    let f = 1.0 / det;
    let s = ray.origin - a;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > f32::EPSILON).then_some(TriangleHit { distance: t, u, v })
}

/// Winding normal of a triangle (not normalized).
#[must_use]
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a)
}

/// Closest point to `point` on the segment `a`-`b`.
#[must_use]
pub fn closest_point_on_segment(point: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Distance from `point` to the segment `a`-`b`.
#[must_use]
pub fn distance_point_segment(point: Vec3, a: Vec3, b: Vec3) -> f32 {
    point.distance(closest_point_on_segment(point, a, b))
}

/// Distance from `point` to the 2D segment `a`-`b`.
#[must_use]
pub fn distance_point_segment_2d(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Whether the 2D segments `p1`-`p2` and `q1`-`q2` intersect (touching counts).
#[must_use]
pub fn segments_intersect_2d(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    fn orient(a: Vec2, b: Vec2, c: Vec2) -> f32 {
        (b - a).perp_dot(c - a)
    }

    fn on_segment(a: Vec2, b: Vec2, p: Vec2) -> bool {
        p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
    }

    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// Whether `point` lies inside (or on) the 2D triangle `a`, `b`, `c` of either winding.
#[must_use]
pub fn point_in_triangle_2d(point: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(point - a);
    let d2 = (c - b).perp_dot(point - b);
    let d3 = (a - c).perp_dot(point - c);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Rotation whose local +Z looks along `forward` with local +Y as close to
/// `up` as possible.
///
/// Returns `None` when `forward` is zero or parallel to `up`.
#[must_use]
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let z = forward.try_normalize()?;
    let x = up.cross(z).try_normalize()?;
    let y = z.cross(x);
    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize())
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from two corners (in any order).
    #[must_use]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bounds.min = bounds.min.min(p);
            bounds.max = bounds.max.max(p);
        }
        Some(bounds)
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Nearest non-negative ray parameter at which `ray` enters the box.
    #[must_use]
    pub fn ray_intersection(&self, ray: &Ray) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            if dir.abs() < f32::EPSILON {
                if origin < self.min[axis] || origin > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let mut t0 = (self.min[axis] - origin) * inv;
            let mut t1 = (self.max[axis] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

/// A rectangle in GUI space (pixels, origin at the top left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner.
    pub min: Vec2,
    /// Bottom-right corner.
    pub max: Vec2,
}

impl ScreenRect {
    /// Creates a rect spanning two corners given in any order.
    #[must_use]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Width of the rect.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the rect.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Whether `point` lies inside the rect (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Corners in order top-left, top-right, bottom-right, bottom-left.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Whether the 2D segment `a`-`b` touches the rect.
    #[must_use]
    pub fn intersects_segment(&self, a: Vec2, b: Vec2) -> bool {
        if self.contains(a) || self.contains(b) {
            return true;
        }
        let c = self.corners();
        (0..4).any(|i| segments_intersect_2d(a, b, c[i], c[(i + 1) % 4]))
    }
}
