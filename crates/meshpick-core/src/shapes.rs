//! Primitive mesh builders.

use glam::{Vec2, Vec3};

use crate::mesh::{Face, Mesh};

/// An axis-aligned cube centered on the origin.
///
/// Each side has its own four vertices (24 in total), so corners are
/// coincident triples. Faces are quads in the order +X, -X, +Y, -Y, +Z, -Z,
/// wound counter-clockwise when seen from outside.
#[must_use]
pub fn cube(size: f32) -> Mesh {
    let s = size * 0.5;
    let sides: [[Vec3; 4]; 6] = [
        [
            Vec3::new(s, -s, s),
            Vec3::new(s, -s, -s),
            Vec3::new(s, s, -s),
            Vec3::new(s, s, s),
        ],
        [
            Vec3::new(-s, -s, -s),
            Vec3::new(-s, -s, s),
            Vec3::new(-s, s, s),
            Vec3::new(-s, s, -s),
        ],
        [
            Vec3::new(-s, s, s),
            Vec3::new(s, s, s),
            Vec3::new(s, s, -s),
            Vec3::new(-s, s, -s),
        ],
        [
            Vec3::new(-s, -s, -s),
            Vec3::new(s, -s, -s),
            Vec3::new(s, -s, s),
            Vec3::new(-s, -s, s),
        ],
        [
            Vec3::new(-s, -s, s),
            Vec3::new(s, -s, s),
            Vec3::new(s, s, s),
            Vec3::new(-s, s, s),
        ],
        [
            Vec3::new(s, -s, -s),
            Vec3::new(-s, -s, -s),
            Vec3::new(-s, s, -s),
            Vec3::new(s, s, -s),
        ],
    ];
    let quad_uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    let positions: Vec<Vec3> = sides.iter().flatten().copied().collect();
    let uvs: Vec<Vec2> = (0..6).flat_map(|_| quad_uvs).collect();
    let faces = (0..6)
        .map(|i| {
            let b = i * 4;
            Face::quad(b, b + 1, b + 2, b + 3)
        })
        .collect();

    Mesh::from_valid_parts(positions, faces, Some(uvs))
}

/// A grid of `cols` x `rows` quads in the XY plane facing +Z, centered on
/// the origin. Grid vertices are shared between neighbouring quads.
///
/// Zero `cols` or `rows` are treated as one.
#[must_use]
pub fn plane(width: f32, height: f32, cols: usize, rows: usize) -> Mesh {
    let cols = cols.max(1);
    let rows = rows.max(1);

    let mut positions = Vec::with_capacity((cols + 1) * (rows + 1));
    let mut uvs = Vec::with_capacity(positions.capacity());
    for j in 0..=rows {
        for i in 0..=cols {
            let u = i as f32 / cols as f32;
            let v = j as f32 / rows as f32;
            positions.push(Vec3::new((u - 0.5) * width, (v - 0.5) * height, 0.0));
            uvs.push(Vec2::new(u, v));
        }
    }

    let stride = cols + 1;
    let mut faces = Vec::with_capacity(cols * rows);
    for j in 0..rows {
        for i in 0..cols {
            let a = j * stride + i;
            faces.push(Face::quad(a, a + 1, a + 1 + stride, a + stride));
        }
    }

    Mesh::from_valid_parts(positions, faces, Some(uvs))
}

impl Mesh {
    /// An axis-aligned cube; see [`cube`].
    #[must_use]
    pub fn cube(size: f32) -> Self {
        cube(size)
    }

    /// A single quad in the XY plane; see [`plane`].
    #[must_use]
    pub fn plane(width: f32, height: f32) -> Self {
        plane(width, height, 1, 1)
    }
}
