//! Rigid-plus-scale transforms for placing meshes in the world.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A transformation represented as separate components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Translation component.
    pub translation: Vec3,
    /// Rotation component as a quaternion.
    pub rotation: Quat,
    /// Scale component.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Creates a new identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Creates a transform from a translation.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Creates a transform from a rotation.
    #[must_use]
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    /// Creates a transform from a scale.
    #[must_use]
    pub fn from_scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }

    /// Sets the translation.
    #[must_use]
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    /// Sets the rotation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the scale.
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Creates a transform from a Mat4.
    ///
    /// This decomposition may not be exact for matrices with shear.
    #[must_use]
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// The local-to-world matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// The world-to-local matrix.
    #[must_use]
    pub fn inverse_matrix(&self) -> Mat4 {
        self.to_matrix().inverse()
    }

    /// Transforms a local point into world space.
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * (point * self.scale) + self.translation
    }

    /// Transforms a local direction into world space (scale applied, no translation).
    #[must_use]
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * (vector * self.scale)
    }

    /// Transforms a world point into local space.
    #[must_use]
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        self.inverse_matrix().transform_point3(point)
    }

    /// Transforms a world direction into local space.
    #[must_use]
    pub fn inverse_transform_vector(&self, vector: Vec3) -> Vec3 {
        self.inverse_matrix().transform_vector3(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_matrix_roundtrip() {
        let t = Transform {
            translation: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        };
        let matrix = t.to_matrix();
        let back = Transform::from_matrix(matrix);
        assert!((back.translation - t.translation).length() < 1e-6);
    }

    #[test]
    fn test_point_matches_matrix() {
        let t = Transform::from_translation(Vec3::new(1.0, -2.0, 0.5))
            .with_rotation(Quat::from_rotation_y(0.7))
            .with_scale(Vec3::new(2.0, 1.0, 3.0));
        let p = Vec3::new(0.3, 0.4, -1.2);
        let expected = t.to_matrix().transform_point3(p);
        assert!((t.transform_point(p) - expected).length() < 1e-5);
        assert!((t.inverse_transform_point(t.transform_point(p)) - p).length() < 1e-5);
    }

    proptest::proptest! {
        #[test]
        fn prop_inverse_point_roundtrip(
            tx in -50.0f32..50.0, ty in -50.0f32..50.0, tz in -50.0f32..50.0,
            angle in -3.0f32..3.0,
            scale in 0.1f32..10.0,
            px in -10.0f32..10.0, py in -10.0f32..10.0, pz in -10.0f32..10.0,
        ) {
            let t = Transform::from_translation(Vec3::new(tx, ty, tz))
                .with_rotation(Quat::from_rotation_y(angle))
                .with_scale(Vec3::splat(scale));
            let p = Vec3::new(px, py, pz);
            let back = t.inverse_transform_point(t.transform_point(p));
            proptest::prop_assert!((back - p).length() < 1e-2);
        }
    }

    #[test]
    fn test_vector_ignores_translation() {
        let t = Transform::from_translation(Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(t.transform_vector(Vec3::Y), Vec3::Y);
        assert_eq!(t.inverse_transform_vector(Vec3::Y), Vec3::Y);
    }
}
