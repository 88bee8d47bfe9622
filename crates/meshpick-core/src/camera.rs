//! Camera and screen-space projection.
//!
//! Screen ("GUI") coordinates are pixels with the origin at the top-left of
//! the viewport and +y pointing down.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::math::Ray;

/// Projection between world space and GUI space.
///
/// The picking code only needs these three queries, so any camera
/// implementation can drive it.
pub trait ViewProjection {
    /// Projects a world point to GUI space. `z` is the view depth along the
    /// camera's forward axis; points behind the camera have `z <= 0`.
    fn world_to_screen(&self, point: Vec3) -> Vec3;

    /// The world-space ray through a GUI point, with a unit direction.
    fn screen_to_ray(&self, point: Vec2) -> Ray;

    /// Distance to the near clip plane.
    fn near_clip(&self) -> f32;
}

/// Camera projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    /// Perspective projection.
    #[default]
    Perspective,
    /// Orthographic projection.
    Orthographic,
}

/// A look-at camera with a pixel viewport.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Projection mode.
    pub projection_mode: ProjectionMode,
    /// Half height of the view volume in orthographic mode.
    pub ortho_scale: f32,
    /// Viewport size in pixels.
    pub viewport: Vec2,
}

impl Camera {
    /// Creates a camera at `(0, 0, 3)` looking at the origin.
    #[must_use]
    pub fn new(viewport: Vec2) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_4,
            near: 0.01,
            far: 1000.0,
            projection_mode: ProjectionMode::Perspective,
            ortho_scale: 1.0,
            viewport,
        }
    }

    /// Sets position and target.
    #[must_use]
    pub fn looking_at(mut self, position: Vec3, target: Vec3) -> Self {
        self.position = position;
        self.target = target;
        self
    }

    /// Sets the projection mode.
    #[must_use]
    pub fn with_projection_mode(mut self, mode: ProjectionMode) -> Self {
        self.projection_mode = mode;
        self
    }

    /// Width over height, 1 for an empty viewport.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        }
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection_mode {
            ProjectionMode::Perspective => {
                Mat4::perspective_rh(self.fov, self.aspect_ratio(), self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let half_height = self.ortho_scale;
                let half_width = half_height * self.aspect_ratio();
                Mat4::orthographic_rh(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Returns the camera's forward direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

impl ViewProjection for Camera {
    fn world_to_screen(&self, point: Vec3) -> Vec3 {
        let depth = -self.view_matrix().transform_point3(point).z;
        let clip = self.view_projection_matrix() * point.extend(1.0);
        if clip.w.abs() < 1e-12 {
            return Vec3::new(f32::NAN, f32::NAN, depth);
        }
        let ndc = clip.truncate() / clip.w;
        Vec3::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
            depth,
        )
    }

    fn screen_to_ray(&self, point: Vec2) -> Ray {
        let fallback = Ray::new(self.position, self.forward());
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return fallback;
        }

        let ndc_x = (point.x / (self.viewport.x * 0.5)) - 1.0;
        let ndc_y = 1.0 - (point.y / (self.viewport.y * 0.5));
        let inv_view_proj = self.view_projection_matrix().inverse();

        // NDC depth runs 0..1
        let near = inv_view_proj * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        if near.w.abs() < 1e-6 || far.w.abs() < 1e-6 {
            return fallback;
        }

        let origin = near.truncate() / near.w;
        let direction = (far.truncate() / far.w - origin).normalize_or_zero();
        if direction == Vec3::ZERO {
            return fallback;
        }
        Ray::new(origin, direction)
    }

    fn near_clip(&self) -> f32 {
        self.near
    }
}
