use crate::{Mat4, Vec3};

/// Vertical field of view used by [`Camera::look_at`].
pub const DEFAULT_FOV_Y_DEG: f32 = 60.0;

/// Right-handed perspective camera. Depth maps to [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
}

impl Camera {
    /// Y-up camera at `eye` looking at `target`, default fov and clip planes 0.1..100.
    pub fn look_at(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            fov_y_rad: DEFAULT_FOV_Y_DEG.to_radians(),
            z_near: 0.1,
            z_far: 100.0,
            aspect,
        }
    }

    /// Fit an axis-aligned box: looks at its center from slightly above +Z,
    /// with clip planes hugging the bounding sphere.
    pub fn framing(min: Vec3, max: Vec3, aspect: f32) -> Self {
        let center = (min + max) * 0.5;
        let radius = ((max - min).length() * 0.5).max(0.01);
        let mut cam = Self::look_at(center, center, aspect);
        let distance = radius / (cam.fov_y_rad * 0.5).sin();
        cam.eye = center + Vec3::new(0.0, radius * 0.25, distance);
        cam.with_clip((distance - radius).max(0.01) * 0.5, distance + radius * 2.0)
    }

    #[inline]
    pub fn with_clip(mut self, z_near: f32, z_far: f32) -> Self {
        self.z_near = z_near;
        self.z_far = z_far;
        self
    }

    #[inline]
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_rad, self.aspect.max(1e-6), self.z_near, self.z_far)
    }

    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        self.proj() * self.view()
    }
}
