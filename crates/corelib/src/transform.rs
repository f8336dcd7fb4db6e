use crate::{EulerRot, Mat4, Quat, Vec3};

/// Entity placement: translation, rotation and (possibly non-uniform) scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    #[inline]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Apply an extra XYZ Euler rotation on top of the current one.
    pub fn rotate_euler(&mut self, delta: Vec3) {
        let q = Quat::from_euler(EulerRot::XYZ, delta.x, delta.y, delta.z);
        self.rotation = (self.rotation * q).normalize();
    }

    /// T * R * S
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Model matrix for a mesh whose own local transform is `local`.
    #[inline]
    pub fn compose(&self, local: Mat4) -> Mat4 {
        self.matrix() * local
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
