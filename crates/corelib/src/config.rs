//! Engine configuration shared by the platform and app layers.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Window size must be non-zero, got {0}x{1}")]
    WindowSize(u32, u32),
    #[error("Target update rate must be a positive number of Hz, got {0}")]
    UpdateRate(f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Fixed simulation steps per second.
    pub target_update_rate: f64,
}

impl EngineConfig {
    pub const DEFAULT_WIDTH: u32 = 640;
    pub const DEFAULT_HEIGHT: u32 = 400;
    pub const DEFAULT_UPDATE_RATE: f64 = 60.0;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::WindowSize(self.width, self.height));
        }
        if !(self.target_update_rate.is_finite() && self.target_update_rate > 0.0) {
            return Err(ConfigError::UpdateRate(self.target_update_rate));
        }
        Ok(())
    }

    /// Length of one fixed update step, in seconds.
    #[inline]
    pub fn update_step(&self) -> f32 {
        (1.0 / self.target_update_rate) as f32
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: format!("Kiln3D v{}", env!("CARGO_PKG_VERSION")),
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            target_update_rate: Self::DEFAULT_UPDATE_RATE,
        }
    }
}
