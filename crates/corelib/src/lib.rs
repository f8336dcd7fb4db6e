//! Core types: math re-exports, Transform, Camera, ECS, engine config.

pub use glam::{EulerRot, Mat4, Quat, Vec3, vec3};

pub mod camera;
pub mod config;
pub mod ecs;
pub mod transform;

pub use config::{ConfigError, EngineConfig};
