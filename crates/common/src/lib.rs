//! Shared types: entity identity, poses, and planar geometry helpers.

mod types;

pub use types::{EntityId, Transform, planar, yaw_of};
