use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an entity in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Spatial transform: position, rotation, scale.
///
/// Used both as the render-space pose of an entity and as the pose exchanged
/// with the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Same pose with the rotation replaced by a pure yaw about +Y.
    pub fn with_yaw(self, yaw: f32) -> Self {
        Self {
            rotation: Quat::from_rotation_y(yaw),
            ..self
        }
    }

    /// Heading of the local +Z axis projected on the XZ plane.
    pub fn yaw(&self) -> f32 {
        yaw_of(self.rotation * Vec3::Z)
    }
}

/// Drop the vertical component.
pub fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Yaw (rotation about +Y) of a direction, measured from +Z towards +X.
pub fn yaw_of(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}
