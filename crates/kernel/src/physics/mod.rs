//! Physics collaborator interface.
//!
//! The solver is opaque: the kernel only registers bodies, exchanges poses,
//! applies forces and impulses, steps, and queries contacts.

mod point_mass;
mod rapier;

pub use point_mass::PointMassPhysics;
pub use rapier::RapierPhysics;

use std::collections::BTreeSet;

use glam::Vec3;
use playfield_common::Transform;
use serde::{Deserialize, Serialize};

/// Opaque handle to a body owned by the physics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Collision shape of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
    Cylinder { radius: f32, height: f32 },
    Cone { radius: f32, height: f32 },
    /// Upright character volume.
    Human { half_extents: Vec3 },
    /// Unbounded ground surface at a fixed height.
    Ground { height: f32 },
}

impl Collider {
    /// Distance from the body origin to its lowest point.
    pub fn half_height(&self) -> f32 {
        match *self {
            Self::Sphere { radius } => radius,
            Self::Box { half_extents } | Self::Human { half_extents } => half_extents.y,
            Self::Cylinder { height, .. } | Self::Cone { height, .. } => height * 0.5,
            Self::Ground { .. } => 0.0,
        }
    }
}

/// Unordered pairs of bodies found touching after a step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSet {
    pairs: BTreeSet<(BodyHandle, BodyHandle)>,
}

impl ContactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, a: BodyHandle, b: BodyHandle) {
        self.pairs.insert((a.min(b), a.max(b)));
    }

    pub fn contains(&self, a: BodyHandle, b: BodyHandle) -> bool {
        self.pairs.contains(&(a.min(b), a.max(b)))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

/// Errors reported by a physics backend.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("physics world failed to initialize: {0}")]
    InitFailed(String),
    #[error("unknown body {0:?}")]
    UnknownBody(BodyHandle),
    #[error("invalid mass {0}")]
    InvalidMass(f32),
}

/// Operations the kernel consumes from the body simulator.
///
/// A mass of zero registers a static body.
pub trait PhysicsBackend {
    fn add_body(
        &mut self,
        collider: Collider,
        mass: f32,
        pose: &Transform,
    ) -> Result<BodyHandle, PhysicsError>;

    fn remove_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError>;

    /// Advance the simulation. Blocks until the solve completes.
    fn step(&mut self, delta: f32);

    /// Overwrite the body pose from a render-space transform.
    fn set_body_pose(&mut self, body: BodyHandle, pose: &Transform) -> Result<(), PhysicsError>;

    /// Current physics-space pose of the body.
    fn body_pose(&self, body: BodyHandle) -> Result<Transform, PhysicsError>;

    /// Force accumulated until the next step.
    fn apply_force(&mut self, body: BodyHandle, force: Vec3) -> Result<(), PhysicsError>;

    /// Instantaneous change of momentum.
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3) -> Result<(), PhysicsError>;

    /// Contacts from the last step restricted to pairs inside `subset`.
    fn query_contacts(&self, subset: &[BodyHandle]) -> ContactSet;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_pairs_are_unordered() {
        let mut set = ContactSet::new();
        set.insert(BodyHandle(3), BodyHandle(1));
        assert!(set.contains(BodyHandle(1), BodyHandle(3)));
        set.insert(BodyHandle(1), BodyHandle(3));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn half_heights() {
        assert_eq!(Collider::Sphere { radius: 2.0 }.half_height(), 2.0);
        assert_eq!(Collider::Cone { radius: 1.0, height: 4.0 }.half_height(), 2.0);
        assert_eq!(Collider::Ground { height: 5.0 }.half_height(), 0.0);
    }
}
