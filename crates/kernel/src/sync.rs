//! Two-way pose transfer between render space and physics space.

use playfield_common::{EntityId, Transform};

use crate::error::KernelError;
use crate::physics::{PhysicsBackend, PhysicsError};
use crate::world::{EntityKind, SimWorld, WorldEvent};

/// Push/pull contract between [`SimWorld`] transforms and physics bodies.
///
/// Entities with `ignore_physics` set are skipped in both directions, which
/// freezes their body while a manipulator moves the render pose.
pub struct PhysicsSyncBridge;

impl PhysicsSyncBridge {
    /// Copy render poses into bodies. Returns how many bodies were written.
    pub fn push<P: PhysicsBackend + ?Sized>(
        world: &SimWorld,
        physics: &mut P,
    ) -> Result<usize, PhysicsError> {
        let mut pushed = 0;
        for data in world.entities().values() {
            if !data.kind.is_synchronized() || data.ignore_physics {
                continue;
            }
            if let Some(body) = data.body {
                physics.set_body_pose(body, &data.transform)?;
                pushed += 1;
            }
        }
        Ok(pushed)
    }

    /// Copy solved body poses back into render poses. Returns how many
    /// entities were written.
    pub fn pull<P: PhysicsBackend + ?Sized>(
        world: &mut SimWorld,
        physics: &P,
    ) -> Result<usize, PhysicsError> {
        let mut pulled = 0;
        let ids: Vec<EntityId> = world.entities().keys().copied().collect();
        for id in ids {
            let Some(data) = world.get_mut(id) else {
                continue;
            };
            if !data.kind.is_synchronized() || data.ignore_physics {
                continue;
            }
            if let Some(body) = data.body {
                let pose = physics.body_pose(body)?;
                // Scale is render-only.
                data.transform.position = pose.position;
                data.transform.rotation = pose.rotation;
                pulled += 1;
            }
        }
        Ok(pulled)
    }

    /// Hand the entity's pose to an external manipulator.
    pub fn begin_manipulation(world: &mut SimWorld, id: EntityId) -> Result<(), KernelError> {
        let data = world.get_mut(id).ok_or(KernelError::EntityNotFound(id))?;
        if data.kind != EntityKind::Dynamic {
            return Err(KernelError::NotManipulable(id));
        }
        if !data.ignore_physics {
            data.ignore_physics = true;
            world.log(WorldEvent::ManipulationStarted { id });
            tracing::debug!(entity = %id.short(), "manipulation started");
        }
        Ok(())
    }

    /// Move the render pose of an entity currently under manipulation.
    pub fn manipulate(
        world: &mut SimWorld,
        id: EntityId,
        transform: Transform,
    ) -> Result<(), KernelError> {
        let data = world.get_mut(id).ok_or(KernelError::EntityNotFound(id))?;
        if !data.ignore_physics {
            return Err(KernelError::NotManipulated(id));
        }
        data.transform = transform;
        Ok(())
    }

    /// Return the entity to physics: its body is re-anchored at the released
    /// pose with a single push, then the flag is cleared.
    pub fn end_manipulation<P: PhysicsBackend + ?Sized>(
        world: &mut SimWorld,
        physics: &mut P,
        id: EntityId,
    ) -> Result<Transform, KernelError> {
        let data = world.get_mut(id).ok_or(KernelError::EntityNotFound(id))?;
        if !data.ignore_physics {
            return Err(KernelError::NotManipulated(id));
        }
        let transform = data.transform;
        if let Some(body) = data.body {
            physics.set_body_pose(body, &transform)?;
        }
        data.ignore_physics = false;
        world.log(WorldEvent::ManipulationEnded { id, transform });
        tracing::debug!(entity = %id.short(), "manipulation ended");
        Ok(transform)
    }
}
