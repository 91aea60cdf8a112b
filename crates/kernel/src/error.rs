use playfield_common::EntityId;

use crate::config::ConfigError;
use crate::physics::PhysicsError;

/// Errors surfaced by the simulation core.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// The physics world could not be built. Fatal: nothing can run without it.
    #[error("physics initialization failed: {0}")]
    PhysicsInit(#[source] PhysicsError),
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error("entity {0:?} not found")]
    EntityNotFound(EntityId),
    #[error("entity {0:?} cannot be manipulated")]
    NotManipulable(EntityId),
    #[error("entity {0:?} is not being manipulated")]
    NotManipulated(EntityId),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
