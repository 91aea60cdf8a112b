//! Simulation Kernel: the per-frame core of the playfield scene.
//!
//! # Invariants
//! - Exactly one camera is active, and the audio listener is attached to it.
//! - A dynamic entity and its physics body are created and destroyed together.
//! - `ignore_physics` is set only inside a manipulation window.
//! - At most five dynamic bodies are live.
//! - Simulation time is monotonic and each frame's delta is bounded.

pub mod camera;
pub mod character;
pub mod clock;
pub mod config;
pub mod debug_mode;
pub mod effects;
pub mod error;
pub mod frame;
pub mod ground;
pub mod physics;
pub mod render;
pub mod spawn;
pub mod sync;
pub mod terrain;
pub mod world;

pub use camera::{Camera, CameraFollowController, CameraId, CameraRig, OrbitControls, Ray};
pub use character::{CharacterCommands, CharacterController, Locomotion};
pub use clock::{FrameClock, SimulationClock};
pub use config::{ConfigError, MAX_DYNAMIC_BODIES, SimConfig};
pub use debug_mode::{DebugEffect, DebugMode, DebugModeState, SceneAids};
pub use effects::{ParticleField, SpriteTween, quadratic_out};
pub use error::KernelError;
pub use frame::{FrameOrchestrator, FrameReport, MUSIC_VOLUME, SceneSetup, SoundCue};
pub use ground::{GroundContactTracker, GroundState};
pub use physics::{
    BodyHandle, Collider, ContactSet, PhysicsBackend, PhysicsError, PointMassPhysics, RapierPhysics,
};
pub use render::{ClearFlags, RenderBackend, RenderPass, RenderView, SceneLayer};
pub use spawn::{DynamicBody, EntitySpawnScheduler, Shape, ShapeKind};
pub use sync::PhysicsSyncBridge;
pub use terrain::{FlatTerrain, Terrain};
pub use world::{EntityData, EntityKind, SimWorld, WorldEvent};

pub fn crate_info() -> &'static str {
    "playfield-kernel v0.1.0"
}
