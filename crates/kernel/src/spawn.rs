//! Periodic creation of randomly shaped dynamic bodies.

use glam::Vec3;
use playfield_common::{EntityId, Transform};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::clock::SimulationClock;
use crate::config::{MAX_DYNAMIC_BODIES, SpawnConfig};
use crate::physics::{Collider, PhysicsBackend, PhysicsError};
use crate::world::{EntityKind, SimWorld};

/// Shape of a dynamic body with its dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    /// Full edge lengths.
    Box { size: Vec3 },
    Cylinder { radius: f32, height: f32 },
    Cone { radius: f32, height: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Sphere = 0,
    Box = 1,
    Cylinder = 2,
    Cone = 3,
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Sphere { .. } => ShapeKind::Sphere,
            Self::Box { .. } => ShapeKind::Box,
            Self::Cylinder { .. } => ShapeKind::Cylinder,
            Self::Cone { .. } => ShapeKind::Cone,
        }
    }

    pub fn collider(&self) -> Collider {
        match *self {
            Self::Sphere { radius } => Collider::Sphere { radius },
            Self::Box { size } => Collider::Box {
                half_extents: size * 0.5,
            },
            Self::Cylinder { radius, height } => Collider::Cylinder { radius, height },
            Self::Cone { radius, height } => Collider::Cone { radius, height },
        }
    }
}

/// Per-shape entry of the spawn table.
struct ShapeEntry {
    kind: ShapeKind,
    sample: fn(&mut dyn RngCore) -> Shape,
}

/// Dimension ranges per shape, indexed by `ShapeKind as usize`.
static SHAPE_TABLE: [ShapeEntry; 4] = [
    ShapeEntry {
        kind: ShapeKind::Sphere,
        sample: |rng| Shape::Sphere {
            radius: rng.gen_range(3.0..5.0),
        },
    },
    ShapeEntry {
        kind: ShapeKind::Box,
        sample: |rng| Shape::Box {
            size: Vec3::new(
                rng.gen_range(4.0..6.0),
                rng.gen_range(4.0..6.0),
                rng.gen_range(4.0..6.0),
            ),
        },
    },
    ShapeEntry {
        kind: ShapeKind::Cylinder,
        sample: |rng| Shape::Cylinder {
            radius: rng.gen_range(3.0..5.0),
            height: rng.gen_range(3.0..5.0),
        },
    },
    ShapeEntry {
        kind: ShapeKind::Cone,
        sample: |rng| Shape::Cone {
            radius: rng.gen_range(3.0..5.0),
            height: rng.gen_range(2.0..4.0),
        },
    },
];

/// A live body created by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicBody {
    pub entity: EntityId,
    pub shape: Shape,
    /// Simulation time at which it was created.
    pub spawned_at: f64,
}

/// Owns the set of live dynamic bodies; the only place it changes.
pub struct EntitySpawnScheduler {
    config: SpawnConfig,
    next_spawn_time: f64,
    live: Vec<DynamicBody>,
    rng: StdRng,
}

impl EntitySpawnScheduler {
    pub fn new(config: SpawnConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            next_spawn_time: config.interval,
            config,
            live: Vec::new(),
            rng,
        }
    }

    pub fn live(&self) -> &[DynamicBody] {
        &self.live
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn next_spawn_time(&self) -> f64 {
        self.next_spawn_time
    }

    fn capacity(&self) -> usize {
        self.config.max_live.min(MAX_DYNAMIC_BODIES)
    }

    /// Run once per frame. Spawns at most one body.
    pub fn update<P: PhysicsBackend + ?Sized>(
        &mut self,
        clock: &SimulationClock,
        world: &mut SimWorld,
        physics: &mut P,
    ) -> Result<Option<EntityId>, PhysicsError> {
        self.cull_fallen(world, physics)?;

        if self.live.len() >= self.capacity() || clock.elapsed_time <= self.next_spawn_time {
            return Ok(None);
        }

        let entry = &SHAPE_TABLE[self.rng.gen_range(0..SHAPE_TABLE.len())];
        let shape = (entry.sample)(&mut self.rng);
        debug_assert_eq!(shape.kind(), entry.kind);

        let entity = world.spawn_with_body(
            physics,
            EntityKind::Dynamic,
            Transform::from_position(self.config.point),
            shape.collider(),
            self.config.mass,
        )?;
        self.live.push(DynamicBody {
            entity,
            shape,
            spawned_at: clock.elapsed_time,
        });
        self.next_spawn_time = clock.elapsed_time + self.config.interval;
        tracing::info!(
            entity = %entity.short(),
            kind = ?entry.kind,
            live = self.live.len(),
            t = clock.elapsed_time,
            "spawned dynamic body"
        );
        Ok(Some(entity))
    }

    /// Destroy a live body and its physics counterpart.
    pub fn despawn<P: PhysicsBackend + ?Sized>(
        &mut self,
        id: EntityId,
        world: &mut SimWorld,
        physics: &mut P,
    ) -> Result<bool, PhysicsError> {
        let Some(index) = self.live.iter().position(|b| b.entity == id) else {
            return Ok(false);
        };
        world.despawn(physics, id)?;
        self.live.swap_remove(index);
        tracing::debug!(entity = %id.short(), live = self.live.len(), "despawned dynamic body");
        Ok(true)
    }

    fn cull_fallen<P: PhysicsBackend + ?Sized>(
        &mut self,
        world: &mut SimWorld,
        physics: &mut P,
    ) -> Result<(), PhysicsError> {
        let Some(floor) = self.config.despawn_below else {
            return Ok(());
        };
        let fallen: Vec<EntityId> = self
            .live
            .iter()
            .filter(|b| {
                world
                    .transform(b.entity)
                    .is_some_and(|t| t.position.y < floor)
            })
            .map(|b| b.entity)
            .collect();
        for id in fallen {
            self.despawn(id, world, physics)?;
        }
        Ok(())
    }
}
