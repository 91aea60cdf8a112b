use std::collections::BTreeMap;

use playfield_common::{EntityId, Transform};

use crate::physics::{BodyHandle, PhysicsBackend, PhysicsError};

/// What role an entity plays in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Ground surface. Static, never synchronized.
    Terrain,
    /// Static obstacle. Never synchronized.
    Prop,
    /// The player-controlled character.
    Player,
    /// Secondary character that follows physics only.
    Avatar,
    /// A body created by the spawn scheduler.
    Dynamic,
}

impl EntityKind {
    /// Whether the bridge exchanges poses for this kind every frame.
    pub fn is_synchronized(self) -> bool {
        matches!(self, Self::Player | Self::Avatar | Self::Dynamic)
    }
}

/// An event record produced by every structural change to the world.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    Spawned { id: EntityId, kind: EntityKind },
    /// Entity and its body were destroyed together.
    Despawned { id: EntityId, body: Option<BodyHandle> },
    ManipulationStarted { id: EntityId },
    ManipulationEnded { id: EntityId, transform: Transform },
}

/// Per-entity data stored in the world.
#[derive(Debug, Clone)]
pub struct EntityData {
    pub kind: EntityKind,
    /// Render-space pose.
    pub transform: Transform,
    pub body: Option<BodyHandle>,
    /// Set only while an external manipulator owns the pose.
    pub ignore_physics: bool,
}

/// Render-space registry of all entities and their physics bodies.
///
/// Uses BTreeMap for deterministic iteration order. Entity and body are
/// created and destroyed together.
#[derive(Debug, Default)]
pub struct SimWorld {
    entities: BTreeMap<EntityId, EntityData>,
    event_log: Vec<WorldEvent>,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityData> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityData> {
        self.entities.get_mut(&id)
    }

    pub fn transform(&self, id: EntityId) -> Option<Transform> {
        self.entities.get(&id).map(|d| d.transform)
    }

    /// Register an entity together with its body.
    ///
    /// The body is created first so a physics failure leaves no entity behind.
    pub fn spawn_with_body<P: PhysicsBackend + ?Sized>(
        &mut self,
        physics: &mut P,
        kind: EntityKind,
        transform: Transform,
        collider: crate::physics::Collider,
        mass: f32,
    ) -> Result<EntityId, PhysicsError> {
        let body = physics.add_body(collider, mass, &transform)?;
        let id = EntityId::new();
        self.entities.insert(
            id,
            EntityData {
                kind,
                transform,
                body: Some(body),
                ignore_physics: false,
            },
        );
        self.event_log.push(WorldEvent::Spawned { id, kind });
        Ok(id)
    }

    /// Remove an entity and destroy its body. Returns the data if it existed.
    ///
    /// The body goes first; if the backend refuses, the entity stays.
    pub fn despawn<P: PhysicsBackend + ?Sized>(
        &mut self,
        physics: &mut P,
        id: EntityId,
    ) -> Result<Option<EntityData>, PhysicsError> {
        let Some(body) = self.entities.get(&id).map(|d| d.body) else {
            return Ok(None);
        };
        if let Some(body) = body {
            physics.remove_body(body)?;
        }
        let Some(data) = self.entities.remove(&id) else {
            return Ok(None);
        };
        self.event_log.push(WorldEvent::Despawned {
            id,
            body: data.body,
        });
        Ok(Some(data))
    }

    pub(crate) fn log(&mut self, event: WorldEvent) {
        self.event_log.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Collider, PointMassPhysics};
    use glam::Vec3;

    fn physics() -> PointMassPhysics {
        PointMassPhysics::new(Vec3::new(0.0, -9.8, 0.0)).unwrap()
    }

    #[test]
    fn world_starts_empty() {
        let w = SimWorld::new();
        assert_eq!(w.entity_count(), 0);
        assert!(w.events().is_empty());
    }

    #[test]
    fn spawn_and_despawn_destroy_body_together() {
        let mut p = physics();
        let mut w = SimWorld::new();
        let id = w
            .spawn_with_body(
                &mut p,
                EntityKind::Dynamic,
                Transform::default(),
                Collider::Sphere { radius: 1.0 },
                1.0,
            )
            .unwrap();
        assert_eq!(w.entity_count(), 1);
        assert_eq!(p.body_count(), 1);

        let data = w.despawn(&mut p, id).unwrap().unwrap();
        assert_eq!(data.kind, EntityKind::Dynamic);
        assert_eq!(w.entity_count(), 0);
        assert_eq!(p.body_count(), 0);
        assert!(w.despawn(&mut p, id).unwrap().is_none());
    }

    #[test]
    fn failed_body_leaves_no_entity() {
        let mut p = physics();
        let mut w = SimWorld::new();
        let res = w.spawn_with_body(
            &mut p,
            EntityKind::Dynamic,
            Transform::default(),
            Collider::Sphere { radius: 1.0 },
            -5.0,
        );
        assert!(res.is_err());
        assert_eq!(w.entity_count(), 0);
    }

    #[test]
    fn refused_body_removal_keeps_entity() {
        let mut p = physics();
        let mut w = SimWorld::new();
        let id = w
            .spawn_with_body(
                &mut p,
                EntityKind::Dynamic,
                Transform::default(),
                Collider::Sphere { radius: 1.0 },
                1.0,
            )
            .unwrap();
        let body = w.get(id).unwrap().body.unwrap();
        p.remove_body(body).unwrap();

        let err = w.despawn(&mut p, id).unwrap_err();
        assert!(matches!(err, PhysicsError::UnknownBody(b) if b == body));
        assert!(w.get(id).is_some());
        assert!(!w
            .events()
            .iter()
            .any(|e| matches!(e, WorldEvent::Despawned { .. })));
    }

    #[test]
    fn events_are_recorded() {
        let mut p = physics();
        let mut w = SimWorld::new();
        let id = w
            .spawn_with_body(
                &mut p,
                EntityKind::Prop,
                Transform::default(),
                Collider::Box { half_extents: Vec3::ONE },
                0.0,
            )
            .unwrap();
        w.despawn(&mut p, id).unwrap();
        let events = w.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], WorldEvent::Spawned { kind: EntityKind::Prop, .. }));
        assert!(w.events().is_empty());
    }

    #[test]
    fn synchronized_kinds() {
        assert!(EntityKind::Player.is_synchronized());
        assert!(EntityKind::Dynamic.is_synchronized());
        assert!(!EntityKind::Terrain.is_synchronized());
        assert!(!EntityKind::Prop.is_synchronized());
    }
}
