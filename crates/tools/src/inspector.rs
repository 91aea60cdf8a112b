use std::fmt;

use playfield_common::EntityId;
use playfield_kernel::{
    CameraId, DebugMode, EntityKind, FrameOrchestrator, GroundState, PhysicsBackend, ShapeKind,
    SimWorld,
};

/// Read-only queries against orchestrator state for logs and the CLI.
pub struct FrameInspector;

impl FrameInspector {
    pub fn summary<P: PhysicsBackend>(o: &FrameOrchestrator<P>) -> FrameSummary {
        let clock = o.clock();
        FrameSummary {
            frame: o.frame_count(),
            elapsed: clock.elapsed_time,
            delta: clock.delta,
            entity_count: o.world().entity_count(),
            live_dynamic: o.scheduler().live_count(),
            next_spawn: o.scheduler().next_spawn_time(),
            mode: o.debug_mode(),
            active_camera: o.rig().active(),
            ground: o.ground().state(),
            player_position: o
                .world()
                .transform(o.player())
                .map(|t| t.position.to_array()),
            click_target: o.character().click_target().map(|v| v.to_array()),
            pending_events: o.world().events().len(),
        }
    }

    pub fn inspect_entity(world: &SimWorld, id: EntityId) -> Option<EntityInfo> {
        world.get(id).map(|data| {
            let t = data.transform;
            EntityInfo {
                id,
                kind: data.kind,
                position: t.position.to_array(),
                yaw: t.yaw(),
                held: data.ignore_physics,
            }
        })
    }

    /// Live dynamic bodies in spawn order.
    pub fn list_dynamic<P: PhysicsBackend>(o: &FrameOrchestrator<P>) -> Vec<DynamicInfo> {
        o.scheduler()
            .live()
            .iter()
            .map(|body| DynamicInfo {
                id: body.entity,
                shape: body.shape.kind(),
                spawned_at: body.spawned_at,
                position: o.world().transform(body.entity).map(|t| t.position.to_array()),
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct FrameSummary {
    pub frame: u64,
    pub elapsed: f64,
    pub delta: f64,
    pub entity_count: usize,
    pub live_dynamic: usize,
    pub next_spawn: f64,
    pub mode: DebugMode,
    pub active_camera: CameraId,
    pub ground: GroundState,
    pub player_position: Option<[f32; 3]>,
    pub click_target: Option<[f32; 3]>,
    pub pending_events: usize,
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame {}: t={:.2}s dt={:.3} entities={} dynamic={}/5 next_spawn={:.2} mode={:?} camera={:?} ground={:?}",
            self.frame,
            self.elapsed,
            self.delta,
            self.entity_count,
            self.live_dynamic,
            self.next_spawn,
            self.mode,
            self.active_camera,
            self.ground,
        )?;
        if let Some([x, y, z]) = self.player_position {
            write!(f, " player=({x:.2}, {y:.2}, {z:.2})")?;
        }
        if let Some([x, _, z]) = self.click_target {
            write!(f, " target=({x:.2}, {z:.2})")?;
        }
        Ok(())
    }
}

/// Detailed info about a single entity.
#[derive(Debug, Clone)]
pub struct EntityInfo {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: [f32; 3],
    pub yaw: f32,
    pub held: bool,
}

impl fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Entity [{}] {:?} pos=({:.2}, {:.2}, {:.2}) yaw={:.2}{}",
            self.id.short(),
            self.kind,
            self.position[0],
            self.position[1],
            self.position[2],
            self.yaw,
            if self.held { " held" } else { "" }
        )
    }
}

#[derive(Debug, Clone)]
pub struct DynamicInfo {
    pub id: EntityId,
    pub shape: ShapeKind,
    pub spawned_at: f64,
    pub position: Option<[f32; 3]>,
}

impl fmt::Display for DynamicInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {:?} spawned at {:.2}s", self.id.short(), self.shape, self.spawned_at)?;
        if let Some([x, y, z]) = self.position {
            write!(f, " pos=({x:.2}, {y:.2}, {z:.2})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use playfield_input::InputState;
    use playfield_kernel::{
        ClearFlags, PointMassPhysics, RenderBackend, RenderPass, SceneSetup, SimConfig,
    };

    struct NullRenderer;

    impl RenderBackend for NullRenderer {
        fn resize_to_viewport(&mut self, _: u32, _: u32) {}
        fn clear(&mut self, _: ClearFlags) {}
        fn render_pass(&mut self, _: &RenderPass<'_>) {}
    }

    fn orchestrator() -> FrameOrchestrator<PointMassPhysics> {
        let mut config = SimConfig::default();
        config.spawn.seed = Some(3);
        let physics = PointMassPhysics::new(Vec3::new(0.0, -98.0, 0.0)).unwrap();
        FrameOrchestrator::new(config, physics, SceneSetup::default()).unwrap()
    }

    #[test]
    fn summary_before_first_frame() {
        let o = orchestrator();
        let s = FrameInspector::summary(&o);
        assert_eq!(s.frame, 0);
        assert_eq!(s.live_dynamic, 0);
        assert_eq!(s.mode, DebugMode::Debug);
        assert_eq!(s.ground, GroundState::Airborne);
        assert_eq!(s.player_position, Some([0.0, 20.0, 0.0]));
    }

    #[test]
    fn summary_tracks_frames_and_spawns() {
        let mut o = orchestrator();
        for _ in 0..40 {
            o.step(0.1, &InputState::default(), &mut NullRenderer).unwrap();
        }
        let s = FrameInspector::summary(&o);
        assert_eq!(s.frame, 40);
        assert_eq!(s.live_dynamic, 1);
        assert_eq!(s.ground, GroundState::Grounded);
        let text = s.to_string();
        assert!(text.contains("Frame 40"));
        assert!(text.contains("dynamic=1/5"));

        let dynamic = FrameInspector::list_dynamic(&o);
        assert_eq!(dynamic.len(), 1);
        assert!(dynamic[0].spawned_at > 3.0);
        assert!(dynamic[0].to_string().contains("spawned at"));
    }

    #[test]
    fn inspect_player_and_unknown() {
        let o = orchestrator();
        let info = FrameInspector::inspect_entity(o.world(), o.player()).unwrap();
        assert_eq!(info.kind, EntityKind::Player);
        assert!(info.to_string().contains("Player"));
        assert!(FrameInspector::inspect_entity(o.world(), EntityId::new()).is_none());
    }
}
