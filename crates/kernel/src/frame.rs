//! The per-frame routine that sequences every component.

use glam::Vec3;
use playfield_common::{EntityId, Transform};
use playfield_input::{InputState, Key};

use crate::camera::{CameraFollowController, CameraRig};
use crate::character::{CharacterCommands, CharacterController};
use crate::clock::{FrameClock, SimulationClock};
use crate::config::SimConfig;
use crate::debug_mode::{self, DebugMode, DebugModeState, SceneAids};
use crate::effects::{ParticleField, SpriteTween};
use crate::error::KernelError;
use crate::ground::GroundContactTracker;
use crate::physics::{BodyHandle, Collider, PhysicsBackend};
use crate::render::{ClearFlags, RenderBackend, RenderPass, RenderView, SceneLayer};
use crate::spawn::EntitySpawnScheduler;
use crate::sync::PhysicsSyncBridge;
use crate::terrain::{FlatTerrain, Terrain};
use crate::world::{EntityKind, SimWorld, WorldEvent};

/// Which optional assets made it through startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneSetup {
    /// The secondary avatar is created only when its model loaded.
    pub avatar: bool,
    /// Background music track is available.
    pub music: bool,
    /// Overlay sprite texture is available.
    pub sprite: bool,
    /// Particle texture is available.
    pub particles: bool,
}

impl Default for SceneSetup {
    fn default() -> Self {
        Self {
            avatar: true,
            music: true,
            sprite: true,
            particles: true,
        }
    }
}

/// Background music volume relative to the listener.
pub const MUSIC_VOLUME: f32 = 0.1;

/// Audio the host should play this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundCue {
    /// Start the background track. Emitted once, after a listener exists.
    Music { looped: bool, volume: f32 },
    Jump,
}

/// What happened during one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub clock: SimulationClock,
    pub spawned: Option<EntityId>,
    pub jumped: bool,
    pub grounded: bool,
    /// New mode when the debug toggle fired.
    pub mode_change: Option<DebugMode>,
    pub sound_cues: Vec<SoundCue>,
    /// Structural changes to the world during this frame.
    pub events: Vec<WorldEvent>,
}

/// Owns every component and runs them in a fixed order once per frame.
pub struct FrameOrchestrator<P: PhysicsBackend> {
    config: SimConfig,
    physics: P,
    world: SimWorld,
    clock: FrameClock,
    scheduler: EntitySpawnScheduler,
    character: CharacterController,
    ground: GroundContactTracker,
    follow: CameraFollowController,
    rig: CameraRig,
    debug: DebugModeState,
    aids: SceneAids,
    terrain: Box<dyn Terrain>,
    terrain_body: BodyHandle,
    player: EntityId,
    player_body: BodyHandle,
    avatar: Option<EntityId>,
    hover_marker: Option<Vec3>,
    sprite: Option<SpriteTween>,
    particles: Option<ParticleField>,
    music_pending: bool,
    frame: u64,
}

impl<P: PhysicsBackend> FrameOrchestrator<P> {
    /// Build the scene: ground, props, player, and the avatar if requested.
    ///
    /// Any failure to register the static scene or the player is fatal. A
    /// failing avatar is dropped with a warning.
    pub fn new(config: SimConfig, mut physics: P, setup: SceneSetup) -> Result<Self, KernelError> {
        config.validate()?;
        let mut world = SimWorld::new();

        let height = config.terrain.height;
        let terrain_entity = world
            .spawn_with_body(
                &mut physics,
                EntityKind::Terrain,
                Transform::from_position(Vec3::new(0.0, height, 0.0)),
                Collider::Ground { height },
                0.0,
            )
            .map_err(KernelError::PhysicsInit)?;

        for prop in &config.props {
            world
                .spawn_with_body(
                    &mut physics,
                    EntityKind::Prop,
                    Transform::from_position(prop.position),
                    Collider::Box {
                        half_extents: prop.half_extents,
                    },
                    0.0,
                )
                .map_err(KernelError::PhysicsInit)?;
        }

        let player = world
            .spawn_with_body(
                &mut physics,
                EntityKind::Player,
                Transform::from_position(config.player.start),
                Collider::Human {
                    half_extents: config.player.half_extents,
                },
                config.player.mass,
            )
            .map_err(KernelError::PhysicsInit)?;

        let avatar = if setup.avatar {
            match world.spawn_with_body(
                &mut physics,
                EntityKind::Avatar,
                Transform::from_position(config.player.avatar_start),
                Collider::Human {
                    half_extents: config.player.half_extents,
                },
                config.player.mass,
            ) {
                Ok(id) => Some(id),
                Err(err) => {
                    tracing::warn!(%err, "avatar body rejected; scene runs without it");
                    None
                }
            }
        } else {
            tracing::warn!("avatar unavailable; scene runs without it");
            None
        };

        let terrain_body = Self::body_of(&world, terrain_entity)?;
        let player_body = Self::body_of(&world, player)?;

        tracing::info!(
            entities = world.entity_count(),
            avatar = avatar.is_some(),
            music = setup.music,
            sprite = setup.sprite,
            particles = setup.particles,
            "scene initialized"
        );

        Ok(Self {
            clock: FrameClock::new(config.max_delta),
            scheduler: EntitySpawnScheduler::new(config.spawn.clone()),
            character: CharacterController::new(&config.player),
            ground: GroundContactTracker::new(config.jump.cooldown),
            follow: CameraFollowController::new(&config.camera),
            rig: CameraRig::new(&config.camera),
            debug: DebugModeState::default(),
            aids: SceneAids::all(true),
            terrain: Box::new(FlatTerrain { height }),
            terrain_body,
            player,
            player_body,
            avatar,
            hover_marker: None,
            sprite: setup.sprite.then(SpriteTween::default),
            particles: setup.particles.then(ParticleField::default),
            music_pending: setup.music,
            frame: 0,
            config,
            physics,
            world,
        })
    }

    fn body_of(world: &SimWorld, id: EntityId) -> Result<BodyHandle, KernelError> {
        world
            .get(id)
            .and_then(|d| d.body)
            .ok_or(KernelError::EntityNotFound(id))
    }

    /// Replace the surface used for pointer picking.
    pub fn set_terrain(&mut self, terrain: Box<dyn Terrain>) {
        self.terrain = terrain;
    }

    /// Run one frame with the host's elapsed time since the previous frame.
    pub fn step<R: RenderBackend + ?Sized>(
        &mut self,
        host_delta: f64,
        input: &InputState,
        renderer: &mut R,
    ) -> Result<FrameReport, KernelError> {
        let saved = self.clock.clone();
        let clock = self.clock.advance(host_delta);
        self.guarded(saved, clock, input, renderer)
    }

    /// Run one frame from an absolute host timestamp in seconds.
    pub fn step_at<R: RenderBackend + ?Sized>(
        &mut self,
        host_seconds: f64,
        input: &InputState,
        renderer: &mut R,
    ) -> Result<FrameReport, KernelError> {
        let saved = self.clock.clone();
        let clock = self.clock.tick(host_seconds);
        self.guarded(saved, clock, input, renderer)
    }

    /// Run a frame; on failure the clock and gameplay camera are restored and
    /// the frame is not counted.
    fn guarded<R: RenderBackend + ?Sized>(
        &mut self,
        saved_clock: FrameClock,
        clock: SimulationClock,
        input: &InputState,
        renderer: &mut R,
    ) -> Result<FrameReport, KernelError> {
        let saved_camera = self.rig.gameplay.clone();
        let result = self.run_frame(clock, input, renderer);
        match &result {
            Ok(_) => self.frame += 1,
            Err(err) => {
                tracing::error!(frame = self.frame + 1, %err, "frame aborted");
                self.clock = saved_clock;
                self.rig.gameplay = saved_camera;
            }
        }
        result
    }

    fn run_frame<R: RenderBackend + ?Sized>(
        &mut self,
        clock: SimulationClock,
        input: &InputState,
        renderer: &mut R,
    ) -> Result<FrameReport, KernelError> {
        let frame = self.frame + 1;
        let span = tracing::info_span!("frame", n = frame, t = clock.elapsed_time);
        let _enter = span.enter();

        let player_pos = self.player_transform()?.position;
        self.follow.update(&mut self.rig.gameplay, player_pos);

        let spawned = self
            .scheduler
            .update(&clock, &mut self.world, &mut self.physics)?;

        let (next, effects) = debug_mode::transition(self.debug, input.is_pressed(Key::C));
        self.debug = next;
        let mode_change = if effects.is_empty() {
            None
        } else {
            debug_mode::apply_effects(&effects, &mut self.rig, &mut self.aids);
            tracing::info!(mode = ?next.mode, "debug mode toggled");
            Some(next.mode)
        };

        self.pick(input);

        let commands = self
            .character
            .update(input, self.rig.active_camera().yaw(), player_pos);
        self.apply_character(&commands, clock.delta as f32)?;

        PhysicsSyncBridge::push(&self.world, &mut self.physics)?;

        let mut sound_cues = Vec::new();
        if self.music_pending && self.rig.listener().is_some() {
            self.music_pending = false;
            tracing::info!(volume = MUSIC_VOLUME, "background music started");
            sound_cues.push(SoundCue::Music {
                looped: true,
                volume: MUSIC_VOLUME,
            });
        }
        let jumped = self
            .ground
            .try_jump(clock.elapsed_time, input.is_pressed(Key::Space));
        if jumped {
            self.physics
                .apply_impulse(self.player_body, Vec3::Y * self.config.jump.impulse)?;
            sound_cues.push(SoundCue::Jump);
        }
        self.physics
            .apply_force(self.player_body, Vec3::NEG_Y * self.config.jump.gravity_bias)?;

        self.physics.step(clock.delta as f32);

        let contacts = self
            .physics
            .query_contacts(&[self.terrain_body, self.player_body]);
        self.ground.observe_contact(
            clock.elapsed_time,
            contacts.contains(self.terrain_body, self.player_body),
        );

        PhysicsSyncBridge::pull(&mut self.world, &self.physics)?;

        if let Some(particles) = self.particles.as_mut() {
            particles.advance(clock.delta as f32);
        }
        self.render(clock.elapsed_time, renderer);

        tracing::debug!(
            live = self.scheduler.live_count(),
            grounded = self.ground.is_grounded(),
            "frame done"
        );

        Ok(FrameReport {
            frame,
            clock,
            spawned,
            jumped,
            grounded: self.ground.is_grounded(),
            mode_change,
            sound_cues,
            events: self.world.drain_events(),
        })
    }

    fn pick(&mut self, input: &InputState) {
        let camera = self.rig.active_camera();
        self.hover_marker = input
            .pointer
            .and_then(|ndc| self.terrain.raycast(&camera.ray_from_ndc(ndc)));
        if let Some(ndc) = input.click {
            match self.terrain.raycast(&camera.ray_from_ndc(ndc)) {
                Some(target) => self.character.set_click_target(target),
                None => tracing::debug!("click missed terrain"),
            }
        }
    }

    fn apply_character(&mut self, commands: &CharacterCommands, delta: f32) -> Result<(), KernelError> {
        let data = self
            .world
            .get_mut(self.player)
            .ok_or(KernelError::EntityNotFound(self.player))?;
        self.character.apply(commands, &mut data.transform, delta);
        Ok(())
    }

    fn render<R: RenderBackend + ?Sized>(&self, elapsed: f64, renderer: &mut R) {
        renderer.clear(ClearFlags::ALL);
        renderer.render_pass(&RenderPass {
            layer: SceneLayer::World(RenderView::from(self.rig.active_camera())),
            world: &self.world,
            aids: self.aids,
            hover_marker: self.hover_marker,
            particles: self.particles,
            sprite: None,
        });
        renderer.clear(ClearFlags::DEPTH);
        renderer.render_pass(&RenderPass {
            layer: SceneLayer::Overlay(self.rig.overlay),
            world: &self.world,
            aids: self.aids,
            hover_marker: None,
            particles: None,
            sprite: self.sprite.map(|tween| tween.position(elapsed)),
        });
    }

    /// Viewport size changed.
    pub fn resize<R: RenderBackend + ?Sized>(&mut self, width: u32, height: u32, renderer: &mut R) {
        renderer.resize_to_viewport(width, height);
        self.rig.resize(width, height);
    }

    /// Start a manipulation window. Orbit controls pause until release.
    pub fn begin_drag(&mut self, id: EntityId) -> Result<(), KernelError> {
        PhysicsSyncBridge::begin_manipulation(&mut self.world, id)?;
        self.rig.orbit.enabled = false;
        Ok(())
    }

    pub fn drag_to(&mut self, id: EntityId, transform: Transform) -> Result<(), KernelError> {
        PhysicsSyncBridge::manipulate(&mut self.world, id, transform)
    }

    /// Release a dragged entity at its current pose.
    pub fn end_drag(&mut self, id: EntityId) -> Result<Transform, KernelError> {
        let released = PhysicsSyncBridge::end_manipulation(&mut self.world, &mut self.physics, id)?;
        self.rig.orbit.enabled = true;
        Ok(released)
    }

    /// Remove a dynamic body. Returns `false` if it was not live.
    pub fn despawn(&mut self, id: EntityId) -> Result<bool, KernelError> {
        Ok(self
            .scheduler
            .despawn(id, &mut self.world, &mut self.physics)?)
    }

    pub fn player_transform(&self) -> Result<Transform, KernelError> {
        self.world
            .transform(self.player)
            .ok_or(KernelError::EntityNotFound(self.player))
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn clock(&self) -> SimulationClock {
        self.clock.now()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn scheduler(&self) -> &EntitySpawnScheduler {
        &self.scheduler
    }

    pub fn character(&self) -> &CharacterController {
        &self.character
    }

    pub fn ground(&self) -> &GroundContactTracker {
        &self.ground
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }

    pub fn debug_mode(&self) -> DebugMode {
        self.debug.mode
    }

    pub fn aids(&self) -> SceneAids {
        self.aids
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn avatar(&self) -> Option<EntityId> {
        self.avatar
    }

    pub fn hover_marker(&self) -> Option<Vec3> {
        self.hover_marker
    }

    pub fn sprite(&self) -> Option<SpriteTween> {
        self.sprite
    }

    pub fn particles(&self) -> Option<ParticleField> {
        self.particles
    }
}
