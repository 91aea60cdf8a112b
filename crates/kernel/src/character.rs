//! Maps directional keys and click-to-move targets into locomotion commands.

use glam::Vec3;
use playfield_common::{Transform, planar, yaw_of};
use playfield_input::{InputState, MoveDirection};

use crate::config::PlayerConfig;

/// Directional locomotion for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Locomotion {
    Stop,
    /// Face `yaw` and walk forward along it.
    Move { yaw: f32 },
}

/// Everything the controller decided this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterCommands {
    pub locomotion: Locomotion,
    /// Point to walk toward while a click target is pending.
    pub seek: Option<Vec3>,
    /// The pending click target was reached and cleared this frame.
    pub arrived: bool,
}

/// Player intent: current heading plus an optional pending click target.
#[derive(Debug, Clone)]
pub struct CharacterController {
    pub walk_speed: f32,
    pub arrival_threshold: f32,
    heading: Option<MoveDirection>,
    click_target: Option<Vec3>,
}

impl CharacterController {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            walk_speed: config.walk_speed,
            arrival_threshold: config.arrival_threshold,
            heading: None,
            click_target: None,
        }
    }

    pub fn heading(&self) -> Option<MoveDirection> {
        self.heading
    }

    pub fn click_target(&self) -> Option<Vec3> {
        self.click_target
    }

    /// Replace any pending target.
    pub fn set_click_target(&mut self, target: Vec3) {
        tracing::debug!(x = target.x, z = target.z, "click target");
        self.click_target = Some(target);
    }

    pub fn clear_click_target(&mut self) {
        self.click_target = None;
    }

    /// Decide this frame's commands. `camera_yaw` is the active camera's
    /// heading on the ground plane.
    pub fn update(&mut self, input: &InputState, camera_yaw: f32, position: Vec3) -> CharacterCommands {
        self.heading = MoveDirection::from_input(input);
        let locomotion = match self.heading {
            None => Locomotion::Stop,
            Some(dir) => Locomotion::Move {
                yaw: camera_yaw + dir.heading_offset(),
            },
        };

        let mut arrived = false;
        let seek = match self.click_target {
            Some(target) if planar(target - position).length() < self.arrival_threshold => {
                self.click_target = None;
                arrived = true;
                None
            }
            other => other,
        };

        CharacterCommands {
            locomotion,
            seek,
            arrived,
        }
    }

    /// Move the player pose by one frame of commands. Directional facing
    /// overrides the seek facing when both are active.
    pub fn apply(&self, commands: &CharacterCommands, pose: &mut Transform, delta: f32) {
        let step = self.walk_speed * delta;

        if let Some(target) = commands.seek {
            let to_target = planar(target - pose.position);
            let distance = to_target.length();
            if distance > f32::EPSILON {
                let dir = to_target / distance;
                pose.position += dir * step.min(distance);
                if commands.locomotion == Locomotion::Stop {
                    *pose = pose.with_yaw(yaw_of(dir));
                }
            }
        }

        if let Locomotion::Move { yaw } = commands.locomotion {
            *pose = pose.with_yaw(yaw);
            pose.position += Vec3::new(yaw.sin(), 0.0, yaw.cos()) * step;
        }
    }
}
