use glam::{Vec2, Vec3};

use crate::camera::{Camera, OverlayCamera};
use crate::debug_mode::SceneAids;
use crate::effects::ParticleField;
use crate::world::SimWorld;

/// Which buffers a clear touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearFlags {
    pub color: bool,
    pub depth: bool,
    pub stencil: bool,
}

impl ClearFlags {
    pub const ALL: Self = Self {
        color: true,
        depth: true,
        stencil: true,
    };
    pub const DEPTH: Self = Self {
        color: false,
        depth: true,
        stencil: false,
    };
}

/// Perspective view configuration for a world pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub far: f32,
}

impl From<&Camera> for RenderView {
    fn from(camera: &Camera) -> Self {
        Self {
            eye: camera.position,
            target: camera.target,
            fov_degrees: camera.fov_y.to_degrees(),
            aspect: camera.aspect,
            far: camera.far,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneLayer {
    /// 3D scene through the active camera.
    World(RenderView),
    /// Screen-space sprites and labels.
    Overlay(OverlayCamera),
}

/// One pass over the scene. The renderer reads, never writes.
#[derive(Debug, Clone, Copy)]
pub struct RenderPass<'a> {
    pub layer: SceneLayer,
    pub world: &'a SimWorld,
    pub aids: SceneAids,
    /// Terrain point under the pointer. World passes only.
    pub hover_marker: Option<Vec3>,
    /// Particle cloud drawn with the world. World passes only.
    pub particles: Option<ParticleField>,
    /// Anchor of the overlay sprite. Overlay passes only.
    pub sprite: Option<Vec2>,
}

/// Rendering collaborator driven by the frame orchestrator.
pub trait RenderBackend {
    fn resize_to_viewport(&mut self, width: u32, height: u32);
    fn clear(&mut self, flags: ClearFlags);
    fn render_pass(&mut self, pass: &RenderPass<'_>);
}
