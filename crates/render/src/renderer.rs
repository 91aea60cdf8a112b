use std::fmt::Write as _;

use playfield_kernel::{ClearFlags, EntityKind, RenderBackend, RenderPass, SceneLayer};

/// Text renderer standing in for a GPU backend.
///
/// Each frame is written as human-readable lines. A frame starts at a full
/// clear and completes with its overlay pass.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    viewport: (u32, u32),
    current: String,
    last: String,
    passes: usize,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self {
            viewport: (1280, 720),
            ..Self::default()
        }
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Output of the most recently completed frame.
    pub fn last_frame(&self) -> &str {
        &self.last
    }

    /// Total render passes drawn since creation.
    pub fn pass_count(&self) -> usize {
        self.passes
    }
}

fn kind_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Terrain => "terrain",
        EntityKind::Prop => "prop",
        EntityKind::Player => "player",
        EntityKind::Avatar => "avatar",
        EntityKind::Dynamic => "dynamic",
    }
}

impl RenderBackend for DebugTextRenderer {
    fn resize_to_viewport(&mut self, width: u32, height: u32) {
        tracing::debug!(width, height, "viewport resized");
        self.viewport = (width, height);
    }

    fn clear(&mut self, flags: ClearFlags) {
        if flags == ClearFlags::ALL {
            self.current.clear();
        }
        let _ = writeln!(
            self.current,
            "clear color={} depth={} stencil={}",
            flags.color, flags.depth, flags.stencil
        );
    }

    fn render_pass(&mut self, pass: &RenderPass<'_>) {
        self.passes += 1;
        let out = &mut self.current;
        match pass.layer {
            SceneLayer::World(view) => {
                let _ = writeln!(
                    out,
                    "=== World pass ({}x{}) ===",
                    self.viewport.0, self.viewport.1
                );
                let _ = writeln!(
                    out,
                    "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
                    view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z,
                    view.fov_degrees
                );
                let _ = writeln!(
                    out,
                    "Aids: grid={} axis={} frustum={}",
                    pass.aids.grid, pass.aids.axis, pass.aids.frustum_helper
                );
                if let Some(m) = pass.hover_marker {
                    let _ = writeln!(out, "Marker: ({:.2}, {:.2}, {:.2})", m.x, m.y, m.z);
                }
                if let Some(field) = pass.particles {
                    let _ = writeln!(out, "Particles: {} yaw={:.3}", field.count, field.yaw());
                }
                let _ = writeln!(out, "Entities: {}", pass.world.entity_count());
                for (id, data) in pass.world.entities() {
                    if matches!(data.kind, EntityKind::Terrain | EntityKind::Prop) {
                        continue;
                    }
                    let p = data.transform.position;
                    let _ = writeln!(
                        out,
                        "  [{}] {:<7} pos=({:.2}, {:.2}, {:.2}){}",
                        id.short(),
                        kind_label(data.kind),
                        p.x,
                        p.y,
                        p.z,
                        if data.ignore_physics { " (held)" } else { "" }
                    );
                }
            }
            SceneLayer::Overlay(camera) => {
                let _ = writeln!(out, "=== Overlay pass ({}x{}) ===", camera.width, camera.height);
                if let Some(anchor) = pass.sprite {
                    let _ = writeln!(out, "Sprite: ({:.3}, {:.3})", anchor.x, anchor.y);
                }
                self.last.clone_from(&self.current);
            }
        }
    }
}
