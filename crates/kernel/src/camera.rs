//! Gameplay and debug cameras, the active-camera selector, and the follow clamp.

use glam::{Mat4, Vec2, Vec3};
use playfield_common::{planar, yaw_of};

use crate::config::CameraConfig;

/// Perspective camera aimed at a target point.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            fov_y: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 1000.0,
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(Vec3::Z)
    }

    /// Heading of the view direction on the ground plane.
    pub fn yaw(&self) -> f32 {
        yaw_of(planar(self.forward()))
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a normalized viewport point.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray {
            origin: near,
            direction: (far - near).try_normalize().unwrap_or(self.forward()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Forward hit with the horizontal plane `y = height`.
    pub fn intersect_plane_y(&self, height: f32) -> Option<Vec3> {
        if self.direction.y.abs() < f32::EPSILON {
            return None;
        }
        let t = (height - self.origin.y) / self.direction.y;
        (t >= 0.0).then(|| self.origin + self.direction * t)
    }
}

/// Orbit/zoom around a target, driven by the host's pointer gestures.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub enabled: bool,
    pub target: Vec3,
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            enabled: true,
            target,
        }
    }

    /// Rotate the camera about the target. Ignored while disabled.
    pub fn orbit(&self, camera: &mut Camera, d_azimuth: f32, d_elevation: f32) {
        if !self.enabled {
            return;
        }
        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let azimuth = offset.x.atan2(offset.z) + d_azimuth;
        let limit = 89.0_f32.to_radians();
        let elevation = ((offset.y / radius).asin() + d_elevation).clamp(-limit, limit);
        camera.position = self.target
            + radius
                * Vec3::new(
                    elevation.cos() * azimuth.sin(),
                    elevation.sin(),
                    elevation.cos() * azimuth.cos(),
                );
        camera.look_at(self.target);
    }

    /// Scale the distance to the target. `factor < 1` moves closer.
    pub fn zoom(&self, camera: &mut Camera, factor: f32) {
        if !self.enabled || factor <= 0.0 {
            return;
        }
        camera.position = self.target + (camera.position - self.target) * factor;
        camera.look_at(self.target);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraId {
    Gameplay,
    Debug,
}

/// Screen-space camera for the overlay pass, sized in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayCamera {
    pub width: u32,
    pub height: u32,
}

/// Both cameras plus the selector used for rendering and audio.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub gameplay: Camera,
    pub debug: Camera,
    pub orbit: OrbitControls,
    pub overlay: OverlayCamera,
    active: CameraId,
    listener: Option<CameraId>,
}

impl CameraRig {
    /// Starts in debug view with the listener on the debug camera.
    pub fn new(config: &CameraConfig) -> Self {
        let mut gameplay = Camera::new(config.gameplay_eye, config.gameplay_look_at);
        gameplay.fov_y = config.fov_y_degrees.to_radians();
        let mut debug = Camera::new(config.debug_eye, config.debug_look_at);
        debug.fov_y = config.fov_y_degrees.to_radians();
        debug.far = config.debug_far;
        Self {
            gameplay,
            debug,
            orbit: OrbitControls::new(config.debug_look_at),
            overlay: OverlayCamera {
                width: 1280,
                height: 720,
            },
            active: CameraId::Debug,
            listener: Some(CameraId::Debug),
        }
    }

    pub fn active(&self) -> CameraId {
        self.active
    }

    pub fn active_camera(&self) -> &Camera {
        self.camera(self.active)
    }

    pub fn camera(&self, id: CameraId) -> &Camera {
        match id {
            CameraId::Gameplay => &self.gameplay,
            CameraId::Debug => &self.debug,
        }
    }

    /// Camera the audio listener is parented to.
    pub fn listener(&self) -> Option<CameraId> {
        self.listener
    }

    pub(crate) fn activate(&mut self, id: CameraId) {
        self.active = id;
    }

    pub(crate) fn detach_listener(&mut self, from: CameraId) {
        if self.listener == Some(from) {
            self.listener = None;
        }
    }

    pub(crate) fn attach_listener(&mut self, to: CameraId) {
        self.listener = Some(to);
    }

    /// Debug camera orbit driven by host gestures.
    pub fn orbit_debug(&mut self, d_azimuth: f32, d_elevation: f32) {
        self.orbit.orbit(&mut self.debug, d_azimuth, d_elevation);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gameplay.set_aspect(width, height);
        self.debug.set_aspect(width, height);
        self.overlay = OverlayCamera { width, height };
    }
}

/// Keeps the gameplay camera aimed at the player and within a planar leash.
#[derive(Debug, Clone)]
pub struct CameraFollowController {
    pub max_distance: f32,
    pub look_height: f32,
}

impl CameraFollowController {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            max_distance: config.follow_distance,
            look_height: config.look_height,
        }
    }

    pub fn update(&self, camera: &mut Camera, player: Vec3) {
        camera.look_at(player + Vec3::Y * self.look_height);

        let offset = planar(player - camera.position);
        let distance = offset.length();
        if distance > self.max_distance {
            let pull = offset / distance * self.max_distance;
            camera.position = Vec3::new(player.x - pull.x, camera.position.y, player.z - pull.z);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn follow() -> CameraFollowController {
        CameraFollowController::new(&CameraConfig::default())
    }

    fn planar_distance(a: Vec3, b: Vec3) -> f32 {
        planar(a - b).length()
    }

    #[test]
    fn far_player_is_clamped_exactly() {
        let mut cam = Camera::new(Vec3::new(0.0, 50.0, -150.0), Vec3::ZERO);
        let player = Vec3::new(30.0, 20.0, 40.0);
        follow().update(&mut cam, player);
        assert!((planar_distance(cam.position, player) - 100.0).abs() < 1e-3);
        assert_eq!(cam.position.y, 50.0);
        assert_eq!(cam.target, Vec3::new(30.0, 30.0, 40.0));
    }

    #[test]
    fn near_player_leaves_camera_in_place() {
        let start = Vec3::new(0.0, 50.0, -60.0);
        let mut cam = Camera::new(start, Vec3::ZERO);
        follow().update(&mut cam, Vec3::new(10.0, 0.0, 10.0));
        assert_eq!(cam.position, start);
    }

    #[test]
    fn clamp_holds_for_many_positions() {
        let f = follow();
        let mut cam = Camera::new(Vec3::new(0.0, 50.0, -150.0), Vec3::ZERO);
        for i in 0..200 {
            let a = i as f32 * 0.37;
            let r = (i % 17) as f32 * 40.0;
            let player = Vec3::new(a.cos() * r, (i % 5) as f32, a.sin() * r);
            let before = cam.position;
            let within = planar_distance(before, player) <= f.max_distance;
            f.update(&mut cam, player);
            assert!(planar_distance(cam.position, player) <= f.max_distance + 1e-3);
            if within {
                assert_eq!(cam.position, before);
            }
        }
    }

    #[test]
    fn camera_yaw_matches_view_direction() {
        let cam = Camera::new(Vec3::ZERO, Vec3::new(0.0, -3.0, 10.0));
        assert!(cam.yaw().abs() < 1e-6);
        let cam = Camera::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        assert!((cam.yaw() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn center_ray_hits_look_target_on_ground() {
        let cam = Camera::new(Vec3::new(0.0, 50.0, -50.0), Vec3::ZERO);
        let hit = cam.ray_from_ndc(Vec2::ZERO).intersect_plane_y(0.0).unwrap();
        assert!(hit.length() < 0.1, "hit {hit}");
    }

    #[test]
    fn ray_parallel_or_away_misses() {
        let ray = Ray {
            origin: Vec3::new(0.0, 10.0, 0.0),
            direction: Vec3::Y,
        };
        assert!(ray.intersect_plane_y(0.0).is_none());
        let flat = Ray {
            origin: Vec3::new(0.0, 10.0, 0.0),
            direction: Vec3::X,
        };
        assert!(flat.intersect_plane_y(0.0).is_none());
    }

    #[test]
    fn orbit_keeps_radius_and_respects_enabled() {
        let mut rig = CameraRig::new(&CameraConfig::default());
        let radius = (rig.debug.position - rig.orbit.target).length();
        rig.orbit_debug(0.5, 0.1);
        let after = (rig.debug.position - rig.orbit.target).length();
        assert!((radius - after).abs() < 1e-2);

        rig.orbit.enabled = false;
        let frozen = rig.debug.position;
        rig.orbit_debug(1.0, 0.0);
        assert_eq!(rig.debug.position, frozen);
    }

    #[test]
    fn rig_starts_in_debug_with_listener() {
        let rig = CameraRig::new(&CameraConfig::default());
        assert_eq!(rig.active(), CameraId::Debug);
        assert_eq!(rig.listener(), Some(CameraId::Debug));
        assert_eq!(rig.active_camera().far, 4000.0);
    }

    #[test]
    fn resize_updates_aspect_and_overlay() {
        let mut rig = CameraRig::new(&CameraConfig::default());
        rig.resize(800, 400);
        assert_eq!(rig.gameplay.aspect, 2.0);
        assert_eq!(rig.debug.aspect, 2.0);
        assert_eq!(rig.overlay, OverlayCamera { width: 800, height: 400 });
    }
}
