use glam::Vec3;

use crate::camera::Ray;

/// Pick target for pointer rays.
pub trait Terrain {
    /// First point where `ray` meets the surface.
    fn raycast(&self, ray: &Ray) -> Option<Vec3>;
}

/// Infinite horizontal ground at a fixed height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatTerrain {
    pub height: f32,
}

impl Terrain for FlatTerrain {
    fn raycast(&self, ray: &Ray) -> Option<Vec3> {
        ray.intersect_plane_y(self.height)
    }
}
