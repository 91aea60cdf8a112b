use std::collections::BTreeMap;

use glam::Vec3;
use playfield_common::Transform;

use super::{BodyHandle, Collider, ContactSet, PhysicsBackend, PhysicsError};

/// Contacts are reported while a body rests within this distance of the ground.
const CONTACT_SLOP: f32 = 0.05;

#[derive(Debug, Clone)]
struct Body {
    collider: Collider,
    /// Zero for static bodies.
    inverse_mass: f32,
    pose: Transform,
    velocity: Vec3,
    force: Vec3,
}

/// Minimal reference backend: dynamic bodies are point masses falling onto
/// ground planes. Bodies do not collide with each other.
///
/// Good enough for headless runs and tests; real hosts plug in a full solver.
#[derive(Debug)]
pub struct PointMassPhysics {
    gravity: Vec3,
    max_fall_speed: f32,
    bodies: BTreeMap<BodyHandle, Body>,
    next_handle: u32,
    contacts: ContactSet,
}

impl PointMassPhysics {
    pub fn new(gravity: Vec3) -> Result<Self, PhysicsError> {
        if !gravity.is_finite() {
            return Err(PhysicsError::InitFailed(format!(
                "gravity must be finite, got {gravity}"
            )));
        }
        Ok(Self {
            gravity,
            max_fall_speed: 200.0,
            bodies: BTreeMap::new(),
            next_handle: 0,
            contacts: ContactSet::new(),
        })
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn velocity(&self, body: BodyHandle) -> Result<Vec3, PhysicsError> {
        self.get(body).map(|b| b.velocity)
    }

    fn get(&self, body: BodyHandle) -> Result<&Body, PhysicsError> {
        self.bodies.get(&body).ok_or(PhysicsError::UnknownBody(body))
    }

    fn get_mut(&mut self, body: BodyHandle) -> Result<&mut Body, PhysicsError> {
        self.bodies
            .get_mut(&body)
            .ok_or(PhysicsError::UnknownBody(body))
    }

    fn ground_planes(&self) -> Vec<(BodyHandle, f32)> {
        self.bodies
            .iter()
            .filter_map(|(handle, body)| match body.collider {
                Collider::Ground { height } => Some((*handle, height)),
                _ => None,
            })
            .collect()
    }
}

impl PhysicsBackend for PointMassPhysics {
    fn add_body(
        &mut self,
        collider: Collider,
        mass: f32,
        pose: &Transform,
    ) -> Result<BodyHandle, PhysicsError> {
        if !(mass >= 0.0) || !mass.is_finite() {
            return Err(PhysicsError::InvalidMass(mass));
        }
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        let inverse_mass = if mass == 0.0 { 0.0 } else { 1.0 / mass };
        self.bodies.insert(
            handle,
            Body {
                collider,
                inverse_mass,
                pose: *pose,
                velocity: Vec3::ZERO,
                force: Vec3::ZERO,
            },
        );
        Ok(handle)
    }

    fn remove_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError> {
        self.bodies
            .remove(&body)
            .map(|_| ())
            .ok_or(PhysicsError::UnknownBody(body))
    }

    fn step(&mut self, delta: f32) {
        let grounds = self.ground_planes();
        let mut contacts = ContactSet::new();

        for (handle, body) in self.bodies.iter_mut() {
            if body.inverse_mass == 0.0 {
                body.force = Vec3::ZERO;
                continue;
            }
            let accel = self.gravity + body.force * body.inverse_mass;
            body.velocity += accel * delta;
            body.velocity.y = body.velocity.y.max(-self.max_fall_speed);
            body.pose.position += body.velocity * delta;
            body.force = Vec3::ZERO;

            let half = body.collider.half_height();
            for (ground, height) in &grounds {
                let bottom = body.pose.position.y - half;
                if bottom <= *height + CONTACT_SLOP {
                    if bottom < *height {
                        body.pose.position.y = height + half;
                    }
                    if body.velocity.y < 0.0 {
                        body.velocity.y = 0.0;
                    }
                    contacts.insert(*handle, *ground);
                }
            }
        }

        self.contacts = contacts;
    }

    fn set_body_pose(&mut self, body: BodyHandle, pose: &Transform) -> Result<(), PhysicsError> {
        self.get_mut(body)?.pose = *pose;
        Ok(())
    }

    fn body_pose(&self, body: BodyHandle) -> Result<Transform, PhysicsError> {
        self.get(body).map(|b| b.pose)
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec3) -> Result<(), PhysicsError> {
        self.get_mut(body)?.force += force;
        Ok(())
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3) -> Result<(), PhysicsError> {
        let b = self.get_mut(body)?;
        b.velocity += impulse * b.inverse_mass;
        Ok(())
    }

    fn query_contacts(&self, subset: &[BodyHandle]) -> ContactSet {
        let mut out = ContactSet::new();
        for (i, a) in subset.iter().enumerate() {
            for b in &subset[i + 1..] {
                if self.contacts.contains(*a, *b) {
                    out.insert(*a, *b);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> PointMassPhysics {
        PointMassPhysics::new(Vec3::new(0.0, -10.0, 0.0)).unwrap()
    }

    #[test]
    fn rejects_non_finite_gravity() {
        let err = PointMassPhysics::new(Vec3::new(0.0, f32::NAN, 0.0)).unwrap_err();
        assert!(matches!(err, PhysicsError::InitFailed(_)));
    }

    #[test]
    fn dynamic_body_falls_and_lands() {
        let mut w = world();
        let ground = w
            .add_body(Collider::Ground { height: 0.0 }, 0.0, &Transform::default())
            .unwrap();
        let ball = w
            .add_body(
                Collider::Sphere { radius: 1.0 },
                1.0,
                &Transform::from_position(Vec3::new(0.0, 5.0, 0.0)),
            )
            .unwrap();

        w.step(0.1);
        assert!(w.body_pose(ball).unwrap().position.y < 5.0);
        assert!(w.query_contacts(&[ground, ball]).is_empty());

        for _ in 0..100 {
            w.step(0.1);
        }
        let y = w.body_pose(ball).unwrap().position.y;
        assert!((y - 1.0).abs() < 1e-4, "resting height {y}");
        assert!(w.query_contacts(&[ground, ball]).contains(ground, ball));
        // static ground never moves
        assert_eq!(w.body_pose(ground).unwrap(), Transform::default());
    }

    #[test]
    fn impulse_scales_with_inverse_mass() {
        let mut w = world();
        let body = w
            .add_body(Collider::Sphere { radius: 1.0 }, 4.0, &Transform::default())
            .unwrap();
        w.apply_impulse(body, Vec3::new(0.0, 8.0, 0.0)).unwrap();
        assert_eq!(w.velocity(body).unwrap(), Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn contact_query_respects_subset() {
        let mut w = world();
        let ground = w
            .add_body(Collider::Ground { height: 0.0 }, 0.0, &Transform::default())
            .unwrap();
        let a = w
            .add_body(Collider::Sphere { radius: 1.0 }, 1.0, &Transform::from_position(Vec3::Y))
            .unwrap();
        let b = w
            .add_body(Collider::Sphere { radius: 1.0 }, 1.0, &Transform::from_position(Vec3::Y))
            .unwrap();
        w.step(0.01);
        assert_eq!(w.query_contacts(&[ground, a]).len(), 1);
        assert!(!w.query_contacts(&[ground, a]).contains(ground, b));
    }

    #[test]
    fn unknown_and_removed_bodies() {
        let mut w = world();
        let body = w
            .add_body(Collider::Sphere { radius: 1.0 }, 1.0, &Transform::default())
            .unwrap();
        w.remove_body(body).unwrap();
        assert!(matches!(w.body_pose(body), Err(PhysicsError::UnknownBody(_))));
        assert!(w.remove_body(body).is_err());
        assert!(matches!(
            w.add_body(Collider::Sphere { radius: 1.0 }, -1.0, &Transform::default()),
            Err(PhysicsError::InvalidMass(_))
        ));
    }
}
