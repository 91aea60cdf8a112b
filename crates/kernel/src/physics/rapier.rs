use std::collections::BTreeMap;
use std::fmt;

use glam::{Quat, Vec3};
use playfield_common::Transform;
use rapier3d::na::{Isometry3, Quaternion, Translation3, UnitQuaternion, Vector3};
use rapier3d::prelude::*;

use super::{BodyHandle, Collider, ContactSet, PhysicsBackend, PhysicsError};

/// Rigid body solver backed by rapier3d.
///
/// Every `Collider` maps to the matching rapier shape; the ground is a
/// half-space so nothing tunnels below it.
pub struct RapierPhysics {
    gravity: Vector3<f32>,
    integration: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    handles: BTreeMap<BodyHandle, Entry>,
    next_handle: u32,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    scale: Vec3,
}

impl fmt::Debug for RapierPhysics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RapierPhysics")
            .field("gravity", &self.gravity)
            .field("bodies", &self.handles.len())
            .finish()
    }
}

impl RapierPhysics {
    pub fn new(gravity: Vec3) -> Result<Self, PhysicsError> {
        if !gravity.is_finite() {
            return Err(PhysicsError::InitFailed(format!(
                "gravity must be finite, got {gravity}"
            )));
        }
        Ok(Self {
            gravity: vector![gravity.x, gravity.y, gravity.z],
            integration: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            handles: BTreeMap::new(),
            next_handle: 0,
        })
    }

    pub fn body_count(&self) -> usize {
        self.handles.len()
    }

    pub fn velocity(&self, body: BodyHandle) -> Result<Vec3, PhysicsError> {
        let v = self.rigid_body(body)?.linvel();
        Ok(Vec3::new(v.x, v.y, v.z))
    }

    fn entry(&self, body: BodyHandle) -> Result<Entry, PhysicsError> {
        self.handles
            .get(&body)
            .copied()
            .ok_or(PhysicsError::UnknownBody(body))
    }

    fn rigid_body(&self, body: BodyHandle) -> Result<&RigidBody, PhysicsError> {
        let entry = self.entry(body)?;
        self.bodies
            .get(entry.body)
            .ok_or(PhysicsError::UnknownBody(body))
    }

    fn rigid_body_mut(&mut self, body: BodyHandle) -> Result<&mut RigidBody, PhysicsError> {
        let entry = self.entry(body)?;
        self.bodies
            .get_mut(entry.body)
            .ok_or(PhysicsError::UnknownBody(body))
    }
}

fn isometry(pose: &Transform) -> Isometry3<f32> {
    let p = pose.position;
    let q = pose.rotation.normalize();
    Isometry3::from_parts(
        Translation3::new(p.x, p.y, p.z),
        UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z)),
    )
}

fn shape(collider: Collider) -> ColliderBuilder {
    match collider {
        Collider::Sphere { radius } => ColliderBuilder::ball(radius),
        Collider::Box { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
        Collider::Cylinder { radius, height } => ColliderBuilder::cylinder(height * 0.5, radius),
        Collider::Cone { radius, height } => ColliderBuilder::cone(height * 0.5, radius),
        Collider::Human { half_extents } => {
            let radius = half_extents.x.min(half_extents.z);
            if half_extents.y > radius {
                ColliderBuilder::capsule_y(half_extents.y - radius, radius)
            } else {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
        }
        Collider::Ground { .. } => ColliderBuilder::halfspace(Vector3::y_axis()),
    }
}

impl PhysicsBackend for RapierPhysics {
    fn add_body(
        &mut self,
        collider: Collider,
        mass: f32,
        pose: &Transform,
    ) -> Result<BodyHandle, PhysicsError> {
        if !(mass >= 0.0) || !mass.is_finite() {
            return Err(PhysicsError::InvalidMass(mass));
        }
        if !pose.position.is_finite() || !pose.rotation.is_finite() {
            return Err(PhysicsError::InitFailed(format!(
                "non-finite pose at {}",
                pose.position
            )));
        }

        let mut position = isometry(pose);
        if let Collider::Ground { height } = collider {
            // the plane sits at its own height regardless of the entity pose
            position = Isometry3::translation(pose.position.x, height, pose.position.z);
        }

        let builder = if mass == 0.0 {
            RigidBodyBuilder::fixed()
        } else if matches!(collider, Collider::Human { .. }) {
            RigidBodyBuilder::dynamic().lock_rotations()
        } else {
            RigidBodyBuilder::dynamic()
        };
        let body = self.bodies.insert(builder.position(position).build());

        let mut shape = shape(collider);
        if mass > 0.0 {
            shape = shape.mass(mass);
        }
        let collider = self
            .colliders
            .insert_with_parent(shape.build(), body, &mut self.bodies);

        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.handles.insert(
            handle,
            Entry {
                body,
                collider,
                scale: pose.scale,
            },
        );
        Ok(handle)
    }

    fn remove_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError> {
        let entry = self
            .handles
            .remove(&body)
            .ok_or(PhysicsError::UnknownBody(body))?;
        self.bodies.remove(
            entry.body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        Ok(())
    }

    fn step(&mut self, delta: f32) {
        if !(delta > 0.0) {
            return;
        }
        self.integration.dt = delta;
        self.pipeline.step(
            &self.gravity,
            &self.integration,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
        }
    }

    fn set_body_pose(&mut self, body: BodyHandle, pose: &Transform) -> Result<(), PhysicsError> {
        let scale = pose.scale;
        self.rigid_body_mut(body)?.set_position(isometry(pose), true);
        if let Some(entry) = self.handles.get_mut(&body) {
            entry.scale = scale;
        }
        Ok(())
    }

    fn body_pose(&self, body: BodyHandle) -> Result<Transform, PhysicsError> {
        let entry = self.entry(body)?;
        let rb = self.rigid_body(body)?;
        let t = rb.translation();
        let q = rb.rotation();
        Ok(Transform {
            position: Vec3::new(t.x, t.y, t.z),
            rotation: Quat::from_xyzw(q.i, q.j, q.k, q.w),
            scale: entry.scale,
        })
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec3) -> Result<(), PhysicsError> {
        self.rigid_body_mut(body)?
            .add_force(vector![force.x, force.y, force.z], true);
        Ok(())
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3) -> Result<(), PhysicsError> {
        self.rigid_body_mut(body)?
            .apply_impulse(vector![impulse.x, impulse.y, impulse.z], true);
        Ok(())
    }

    fn query_contacts(&self, subset: &[BodyHandle]) -> ContactSet {
        let mut out = ContactSet::new();
        for (i, a) in subset.iter().enumerate() {
            let Ok(ea) = self.entry(*a) else { continue };
            for b in &subset[i + 1..] {
                let Ok(eb) = self.entry(*b) else { continue };
                let touching = self
                    .narrow_phase
                    .contact_pair(ea.collider, eb.collider)
                    .is_some_and(|pair| pair.has_any_active_contact);
                if touching {
                    out.insert(*a, *b);
                }
            }
        }
        out
    }
}
