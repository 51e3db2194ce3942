use glam::Vec2;
use rapier2d::na;
use rapier2d::prelude::*;

use crate::api::engine::{AnchorPin, BallSpec, CushionSpec, TableEngine};
use crate::api::types::BallId;
use crate::error::SetupError;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam to nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> na::Vector2<f32> {
    na::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &na::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Shape description for a collider.
#[derive(Debug, Clone)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    /// Convex polygon in body-local coordinates.
    ConvexPolygon { points: Vec<Vec2> },
}

impl ColliderDesc {
    fn build_collider(&self) -> Option<ColliderBuilder> {
        match self {
            ColliderDesc::Ball { radius } => Some(ColliderBuilder::ball(*radius)),
            ColliderDesc::ConvexPolygon { points } => {
                let points: Vec<Point<f32>> =
                    points.iter().map(|p| Point::new(p.x, p.y)).collect();
                ColliderBuilder::convex_hull(&points)
            }
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    /// Total collider mass. Ignored for fixed bodies.
    pub mass: f32,
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub dynamic: bool,
    pub position: Vec2,
    pub ccd: bool,
    pub collider: ColliderDesc,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            dynamic: true,
            position: Vec2::ZERO,
            ccd: false,
            collider,
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            dynamic: false,
            position: Vec2::ZERO,
            ccd: false,
            collider,
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }
}

/// Handle pair referencing Rapier internals.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// A ball body together with the pin holding it.
#[derive(Debug, Clone, Copy)]
struct PinnedBall {
    id: BallId,
    body: PhysicsBody,
    pin: AnchorPin,
    anchor: Vec2,
    mass: f32,
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps the Rapier2D pipeline for a top-down table: zero gravity, balls with
/// locked rotation, static cushions.
pub struct PhysicsWorld {
    gravity: na::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    balls: Vec<PinnedBall>,
    cushions: Vec<PhysicsBody>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            gravity: na::Vector2::zeros(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            balls: Vec::with_capacity(16),
            cushions: Vec::with_capacity(6),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Create a rigid body + collider and return handles.
    /// Returns `None` when the collider shape is degenerate.
    pub fn create_body(&mut self, desc: &BodyDesc, material: ColliderMaterial) -> Option<PhysicsBody> {
        let builder = desc.collider.build_collider()?;

        let rb = if desc.dynamic {
            RigidBodyBuilder::dynamic()
                .translation(vec2_to_na(desc.position))
                .locked_axes(LockedAxes::ROTATION_LOCKED)
                .ccd_enabled(desc.ccd)
                .build()
        } else {
            RigidBodyBuilder::fixed()
                .translation(vec2_to_na(desc.position))
                .build()
        };
        let body_handle = self.bodies.insert(rb);

        let mut builder = builder
            .restitution(material.restitution)
            .restitution_combine_rule(CoefficientCombineRule::Average)
            .friction(material.friction);
        if desc.dynamic {
            builder = builder.mass(material.mass);
        }

        let collider_handle =
            self.colliders
                .insert_with_parent(builder.build(), body_handle, &mut self.bodies);

        Some(PhysicsBody {
            body_handle,
            collider_handle,
        })
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Number of rigid bodies in the simulation, cushions included.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn cushion_count(&self) -> usize {
        self.cushions.len()
    }

    /// Run the pins, then one pipeline step.
    fn step_pipeline(&mut self) {
        let dt = self.integration_parameters.dt;
        for ball in &self.balls {
            if let Some(rb) = self.bodies.get_mut(ball.body.body_handle) {
                let vel = na_to_vec2(rb.linvel());
                let to_anchor = ball.anchor - na_to_vec2(rb.translation());
                let corrected = ball.pin.correct(vel, to_anchor, ball.mass, dt);
                if corrected != vel {
                    rb.set_linvel(vec2_to_na(corrected), false);
                }
            }
        }

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn ball_index(&self, id: BallId) -> usize {
        self.balls
            .iter()
            .position(|b| b.id == id)
            .unwrap_or_else(|| panic!("ball {:?} is not in the physics world", id))
    }

    fn rigid_body(&self, id: BallId) -> &RigidBody {
        let handle = self.balls[self.ball_index(id)].body.body_handle;
        &self.bodies[handle]
    }

    fn rigid_body_mut(&mut self, id: BallId) -> &mut RigidBody {
        let handle = self.balls[self.ball_index(id)].body.body_handle;
        &mut self.bodies[handle]
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TableEngine for PhysicsWorld {
    fn add_ball(&mut self, spec: &BallSpec) -> Result<(), SetupError> {
        if self.contains(spec.id) {
            return Err(SetupError::DuplicateBall(spec.id));
        }
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: spec.radius })
            .with_position(spec.position)
            .with_ccd(true);
        let material = ColliderMaterial {
            restitution: spec.elasticity,
            friction: 0.0,
            mass: spec.mass,
        };
        let body = self
            .create_body(&desc, material)
            .ok_or_else(|| SetupError::invalid_config(format!("ball {:?} has no shape", spec.id)))?;
        self.balls.push(PinnedBall {
            id: spec.id,
            body,
            pin: spec.pin,
            anchor: spec.position,
            mass: spec.mass,
        });
        Ok(())
    }

    fn add_cushion(&mut self, spec: &CushionSpec) -> Result<(), SetupError> {
        let desc = BodyDesc::fixed(ColliderDesc::ConvexPolygon {
            points: spec.points.clone(),
        });
        let material = ColliderMaterial {
            restitution: spec.elasticity,
            friction: 0.0,
            mass: 0.0,
        };
        let body = self
            .create_body(&desc, material)
            .ok_or(SetupError::DegenerateCushion { index: spec.index })?;
        self.cushions.push(body);
        Ok(())
    }

    fn step(&mut self, dt: f32) {
        if self.integration_parameters.dt != dt {
            self.set_dt(dt);
        }
        self.step_pipeline();
    }

    fn apply_impulse(&mut self, id: BallId, impulse: Vec2, local_point: Vec2) {
        let rb = self.rigid_body_mut(id);
        let point = na_to_vec2(rb.translation()) + local_point;
        rb.apply_impulse_at_point(vec2_to_na(impulse), Point::new(point.x, point.y), true);
    }

    fn set_position(&mut self, id: BallId, position: Vec2) {
        let idx = self.ball_index(id);
        self.balls[idx].anchor = position;
        let handle = self.balls[idx].body.body_handle;
        self.bodies[handle].set_translation(vec2_to_na(position), true);
    }

    fn set_velocity(&mut self, id: BallId, velocity: Vec2) {
        self.rigid_body_mut(id).set_linvel(vec2_to_na(velocity), true);
    }

    fn remove_ball(&mut self, id: BallId) {
        let idx = self.ball_index(id);
        let ball = self.balls.remove(idx);
        self.remove_body(&ball.body);
    }

    fn position(&self, id: BallId) -> Vec2 {
        na_to_vec2(self.rigid_body(id).translation())
    }

    fn velocity(&self, id: BallId) -> Vec2 {
        na_to_vec2(self.rigid_body(id).linvel())
    }

    fn contains(&self, id: BallId) -> bool {
        self.balls.iter().any(|b| b.id == id)
    }

    fn ball_count(&self) -> usize {
        self.balls.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
