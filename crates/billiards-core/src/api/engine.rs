//! The narrow contract between the game rules and a 2D physics backend.
//!
//! Rules only ever talk to the table through `TableEngine`, so the rapier
//! adapter (`core::physics::PhysicsWorld`) can be swapped for any solver that
//! handles circles, static convex polygons and elastic contact.

use glam::Vec2;

use crate::api::types::BallId;
use crate::error::SetupError;

/// Force-limited pin holding a ball against residual drift.
///
/// Each tick the pin pushes the ball's velocity toward its bias velocity with
/// at most `max_force` of force. With `max_bias == 0.0` that target is zero, so
/// the pin acts as a velocity brake and never drags a ball back to a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPin {
    pub max_bias: f32,
    pub max_force: f32,
}

impl AnchorPin {
    /// Velocity after one tick of pin correction. `to_anchor` is the offset
    /// from the ball to the point the pin is attached at.
    pub fn correct(&self, velocity: Vec2, to_anchor: Vec2, mass: f32, dt: f32) -> Vec2 {
        let target = if self.max_bias > 0.0 {
            (to_anchor / dt).clamp_length_max(self.max_bias)
        } else {
            Vec2::ZERO
        };
        let max_delta = self.max_force * dt / mass;
        velocity + (target - velocity).clamp_length_max(max_delta)
    }
}

/// Everything the engine needs to create one ball.
#[derive(Debug, Clone, Copy)]
pub struct BallSpec {
    pub id: BallId,
    pub position: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub elasticity: f32,
    pub pin: AnchorPin,
}

/// A static cushion: a closed convex point list in world coordinates.
#[derive(Debug, Clone)]
pub struct CushionSpec {
    pub index: usize,
    pub points: Vec<Vec2>,
    pub elasticity: f32,
}

/// 2D rigid-body backend used by the simulation.
///
/// Passing an id the engine does not hold is a broken invariant and panics.
pub trait TableEngine {
    /// Create a dynamic ball body with its collider and anchor pin.
    fn add_ball(&mut self, spec: &BallSpec) -> Result<(), SetupError>;

    /// Create a static cushion attached to a fixed body at the origin.
    fn add_cushion(&mut self, spec: &CushionSpec) -> Result<(), SetupError>;

    /// Advance every dynamic body by one fixed tick.
    fn step(&mut self, dt: f32);

    /// Instantly change a ball's velocity. `local_point` is relative to the
    /// ball centre.
    fn apply_impulse(&mut self, id: BallId, impulse: Vec2, local_point: Vec2);

    fn set_position(&mut self, id: BallId, position: Vec2);

    fn set_velocity(&mut self, id: BallId, velocity: Vec2);

    /// Delete the ball's body, collider and pin for good.
    fn remove_ball(&mut self, id: BallId);

    fn position(&self, id: BallId) -> Vec2;

    fn velocity(&self, id: BallId) -> Vec2;

    fn contains(&self, id: BallId) -> bool;

    /// Number of balls still simulated.
    fn ball_count(&self) -> usize;
}
