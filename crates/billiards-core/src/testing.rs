//! Deterministic engine double for rule tests: balls glide at constant
//! velocity, never collide, and every command is recorded.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::api::engine::{BallSpec, CushionSpec, TableEngine};
use crate::api::types::BallId;
use crate::error::SetupError;

#[derive(Debug, Clone, Copy)]
pub(crate) struct ScriptedBall {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
}

#[derive(Debug, Default)]
pub(crate) struct ScriptedEngine {
    pub balls: BTreeMap<BallId, ScriptedBall>,
    pub cushions: usize,
    pub steps: u32,
    pub impulses: Vec<(BallId, Vec2)>,
    pub removed: Vec<BallId>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn ball(&self, id: BallId) -> &ScriptedBall {
        self.balls
            .get(&id)
            .unwrap_or_else(|| panic!("ball {:?} is not in the scripted engine", id))
    }

    fn ball_mut(&mut self, id: BallId) -> &mut ScriptedBall {
        self.balls
            .get_mut(&id)
            .unwrap_or_else(|| panic!("ball {:?} is not in the scripted engine", id))
    }
}

impl TableEngine for ScriptedEngine {
    fn add_ball(&mut self, spec: &BallSpec) -> Result<(), SetupError> {
        if self.balls.contains_key(&spec.id) {
            return Err(SetupError::DuplicateBall(spec.id));
        }
        self.balls.insert(
            spec.id,
            ScriptedBall {
                position: spec.position,
                velocity: Vec2::ZERO,
                mass: spec.mass,
            },
        );
        Ok(())
    }

    fn add_cushion(&mut self, spec: &CushionSpec) -> Result<(), SetupError> {
        if spec.points.len() < 3 {
            return Err(SetupError::DegenerateCushion { index: spec.index });
        }
        self.cushions += 1;
        Ok(())
    }

    fn step(&mut self, dt: f32) {
        self.steps += 1;
        for ball in self.balls.values_mut() {
            ball.position += ball.velocity * dt;
        }
    }

    fn apply_impulse(&mut self, id: BallId, impulse: Vec2, _local_point: Vec2) {
        let ball = self.ball_mut(id);
        ball.velocity += impulse / ball.mass;
        self.impulses.push((id, impulse));
    }

    fn set_position(&mut self, id: BallId, position: Vec2) {
        self.ball_mut(id).position = position;
    }

    fn set_velocity(&mut self, id: BallId, velocity: Vec2) {
        self.ball_mut(id).velocity = velocity;
    }

    fn remove_ball(&mut self, id: BallId) {
        self.balls
            .remove(&id)
            .unwrap_or_else(|| panic!("ball {:?} is not in the scripted engine", id));
        self.removed.push(id);
    }

    fn position(&self, id: BallId) -> Vec2 {
        self.ball(id).position
    }

    fn velocity(&self, id: BallId) -> Vec2 {
        self.ball(id).velocity
    }

    fn contains(&self, id: BallId) -> bool {
        self.balls.contains_key(&id)
    }

    fn ball_count(&self) -> usize {
        self.balls.len()
    }
}
