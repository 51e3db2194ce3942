//! Shot state machine: aim → charge → strike → settle.
//!
//! The machine only ever sees the table through two facts computed by the
//! caller each tick: whether anything is still rolling, and where the cue
//! ball and pointer are. Impulses are returned as `Strike`s for the caller
//! to hand to the engine.

use glam::Vec2;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShotPhase {
    /// Table at rest, angle follows the pointer.
    Aiming,
    /// Button held, charge oscillating, angle frozen.
    Charging,
    /// Impulse applied; balls still rolling.
    Struck,
}

/// A completed shot, ready to be applied to the cue ball.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub charge: i32,
    pub angle: f32,
    pub impulse: Vec2,
}

/// A ball counts as at rest when both velocity components truncate to zero.
pub fn is_resting(velocity: Vec2) -> bool {
    velocity.x.trunc() == 0.0 && velocity.y.trunc() == 0.0
}

/// Aim angle in degrees for a cue ball at `cue` and the pointer at `pointer`.
/// Screen y grows downward, so it is flipped to keep "up" positive.
/// `None` when the pointer sits exactly on the cue ball centre.
pub fn aim_angle(cue: Vec2, pointer: Vec2) -> Option<f32> {
    let d = cue - pointer;
    if d.length_squared() == 0.0 {
        return None;
    }
    Some((-d.y).atan2(d.x).to_degrees())
}

/// Impulse for a strike of `charge` at `angle` degrees. The ball travels
/// toward the pointer the angle was taken from.
pub fn strike_impulse(charge: f32, angle: f32) -> Vec2 {
    let (sin, cos) = angle.to_radians().sin_cos();
    Vec2::new(charge * -cos, charge * sin)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    angle: f32,
    charge: i32,
    direction: i32,
    charging: bool,
    /// A charging session ended and its impulse is still owed.
    released: bool,
}

impl Shot {
    pub fn new() -> Self {
        Self {
            angle: 0.0,
            charge: 0,
            direction: 1,
            charging: false,
            released: false,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    pub fn direction(&self) -> i32 {
        self.direction
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    pub fn phase(&self, table_in_motion: bool) -> ShotPhase {
        if self.charging {
            ShotPhase::Charging
        } else if table_in_motion {
            ShotPhase::Struck
        } else {
            ShotPhase::Aiming
        }
    }

    /// Point the cue from the cue ball at the pointer. Ignored while charging.
    pub fn aim(&mut self, cue: Vec2, pointer: Vec2) {
        if self.charging {
            return;
        }
        if let Some(angle) = aim_angle(cue, pointer) {
            self.angle = angle;
        }
    }

    /// Start a charging session. Returns `false` if one is already running
    /// or the previous session's strike is still owed.
    pub fn begin_charge(&mut self) -> bool {
        if self.charging || self.released {
            return false;
        }
        self.charging = true;
        true
    }

    /// End the charging session; the impulse is owed from now on.
    /// Returns `false` if no session was running.
    pub fn release(&mut self) -> bool {
        if !self.charging {
            return false;
        }
        self.charging = false;
        self.released = true;
        true
    }

    /// One tick of the charge oscillator: move by `step` and bounce at
    /// 0 and `max`.
    pub fn advance_charge(&mut self, step: i32, max: i32) {
        if !self.charging {
            return;
        }
        self.charge += step * self.direction;
        if self.charge >= max || self.charge <= 0 {
            self.direction = -self.direction;
        }
    }

    /// Take the owed strike, resetting charge and direction.
    pub fn take_strike(&mut self) -> Option<Strike> {
        if !self.released {
            return None;
        }
        let strike = Strike {
            charge: self.charge,
            angle: self.angle,
            impulse: strike_impulse(self.charge as f32, self.angle),
        };
        self.released = false;
        self.charge = 0;
        self.direction = 1;
        Some(strike)
    }

    /// Number of power-bar segments, `ceil(charge / per_segment)`.
    pub fn power_segments(&self, per_segment: i32) -> u32 {
        if self.charge <= 0 {
            return 0;
        }
        ((self.charge + per_segment - 1) / per_segment) as u32
    }
}

impl Default for Shot {
    fn default() -> Self {
        Self::new()
    }
}
