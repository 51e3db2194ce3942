use glam::Vec2;

use crate::error::SetupError;

/// Simulation constants. The defaults describe the standard table and are what
/// the game ships with; the table geometry itself lives in `table::layout`.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Fixed simulation rate in ticks per second (default: 120).
    pub tick_hz: u32,
    /// Table width in world units.
    pub table_width: f32,
    /// Table height in world units (the control panel sits below it).
    pub table_height: f32,
    /// Height of the control panel band below the table.
    pub panel_height: f32,
    /// Base ball size. The collision radius is half of this.
    pub ball_diameter: f32,
    /// Base pocket size. The capture radius is half of this.
    pub pocket_diameter: f32,
    pub ball_mass: f32,
    pub ball_elasticity: f32,
    pub cushion_elasticity: f32,
    /// Anchor pin: maximum correction speed back toward the pin (0 = none).
    pub pin_max_bias: f32,
    /// Anchor pin: maximum force the pin can exert on a ball.
    pub pin_max_force: f32,
    /// Upper bound of the oscillating shot charge.
    pub max_charge: i32,
    /// Charge change per tick while the button is held.
    pub charge_step: i32,
    /// Charge represented by one power-bar segment.
    pub charge_per_segment: i32,
    pub starting_lives: i32,
    /// Where the cue ball starts and is re-spotted after a pot.
    pub cue_home: Vec2,
    /// Off-table spot holding a potted cue ball until it is re-spotted.
    pub cue_parking: Vec2,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_hz: 120,
            table_width: 1200.0,
            table_height: 678.0,
            panel_height: 50.0,
            ball_diameter: 36.0,
            pocket_diameter: 66.0,
            ball_mass: 5.0,
            ball_elasticity: 0.8,
            cushion_elasticity: 0.8,
            pin_max_bias: 0.0,
            pin_max_force: 1000.0,
            max_charge: 10_000,
            charge_step: 100,
            charge_per_segment: 2000,
            starting_lives: 3,
            cue_home: Vec2::new(888.0, 678.0 / 2.0),
            cue_parking: Vec2::new(-100.0, -100.0),
        }
    }
}

impl SimConfig {
    /// Fixed tick length in seconds.
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_hz as f32
    }

    pub fn ball_radius(&self) -> f32 {
        self.ball_diameter / 2.0
    }

    pub fn capture_radius(&self) -> f32 {
        self.pocket_diameter / 2.0
    }

    /// Total drawable height: table plus control panel.
    pub fn world_height(&self) -> f32 {
        self.table_height + self.panel_height
    }

    /// Reject values that would stall the tick loop or the charge oscillator.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.tick_hz == 0 {
            return Err(SetupError::invalid_config("tick_hz must be positive"));
        }
        if self.charge_step <= 0 || self.max_charge <= 0 {
            return Err(SetupError::invalid_config(format!(
                "charge_step ({}) and max_charge ({}) must be positive",
                self.charge_step, self.max_charge
            )));
        }
        if self.charge_per_segment <= 0 {
            return Err(SetupError::invalid_config("charge_per_segment must be positive"));
        }
        if self.ball_mass <= 0.0 || self.ball_diameter <= 0.0 {
            return Err(SetupError::invalid_config("balls need a positive mass and size"));
        }
        Ok(())
    }
}
