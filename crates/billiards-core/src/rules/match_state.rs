use crate::api::types::Outcome;

/// Lives, potted history and the win/loss verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    lives: i32,
    /// Presentation numbers in the order the balls dropped.
    potted: Vec<u8>,
    active: bool,
    outcome: Outcome,
    /// The cue ball is parked off the table waiting to be re-spotted.
    cue_potted: bool,
}

impl MatchState {
    pub fn new(starting_lives: i32) -> Self {
        Self {
            lives: starting_lives,
            potted: Vec::with_capacity(15),
            active: true,
            outcome: Outcome::Undecided,
            cue_potted: false,
        }
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn potted(&self) -> &[u8] {
        &self.potted
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn cue_potted(&self) -> bool {
        self.cue_potted
    }

    /// The cue ball dropped: costs a life and schedules a re-spot.
    pub fn record_cue_pot(&mut self) {
        self.lives -= 1;
        self.cue_potted = true;
    }

    pub fn record_object_pot(&mut self, number: u8) {
        self.potted.push(number);
    }

    /// The cue ball is back on its spot.
    pub fn clear_cue_potted(&mut self) {
        self.cue_potted = false;
    }

    /// Derive the verdict from lives and the live-ball count (cue included).
    /// The first decision sticks; returns the outcome when it was decided by
    /// this call.
    pub fn evaluate(&mut self, live_balls: usize) -> Option<Outcome> {
        if self.outcome.is_terminal() {
            return None;
        }
        self.outcome = if self.lives <= 0 {
            Outcome::Lost
        } else if live_balls == 1 {
            Outcome::Won
        } else {
            return None;
        };
        self.active = false;
        Some(self.outcome)
    }
}
