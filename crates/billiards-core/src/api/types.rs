use bytemuck::{Pod, Zeroable};
use serde::Serialize;

/// Handle of a ball body inside the physics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BallId(pub u32);

/// Whether a ball is the player-struck cue ball or an object ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BallKind {
    Cue,
    Object,
}

/// A ball on the table. Holds no physical state: position and velocity are
/// always read from the engine through `id`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub id: BallId,
    pub kind: BallKind,
    /// Presentation number: object balls 1..=15, cue ball 16.
    pub number: u8,
    pub radius: f32,
}

impl Ball {
    pub fn is_cue(&self) -> bool {
        self.kind == BallKind::Cue
    }
}

/// Final result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Outcome {
    #[default]
    Undecided,
    Lost,
    Won,
}

impl Outcome {
    /// Banner text shown once the match is decided.
    pub fn message(self) -> Option<&'static str> {
        match self {
            Outcome::Undecided => None,
            Outcome::Lost => Some("GAME OVER"),
            Outcome::Won => Some("YOU WIN!"),
        }
    }

    pub fn is_terminal(self) -> bool {
        self != Outcome::Undecided
    }
}

/// A game event handed to the host through a flat float buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    /// An object ball dropped. `a` = presentation number.
    pub const OBJECT_POTTED: f32 = 1.0;
    /// The cue ball dropped. `a` = lives left.
    pub const CUE_POTTED: f32 = 2.0;
    /// The cue ball went back to its home spot.
    pub const CUE_RESPOTTED: f32 = 3.0;
    /// A shot was struck. `a` = charge, `b` = aim angle in degrees.
    pub const SHOT_STRUCK: f32 = 4.0;
    /// The match was decided. `a` = 1 for a win, 0 for a loss.
    pub const MATCH_OVER: f32 = 5.0;

    pub fn new(kind: f32, a: f32, b: f32) -> Self {
        Self { kind, a, b, c: 0.0 }
    }
}
