//! Game rules evaluated once per tick, in this order: pockets, shot, match.

pub mod match_state;
pub mod pockets;
pub mod shot;
