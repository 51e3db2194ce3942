pub mod api;
pub mod assets;
pub mod core;
pub mod error;
pub mod input;
pub mod render;
pub mod rules;
pub mod sim;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types at crate root for convenience
pub use api::config::SimConfig;
pub use api::engine::{AnchorPin, BallSpec, CushionSpec, TableEngine};
pub use api::types::{Ball, BallId, BallKind, GameEvent, Outcome};
pub use assets::manifest::AssetManifest;
pub use crate::core::time::FixedTimestep;
pub use error::SetupError;
pub use input::queue::{InputEvent, InputQueue};
pub use render::frame::{BallSprite, PowerBar, RenderFrame, SegmentRect, TextLabel, TraySlot};
pub use render::instance::BallInstance;
pub use rules::match_state::MatchState;
pub use rules::pockets::PocketHit;
pub use rules::shot::{Shot, ShotPhase, Strike};
pub use sim::Simulation;
pub use table::layout::{Cushion, Pocket, Table};

#[cfg(feature = "physics")]
pub use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial, PhysicsBody, PhysicsWorld};
