//! Pocketing: which balls dropped this tick, and what happens to them.
//!
//! Hits are collected over the whole live set before anything is removed,
//! so removing one ball can never make the scan skip the next.

use glam::Vec2;

use crate::api::engine::TableEngine;
use crate::api::types::{Ball, BallId, BallKind, GameEvent};
use crate::rules::match_state::MatchState;
use crate::table::layout::Table;

/// A ball found inside a pocket's capture radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PocketHit {
    pub ball: BallId,
    pub kind: BallKind,
    pub number: u8,
    pub pocket: usize,
}

/// Scan the live set in collection order. Each ball is matched to the first
/// pocket that captures it.
pub fn find_pocketed<E: TableEngine>(engine: &E, balls: &[Ball], table: &Table) -> Vec<PocketHit> {
    balls
        .iter()
        .filter_map(|ball| {
            let pos = engine.position(ball.id);
            table.capturing_pocket(pos).map(|pocket| PocketHit {
                ball: ball.id,
                kind: ball.kind,
                number: ball.number,
                pocket,
            })
        })
        .collect()
}

/// Apply this tick's pots: the cue ball is parked and costs a life, object
/// balls leave the engine and the live set for good.
pub fn resolve_pockets<E: TableEngine>(
    engine: &mut E,
    balls: &mut Vec<Ball>,
    table: &Table,
    state: &mut MatchState,
    cue_parking: Vec2,
    events: &mut Vec<GameEvent>,
) -> Vec<PocketHit> {
    let hits = find_pocketed(engine, balls, table);

    for hit in &hits {
        match hit.kind {
            BallKind::Cue => {
                state.record_cue_pot();
                engine.set_position(hit.ball, cue_parking);
                engine.set_velocity(hit.ball, Vec2::ZERO);
                log::info!(
                    "Cue ball pocketed in pocket {}, {} lives left",
                    hit.pocket,
                    state.lives()
                );
                events.push(GameEvent::new(GameEvent::CUE_POTTED, state.lives() as f32, hit.pocket as f32));
            }
            BallKind::Object => {
                engine.remove_ball(hit.ball);
                state.record_object_pot(hit.number);
                log::info!("Ball {} pocketed in pocket {}", hit.number, hit.pocket);
                events.push(GameEvent::new(GameEvent::OBJECT_POTTED, hit.number as f32, hit.pocket as f32));
            }
        }
    }

    balls.retain(|b| {
        b.is_cue() || !hits.iter().any(|h| h.ball == b.id)
    });
    hits
}
