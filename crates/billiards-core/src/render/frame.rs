use glam::Vec2;
use serde::Serialize;

use crate::api::engine::TableEngine;
use crate::api::types::Outcome;
use crate::sim::Simulation;

/// Width and height of one power-bar segment.
pub const SEGMENT_SIZE: Vec2 = Vec2::new(10.0, 20.0);
const SEGMENT_SPACING: f32 = 15.0;
const SEGMENT_OFFSET: Vec2 = Vec2::new(-30.0, 30.0);
const TRAY_SPACING: f32 = 50.0;
const PANEL_MARGIN: f32 = 10.0;
const LIVES_INSET: f32 = 200.0;
const BANNER_OFFSET: Vec2 = Vec2::new(-160.0, -100.0);

/// A live ball to draw, centred on (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallSprite {
    pub number: u8,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// One filled power-bar rectangle, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerBar {
    pub charge: i32,
    pub segments: Vec<SegmentRect>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// A potted ball shown in the bottom panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraySlot {
    pub number: u8,
    pub x: f32,
    pub y: f32,
}

/// Everything the host draws for one frame, in draw order: table, balls,
/// power bar, panel, banner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub width: f32,
    pub height: f32,
    pub balls: Vec<BallSprite>,
    pub power_bar: Option<PowerBar>,
    pub lives: i32,
    pub lives_label: TextLabel,
    pub potted: Vec<TraySlot>,
    pub outcome: Outcome,
    pub banner: Option<TextLabel>,
}

impl RenderFrame {
    pub fn build<E: TableEngine>(sim: &Simulation<E>) -> Self {
        let config = sim.config();
        let state = sim.match_state();
        let engine = sim.engine();
        let (width, height) = (config.table_width, config.table_height);

        let balls = sim
            .balls()
            .iter()
            .filter(|b| !(b.is_cue() && state.cue_potted()))
            .map(|b| {
                let pos = engine.position(b.id);
                BallSprite {
                    number: b.number,
                    x: pos.x,
                    y: pos.y,
                    radius: b.radius,
                }
            })
            .collect();

        let shot = sim.shot();
        let power_bar = (shot.is_charging() && state.is_active()).then(|| {
            let origin = sim.cue_position() + SEGMENT_OFFSET;
            let segments = (0..shot.power_segments(config.charge_per_segment))
                .map(|i| SegmentRect {
                    x: origin.x + i as f32 * SEGMENT_SPACING,
                    y: origin.y,
                    width: SEGMENT_SIZE.x,
                    height: SEGMENT_SIZE.y,
                })
                .collect();
            PowerBar {
                charge: shot.charge(),
                segments,
            }
        });

        let panel_y = height + PANEL_MARGIN;
        let potted = state
            .potted()
            .iter()
            .enumerate()
            .map(|(i, &number)| TraySlot {
                number,
                x: PANEL_MARGIN + i as f32 * TRAY_SPACING,
                y: panel_y,
            })
            .collect();

        let outcome = state.outcome();
        let banner = outcome.message().map(|text| TextLabel {
            text: text.to_string(),
            x: width / 2.0 + BANNER_OFFSET.x,
            y: height / 2.0 + BANNER_OFFSET.y,
        });

        Self {
            width,
            height,
            balls,
            power_bar,
            lives: state.lives(),
            lives_label: TextLabel {
                text: format!("LIVES: {}", state.lives()),
                x: width - LIVES_INSET,
                y: panel_y,
            },
            potted,
            outcome,
            banner,
        }
    }
}
