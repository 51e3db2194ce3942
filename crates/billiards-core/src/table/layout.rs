//! Fixed table geometry: pockets, cushions, rack and cue spot.
//!
//! Coordinates are world units with the origin at the top-left corner of the
//! table image and y growing downward.

use glam::Vec2;

use crate::api::config::SimConfig;
use crate::api::engine::CushionSpec;

/// Pocket centres, corners and middles of the long rails.
const POCKET_CENTERS: [(f32, f32); 6] = [
    (55.0, 63.0),
    (592.0, 48.0),
    (1134.0, 64.0),
    (55.0, 616.0),
    (592.0, 629.0),
    (1134.0, 616.0),
];

/// Cushion outlines (clockwise or counter-clockwise, always convex).
const CUSHION_OUTLINES: [[(f32, f32); 4]; 6] = [
    [(88.0, 56.0), (109.0, 77.0), (555.0, 77.0), (564.0, 56.0)],
    [(621.0, 56.0), (630.0, 77.0), (1081.0, 77.0), (1102.0, 56.0)],
    [(89.0, 621.0), (110.0, 600.0), (556.0, 600.0), (564.0, 621.0)],
    [(622.0, 621.0), (630.0, 600.0), (1081.0, 600.0), (1102.0, 621.0)],
    [(56.0, 96.0), (77.0, 117.0), (77.0, 560.0), (56.0, 581.0)],
    [(1143.0, 96.0), (1122.0, 117.0), (1122.0, 560.0), (1143.0, 581.0)],
];

/// Top-left ball of the rack.
const RACK_ORIGIN: Vec2 = Vec2::new(250.0, 267.0);
const RACK_COLUMNS: usize = 5;

/// Presentation number of the cue ball (the object balls take 1..=15).
pub const CUE_NUMBER: u8 = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pocket {
    pub center: Vec2,
    pub capture_radius: f32,
}

impl Pocket {
    /// A ball is captured when its centre is within the capture radius,
    /// boundary included.
    pub fn captures(&self, ball_center: Vec2) -> bool {
        self.center.distance(ball_center) <= self.capture_radius
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cushion {
    pub points: Vec<Vec2>,
    pub elasticity: f32,
}

/// The immutable table: built once at start-up.
#[derive(Debug, Clone)]
pub struct Table {
    pockets: Vec<Pocket>,
    cushions: Vec<Cushion>,
}

impl Table {
    /// The standard six-pocket table.
    pub fn standard(config: &SimConfig) -> Self {
        let capture_radius = config.capture_radius();
        let pockets = POCKET_CENTERS
            .iter()
            .map(|&(x, y)| Pocket {
                center: Vec2::new(x, y),
                capture_radius,
            })
            .collect();
        let cushions = CUSHION_OUTLINES
            .iter()
            .map(|outline| Cushion {
                points: outline.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
                elasticity: config.cushion_elasticity,
            })
            .collect();
        Self { pockets, cushions }
    }

    pub fn pockets(&self) -> &[Pocket] {
        &self.pockets
    }

    pub fn cushions(&self) -> &[Cushion] {
        &self.cushions
    }

    /// Cushions in the form the physics engine consumes.
    pub fn cushion_specs(&self) -> impl Iterator<Item = CushionSpec> + '_ {
        self.cushions.iter().enumerate().map(|(index, c)| CushionSpec {
            index,
            points: c.points.clone(),
            elasticity: c.elasticity,
        })
    }

    /// Index of the first pocket capturing `ball_center`, if any.
    pub fn capturing_pocket(&self, ball_center: Vec2) -> Option<usize> {
        self.pockets.iter().position(|p| p.captures(ball_center))
    }
}

/// Triangle rack of 15 object balls, in presentation order (ball 1 first).
///
/// Columns run left to right with 5, 4, 3, 2, 1 balls. Each column is shifted
/// down by half a ball so the balls nest.
/// ```text
///  1
///  2  6
///  3  7 10
///  4  8 11 13
///  5  9 12 14 15
/// ```
pub fn rack_positions(ball_diameter: f32) -> Vec<Vec2> {
    let spacing = ball_diameter + 1.0;
    let mut positions = Vec::with_capacity(15);
    for col in 0..RACK_COLUMNS {
        let rows = RACK_COLUMNS - col;
        for row in 0..rows {
            positions.push(Vec2::new(
                RACK_ORIGIN.x + col as f32 * spacing,
                RACK_ORIGIN.y + row as f32 * spacing + col as f32 * ball_diameter / 2.0,
            ));
        }
    }
    positions
}
