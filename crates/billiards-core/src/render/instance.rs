use bytemuck::{Pod, Zeroable};

use crate::render::frame::RenderFrame;

/// Per-ball render data read by the host straight out of linear memory.
/// 4 floats = 16 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    /// Centre in world space.
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Presentation number, selects the ball image.
    pub number: f32,
}

impl BallInstance {
    pub const FLOATS: usize = 4;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    /// Refill `out` with the frame's balls, keeping its allocation.
    pub fn fill_from(frame: &RenderFrame, out: &mut Vec<BallInstance>) {
        out.clear();
        out.extend(frame.balls.iter().map(|b| BallInstance {
            x: b.x,
            y: b.y,
            radius: b.radius,
            number: b.number as f32,
        }));
    }

    pub fn as_floats(instances: &[BallInstance]) -> &[f32] {
        bytemuck::cast_slice(instances)
    }
}
