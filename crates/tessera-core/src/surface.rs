//! Drawing-surface contract.
//!
//! The engine decides *what order* things are drawn in; the host's backend
//! decides what a rectangle or a sprite actually looks like. Renderable
//! components translate themselves into [`DrawCmd`]s and submit them to a
//! [`Surface`] during the render pass.
//!
//! [`RecordingSurface`] is the headless surface: it records every operation
//! instead of drawing, which is what tests and headless runs use.

use serde::{Deserialize, Serialize};

use crate::math::{Color, Vec2};

/// A single draw submission, already in world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCmd {
    /// Rectangle centered on `center`, rotated around it.
    Rect {
        center: Vec2,
        size: Vec2,
        rotation: f32,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// A texture resource drawn at `position`; `texture` is a resource name.
    Sprite {
        texture: String,
        position: Vec2,
        rotation: f32,
        scale: Vec2,
        tint: Color,
    },
    Text {
        text: String,
        position: Vec2,
        size: f32,
        color: Color,
    },
}

/// Target of one frame's draw submissions.
///
/// A frame is `clear` (optional) → any number of `submit` → `display`.
pub trait Surface {
    fn clear(&mut self, color: Color);

    fn submit(&mut self, cmd: DrawCmd);

    fn display(&mut self);
}

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceOp {
    Clear(Color),
    Draw(DrawCmd),
    Display,
}

/// Headless surface that records operations in submission order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    frames: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded operation since creation or the last [`reset`](Self::reset).
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Only the draw commands, in submission order.
    pub fn draws(&self) -> impl Iterator<Item = &DrawCmd> {
        self.ops.iter().filter_map(|op| match op {
            SurfaceOp::Draw(cmd) => Some(cmd),
            _ => None,
        })
    }

    /// Draw commands submitted after the most recent `display`, or during
    /// the last completed frame if the most recent op was a `display`.
    pub fn last_frame(&self) -> Vec<&DrawCmd> {
        let end = match self.ops.last() {
            Some(SurfaceOp::Display) => self.ops.len() - 1,
            _ => self.ops.len(),
        };
        let start = self.ops[..end]
            .iter()
            .rposition(|op| matches!(op, SurfaceOp::Display))
            .map_or(0, |i| i + 1);
        self.ops[start..end]
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Draw(cmd) => Some(cmd),
                _ => None,
            })
            .collect()
    }

    /// Number of `display` calls seen.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn reset(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.ops.push(SurfaceOp::Clear(color));
    }

    fn submit(&mut self, cmd: DrawCmd) {
        self.ops.push(SurfaceOp::Draw(cmd));
    }

    fn display(&mut self) {
        self.frames += 1;
        self.ops.push(SurfaceOp::Display);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
