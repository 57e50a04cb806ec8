//! Pointer math
//!
//! Re-exports glam with viewport helpers for pointer-driven effects

pub use glam::*;

/// Axis-aligned element bounds in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x < self.left + self.width
            && point.y >= self.top
            && point.y < self.top + self.height
    }
}

/// Pointer position relative to `rect`, mapped to `[-1, 1]` per axis
/// (centre is zero) and scaled by `intensity`.
///
/// Points outside the rect map outside `[-1, 1]`. A zero-sized rect yields
/// non-finite components.
pub fn relative_position(pointer: Vec2, rect: Rect, intensity: f32) -> Vec2 {
    let x = ((pointer.x - rect.left) / rect.width - 0.5) * 2.0;
    let y = ((pointer.y - rect.top) / rect.height - 0.5) * 2.0;
    Vec2::new(x, y) * intensity
}

/// True when `a` and `b` differ by more than `threshold` on either axis.
pub fn exceeds_threshold(a: Vec2, b: Vec2, threshold: f32) -> bool {
    let delta = (a - b).abs();
    delta.x > threshold || delta.y > threshold
}
