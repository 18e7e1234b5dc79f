use bevy_ecs::prelude::Component;

use crate::resources::sheetlayout::Cell;

/// Pixel rectangle into the sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SourceRect {
    /// Rectangle covering `cell` on a sheet of `width` x `height` cells.
    pub fn for_cell(cell: Cell, width: u32, height: u32) -> Self {
        Self {
            x: cell.col.saturating_sub(1) * width,
            y: cell.row.saturating_sub(1) * height,
            width,
            height,
        }
    }
}

/// Visible sprite handed to the host renderer.
///
/// `src` selects the frame on the sheet named by `tex_key`. The origin is the
/// pivot in sheet pixels, placed at (`x`, `y`) on screen and scaled by `zoom`.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Sprite {
    pub tex_key: String,
    pub src: SourceRect,
    pub x: f32,
    pub y: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub zoom: f32,
}

impl Sprite {
    pub fn new(tex_key: impl Into<String>) -> Self {
        Self {
            tex_key: tex_key.into(),
            src: SourceRect::default(),
            x: 0.0,
            y: 0.0,
            origin_x: 0.0,
            origin_y: 0.0,
            zoom: 1.0,
        }
    }
}
