//! Host-side character graphic and screen placement.
//!
//! The host writes the sheet name a character is currently drawn with into
//! [`CharacterGraphic`] and its on-screen anchor into [`ScreenPosition`]. Both
//! are read-only to the animator: the graphic name decides whether a
//! [`SpriteAnimator`](crate::components::spriteanimator::SpriteAnimator) is
//! attached, the position is passed through to the
//! [`Sprite`](crate::components::sprite::Sprite).

use bevy_ecs::prelude::Component;

/// Name of the sprite sheet a character is configured with.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct CharacterGraphic {
    pub name: String,
}

impl CharacterGraphic {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Screen-space anchor of a character, at its feet.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPosition {
    pub x: f32,
    pub y: f32,
}

impl ScreenPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
