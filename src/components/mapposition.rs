use bevy_ecs::prelude::Component;

/// Map position of a character in pixels.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct MapPosition {
    pub x: f32,
    pub y: f32,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
