//! Per-tick directional input for the controllable character.
//!
//! The host fills [`PlayerInput`] from whatever device it reads;
//! [`player_input_system`](crate::systems::input::player_input_system) turns
//! it into velocity unless the player is locked.
use bevy_ecs::prelude::*;

use crate::components::facing::Direction;

/// Walk speed in pixels per tick.
pub const WALK_SPEED: f32 = 2.0;
/// Dash speed in pixels per tick.
pub const DASH_SPEED: f32 = 4.0;

/// Resource capturing the directional keys and the dash button this tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub dash: bool,
}

impl PlayerInput {
    /// Input holding a single direction.
    pub fn towards(direction: Direction, dash: bool) -> Self {
        let mut input = Self {
            dash,
            ..Self::default()
        };
        match direction {
            Direction::Up => input.up = true,
            Direction::Down => input.down = true,
            Direction::Left => input.left = true,
            Direction::Right => input.right = true,
        }
        input
    }

    pub fn any_direction(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    pub fn release(&mut self) {
        *self = Self::default();
    }
}
