//! Host-reported motion signals.
//!
//! [`Motion`] carries the two booleans the animator needs from the host's
//! movement code. [`Controllable`] marks the character driven by player input.

use bevy_ecs::prelude::Component;

/// Whether the character is moving this tick and whether it is dashing.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Motion {
    pub moving: bool,
    pub dashing: bool,
}

impl Motion {
    pub fn new(moving: bool, dashing: bool) -> Self {
        Self { moving, dashing }
    }
}

/// Tag component for the primary controllable character (the player).
#[derive(Component, Debug, Clone, Copy)]
pub struct Controllable;

/// Numeric id of a map event, used by scripts to address characters.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(pub u32);
