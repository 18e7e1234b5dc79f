//! Facing direction of a character.
//!
//! The host keeps [`Facing`] up to date; the animator only reads it. The four
//! cardinal [`Direction`]s double as the suffix used to build layout names
//! (`"idle" + "Down"` -> `"idleDown"`).

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// One of the four cardinal directions a sprite can face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Down,
    Left,
    Right,
    Up,
}

impl Direction {
    pub const DIRECTIONS: [Direction; 4] = [
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Up,
    ];

    /// Suffix appended to a base action name when looking up layout entries.
    pub const fn label(self) -> &'static str {
        match self {
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::Up => "Up",
        }
    }

    /// Map the numpad-style numbering used by tile engines (2/4/6/8).
    ///
    /// Unknown values fall back to [`Direction::Down`].
    pub const fn from_numpad(value: u8) -> Self {
        match value {
            4 => Direction::Left,
            6 => Direction::Right,
            8 => Direction::Up,
            _ => Direction::Down,
        }
    }

    pub const fn as_numpad(self) -> u8 {
        match self {
            Direction::Down => 2,
            Direction::Left => 4,
            Direction::Right => 6,
            Direction::Up => 8,
        }
    }

    /// Parse a case-insensitive direction name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "up" => Some(Direction::Up),
            _ => None,
        }
    }
}

/// Current facing of a character, written by the host movement code.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Facing(pub Direction);
