//! Per-character animation state.
//!
//! [`AnimationState`] is the scripted side of a character's animation: whether
//! a manual action is playing, which one, in which direction, and how many
//! cycles it has completed. Scripts write it through
//! [`crate::systems::actions`]; the animator reads it every tick and writes
//! back completion.

use std::fmt;

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::components::facing::Direction;

/// Canonical action identifier, the base of layout names (`"axe_chop"` ->
/// `"axe_chopDown"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionName(String);

impl ActionName {
    pub const IDLE: &'static str = "idle";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
    pub fn idle() -> Self {
        Self::new(Self::IDLE)
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    pub fn is_idle(&self) -> bool {
        self.0 == Self::IDLE
    }
}

impl Default for ActionName {
    fn default() -> Self {
        Self::idle()
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is driving the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationMode {
    /// Pose follows observed movement and dash state.
    #[default]
    Autonomous,
    /// A scripted action is playing and movement is locked.
    Manual,
}

/// Scripted animation state of one character.
///
/// `mode == Manual` holds exactly while the character's
/// [`MovementLock`](crate::components::movementlock::MovementLock) is set.
/// `done` only carries meaning after a manual action.
#[derive(Component, Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnimationState {
    pub mode: AnimationMode,
    pub action: ActionName,
    pub direction: Direction,
    pub looped: bool,
    pub done: bool,
    /// Incremented every time a manual sequence wraps back to its first frame.
    pub cycle_count: u32,
}

impl AnimationState {
    pub fn is_manual(&self) -> bool {
        self.mode == AnimationMode::Manual
    }

    /// Enter manual mode for `action`. The cycle counter keeps running.
    pub fn begin(&mut self, action: ActionName, direction: Direction, looped: bool) {
        self.mode = AnimationMode::Manual;
        self.action = action;
        self.direction = direction;
        self.looped = looped;
        self.done = false;
    }

    /// Leave manual mode and mark the action done.
    pub fn finish(&mut self) {
        self.mode = AnimationMode::Autonomous;
        self.done = true;
    }
}
