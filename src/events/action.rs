//! Manual action lifecycle events.
//!
//! [`ActionStartedEvent`] is triggered by
//! [`play_action`](crate::systems::actions::play_action).
//! [`ActionFinishedEvent`] is triggered when a one-shot action completes its
//! cycle in [`sprite_animator_system`](crate::systems::animation::sprite_animator_system)
//! or when [`stop_action`](crate::systems::actions::stop_action) cancels it.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<ActionFinishedEvent>| {
//!     if trigger.event().reason == ActionEnd::Completed {
//!         // chain the next scripted step
//!     }
//! });
//! ```

use bevy_ecs::prelude::*;

use crate::components::animationstate::ActionName;
use crate::components::facing::Direction;

/// Why a manual action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEnd {
    /// A non-looping action played one full cycle.
    Completed,
    /// The action was cancelled by a script.
    Stopped,
}

/// Event emitted when a manual action starts and locks movement.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ActionStartedEvent {
    pub entity: Entity,
    pub action: ActionName,
    pub direction: Direction,
    pub looped: bool,
}

/// Event emitted when a manual action ends and movement is released.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ActionFinishedEvent {
    pub entity: Entity,
    pub action: ActionName,
    /// Cycle counter of the character at the time the action ended.
    pub cycles: u32,
    pub reason: ActionEnd,
}
