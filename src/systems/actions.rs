//! Script-facing action API.
//!
//! Scripts start and cancel manual actions and wait for them to finish:
//!
//! - [`play_action`] puts a character into manual mode and locks its movement
//! - [`stop_action`] cancels immediately and releases the lock
//! - [`wait_for_action`] returns an [`ActionWait`] the script scheduler polls
//!   on each later tick until the action is over
//!
//! All three run synchronously on the caller's tick with `&mut World`, the
//! same way the main loop drives the schedule. Unresolvable targets make every
//! call a no-op.
//!
//! # Example
//!
//! ```ignore
//! play_action(&mut world, ActionTarget::Player, "chop", FacingRequest::Current, false, None);
//! let wait = wait_for_action(&mut world, ActionTarget::Player, None);
//! // each tick:
//! if wait.is_none_or(|w| w.poll(&world).is_ready()) { /* next step */ }
//! ```

use std::task::Poll;

use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::animationstate::AnimationState;
use crate::components::facing::{Direction, Facing};
use crate::components::motion::{Controllable, EventId};
use crate::components::movementlock::MovementLock;
use crate::events::action::{ActionEnd, ActionFinishedEvent, ActionStartedEvent};
use crate::resources::actionaliases::ActionAliases;

/// Which character a script call addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTarget {
    /// The controllable character.
    Player,
    /// The map event running the script (its id is passed as `invoker`).
    ThisEvent,
    /// A map event by numeric id.
    EventId(u32),
}

impl ActionTarget {
    /// Parse a target name as scripts write it: `player`, `this_event` /
    /// `thisEvent`, `event_id` / `eventId` (with `event_id` as the id).
    pub fn from_name(name: &str, event_id: u32) -> Option<Self> {
        match name.trim() {
            "player" => Some(ActionTarget::Player),
            "this_event" | "thisEvent" => Some(ActionTarget::ThisEvent),
            "event_id" | "eventId" => Some(ActionTarget::EventId(event_id)),
            _ => None,
        }
    }

    /// Find the addressed entity. `invoker` is the calling script's event id.
    pub fn resolve(self, world: &mut World, invoker: Option<u32>) -> Option<Entity> {
        match self {
            ActionTarget::Player => {
                let mut query = world.query_filtered::<Entity, With<Controllable>>();
                query.iter(world).next()
            }
            ActionTarget::ThisEvent => invoker.and_then(|id| find_event(world, id)),
            ActionTarget::EventId(id) => find_event(world, id),
        }
    }
}

fn find_event(world: &mut World, id: u32) -> Option<Entity> {
    if id == 0 {
        return None;
    }
    let mut query = world.query::<(Entity, &EventId)>();
    query
        .iter(world)
        .find(|(_, event_id)| event_id.0 == id)
        .map(|(entity, _)| entity)
}

/// Direction requested for an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingRequest {
    /// Keep the character's current facing.
    #[default]
    Current,
    Fixed(Direction),
}

impl FacingRequest {
    /// `up`/`down`/`left`/`right` in any case; anything else keeps the current facing.
    pub fn parse(name: &str) -> Self {
        Direction::parse(name).map_or(FacingRequest::Current, FacingRequest::Fixed)
    }

    pub fn resolve(self, current: Direction) -> Direction {
        match self {
            FacingRequest::Current => current,
            FacingRequest::Fixed(direction) => direction,
        }
    }
}

/// Start a manual action on `target` and lock its movement.
///
/// `action` is normalized through [`ActionAliases`] (unknown names play
/// idle). Returns the affected entity, or `None` when the target does not
/// resolve.
pub fn play_action(
    world: &mut World,
    target: ActionTarget,
    action: &str,
    direction: FacingRequest,
    looped: bool,
    invoker: Option<u32>,
) -> Option<Entity> {
    let Some(entity) = target.resolve(world, invoker) else {
        debug!("play_action: target {:?} not found", target);
        return None;
    };

    let action = match world.get_resource::<ActionAliases>() {
        Some(aliases) => aliases.normalize(action),
        None => ActionAliases::default().normalize(action),
    };
    let current = world.get::<Facing>(entity).map(|f| f.0).unwrap_or_default();
    let direction = direction.resolve(current);

    let mut state = world
        .get::<AnimationState>(entity)
        .cloned()
        .unwrap_or_default();
    state.begin(action.clone(), direction, looped);
    world
        .entity_mut(entity)
        .insert((state, MovementLock { locked: true }));

    info!(
        "{:?} plays '{}' facing {:?}{}",
        entity,
        action,
        direction,
        if looped { " (looped)" } else { "" }
    );
    world.trigger(ActionStartedEvent {
        entity,
        action,
        direction,
        looped,
    });
    Some(entity)
}

/// Cancel the manual action on `target` right away and release its lock.
pub fn stop_action(
    world: &mut World,
    target: ActionTarget,
    invoker: Option<u32>,
) -> Option<Entity> {
    let Some(entity) = target.resolve(world, invoker) else {
        debug!("stop_action: target {:?} not found", target);
        return None;
    };

    let finished = world.get_mut::<AnimationState>(entity).and_then(|mut state| {
        let was_manual = state.is_manual();
        state.finish();
        was_manual.then(|| (state.action.clone(), state.cycle_count))
    });
    if let Some(mut lock) = world.get_mut::<MovementLock>(entity) {
        lock.unlock();
    }

    if let Some((action, cycles)) = finished {
        info!("{:?} stopped '{}'", entity, action);
        world.trigger(ActionFinishedEvent {
            entity,
            action,
            cycles,
            reason: ActionEnd::Stopped,
        });
    }
    Some(entity)
}

/// Pending wait on a character's manual action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionWait {
    pub entity: Entity,
}

impl ActionWait {
    pub fn new(entity: Entity) -> Self {
        Self { entity }
    }

    /// `Ready` once the character is no longer in manual mode (or is gone).
    pub fn poll(&self, world: &World) -> Poll<()> {
        match world.get::<AnimationState>(self.entity) {
            Some(state) if state.is_manual() => Poll::Pending,
            _ => Poll::Ready(()),
        }
    }
}

/// Build a wait on `target`'s current action; `None` when it does not resolve.
pub fn wait_for_action(
    world: &mut World,
    target: ActionTarget,
    invoker: Option<u32>,
) -> Option<ActionWait> {
    target.resolve(world, invoker).map(ActionWait::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_names() {
        assert_eq!(ActionTarget::from_name("player", 0), Some(ActionTarget::Player));
        assert_eq!(
            ActionTarget::from_name("thisEvent", 0),
            Some(ActionTarget::ThisEvent)
        );
        assert_eq!(
            ActionTarget::from_name("event_id", 3),
            Some(ActionTarget::EventId(3))
        );
        assert_eq!(ActionTarget::from_name("party", 0), None);
    }

    #[test]
    fn test_facing_request() {
        assert_eq!(FacingRequest::parse("Left"), FacingRequest::Fixed(Direction::Left));
        assert_eq!(FacingRequest::parse("current"), FacingRequest::Current);
        assert_eq!(FacingRequest::Current.resolve(Direction::Up), Direction::Up);
        assert_eq!(
            FacingRequest::Fixed(Direction::Down).resolve(Direction::Up),
            Direction::Down
        );
    }

    #[test]
    fn test_event_id_zero_never_resolves() {
        let mut world = World::new();
        world.spawn(EventId(0));
        assert_eq!(ActionTarget::EventId(0).resolve(&mut world, None), None);
        assert_eq!(ActionTarget::ThisEvent.resolve(&mut world, None), None);
    }
}
