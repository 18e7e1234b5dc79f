//! Movement lock gate.
//!
//! While a non-looping manual action plays, its character must not move on
//! its own and the player must not be able to steer it. The [`MovementLock`]
//! component holds that flag; host systems query it through
//! [`MovementGate`] before moving anything.
//!
//! The flag is set by [`play_action`](crate::systems::actions::play_action)
//! and cleared either by the animator when the action completes or by
//! [`stop_action`](crate::systems::actions::stop_action).

use bevy_ecs::prelude::*;

use crate::components::motion::Controllable;

/// Per-character lock over autonomous movement and player input.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementLock {
    pub locked: bool,
}

impl MovementLock {
    pub fn lock(&mut self) {
        self.locked = true;
    }
    pub fn unlock(&mut self) {
        self.locked = false;
    }
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// Read access to the movement lock from host movement code.
pub trait MovementGate {
    /// True while the entity's autonomous movement must be suspended.
    fn is_locked(&self, entity: Entity) -> bool;

    /// Whether the entity may currently accept movement input.
    ///
    /// Only the [`Controllable`] character accepts input at all.
    fn can_accept_input(&self, entity: Entity) -> bool;
}

impl MovementGate for World {
    fn is_locked(&self, entity: Entity) -> bool {
        self.get::<MovementLock>(entity)
            .is_some_and(MovementLock::is_locked)
    }

    fn can_accept_input(&self, entity: Entity) -> bool {
        self.get::<Controllable>(entity).is_some() && !self.is_locked(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_reads_lock_component() {
        let mut world = World::new();
        let locked = world.spawn(MovementLock { locked: true }).id();
        let free = world.spawn(MovementLock::default()).id();
        let bare = world.spawn_empty().id();

        assert!(world.is_locked(locked));
        assert!(!world.is_locked(free));
        assert!(!world.is_locked(bare));
    }

    #[test]
    fn test_input_requires_controllable_and_unlocked() {
        let mut world = World::new();
        let player = world.spawn((Controllable, MovementLock::default())).id();
        let npc = world.spawn(MovementLock::default()).id();

        assert!(world.can_accept_input(player));
        assert!(!world.can_accept_input(npc));

        world.get_mut::<MovementLock>(player).unwrap().lock();
        assert!(!world.can_accept_input(player));
    }
}
