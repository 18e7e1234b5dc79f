//! Host-side movement gated by the movement lock.
//!
//! [`autonomous_movement_system`] integrates velocity into position and
//! reports motion to the animator. Characters whose [`MovementLock`] is set
//! keep their position and report themselves as standing still.
use bevy_ecs::prelude::*;

use crate::components::facing::Facing;
use crate::components::mapposition::MapPosition;
use crate::components::motion::Motion;
use crate::components::movementlock::MovementLock;
use crate::components::rigidbody::RigidBody;

pub fn autonomous_movement_system(
    mut query: Query<(
        &mut MapPosition,
        &RigidBody,
        &mut Motion,
        Option<&mut Facing>,
        Option<&MovementLock>,
    )>,
) {
    for (mut position, rigidbody, mut motion, facing, lock) in query.iter_mut() {
        if lock.is_some_and(MovementLock::is_locked) {
            motion.moving = false;
            continue;
        }
        position.x += rigidbody.vx;
        position.y += rigidbody.vy;
        motion.moving = rigidbody.is_moving();
        if let (Some(mut facing), Some(heading)) = (facing, rigidbody.heading()) {
            facing.0 = heading;
        }
    }
}
