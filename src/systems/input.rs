//! Player input controller.
//!
//! Reads [`PlayerInput`] and sets the velocity and dash flag of the
//! [`Controllable`] character. A locked player accepts no input: its velocity
//! is cleared and the keys are ignored until the action releases it.
use bevy_ecs::prelude::*;

use crate::components::motion::{Controllable, Motion};
use crate::components::movementlock::MovementLock;
use crate::components::rigidbody::RigidBody;
use crate::resources::playerinput::{DASH_SPEED, PlayerInput, WALK_SPEED};

/// Update the controllable character's velocity based on input.
pub fn player_input_system(
    mut query: Query<(&mut RigidBody, &mut Motion, Option<&MovementLock>), With<Controllable>>,
    input: Res<PlayerInput>,
) {
    for (mut rigidbody, mut motion, lock) in query.iter_mut() {
        rigidbody.stop();
        if lock.is_some_and(MovementLock::is_locked) {
            motion.moving = false;
            motion.dashing = false;
            continue;
        }

        let speed = if input.dash { DASH_SPEED } else { WALK_SPEED };
        if input.up {
            rigidbody.vy -= speed;
        }
        if input.down {
            rigidbody.vy += speed;
        }
        if input.left {
            rigidbody.vx -= speed;
        }
        if input.right {
            rigidbody.vx += speed;
        }

        // Normalize diagonal movement
        if (input.up || input.down) && (input.left || input.right) {
            rigidbody.vx *= std::f32::consts::FRAC_1_SQRT_2;
            rigidbody.vy *= std::f32::consts::FRAC_1_SQRT_2;
        }
        motion.dashing = input.dash && input.any_direction();
    }
}
