//! Sprite animation system.
//!
//! - [`sprite_animator_system`] runs [`SpriteAnimator::tick`] for every
//!   animated character once per render tick, writes the resulting source
//!   rectangle into its [`Sprite`], and triggers [`ActionFinishedEvent`] when
//!   a one-shot action completes.
//!
//! # Animation Flow
//!
//! 1. Layout data lives in [`SheetLayout`]
//! 2. Scripts put characters into manual mode through [`crate::systems::actions`]
//! 3. Host movement updates [`Motion`] and [`Facing`]
//! 4. This system picks the pose, advances frames and releases finished actions
//!
//! # Related
//!
//! - [`crate::components::spriteanimator::SpriteAnimator`] – playback state and driver
//! - [`crate::components::animationstate::AnimationState`] – scripted state
//! - [`crate::resources::sheetlayout::SheetLayout`] – layout table

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::animationstate::AnimationState;
use crate::components::facing::Facing;
use crate::components::motion::Motion;
use crate::components::movementlock::MovementLock;
use crate::components::sprite::{SourceRect, Sprite};
use crate::components::spriteanimator::SpriteAnimator;
use crate::events::action::{ActionEnd, ActionFinishedEvent};
use crate::resources::animatorconfig::AnimatorConfig;
use crate::resources::sheetlayout::SheetLayout;

/// Advance sprite animations and update the visible frame.
///
/// Contract
/// - Reads [`Motion`] and [`Facing`] from the host.
/// - Looks up frames in [`SheetLayout`] and timing in [`AnimatorConfig`].
/// - Mutates [`SpriteAnimator`], [`AnimationState`], [`MovementLock`] and the
///   [`Sprite`] source rectangle.
#[allow(clippy::type_complexity)]
pub fn sprite_animator_system(
    mut query: Query<(
        Entity,
        &mut SpriteAnimator,
        &mut Sprite,
        &mut AnimationState,
        &mut MovementLock,
        &Motion,
        &Facing,
    )>,
    layout: Res<SheetLayout>,
    config: Res<AnimatorConfig>,
    mut commands: Commands,
) {
    for (entity, mut animator, mut sprite, mut state, mut lock, motion, facing) in query.iter_mut()
    {
        let outcome = animator.tick(&mut state, &mut lock, *motion, facing.0, &layout, &config);

        if let Some(cell) = outcome.redraw {
            sprite.src = SourceRect::for_cell(cell, config.cell_width, config.cell_height);
        }

        if outcome.completed {
            debug!(
                "{:?} finished '{}' after {} cycles",
                entity, state.action, state.cycle_count
            );
            commands.trigger(ActionFinishedEvent {
                entity,
                action: state.action.clone(),
                cycles: state.cycle_count,
                reason: ActionEnd::Completed,
            });
        }
    }
}
