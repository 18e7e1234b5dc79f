//! Animator attach/detach system.
//!
//! The host gives no notification when a character's graphic changes, so
//! [`memao_attach_system`] polls: on the first run, whenever a
//! [`CharacterGraphic`] is added, and every `rescan_interval` ticks after
//! that. Entities whose graphic name ends with the configured marker get a
//! [`SpriteAnimator`] and a [`Sprite`]; entities that no longer match lose
//! them. A manual action still playing on a detached character is stopped,
//! its lock released and an [`ActionFinishedEvent`] triggered.

use bevy_ecs::prelude::*;
use log::info;

use crate::components::animationstate::AnimationState;
use crate::components::charactergraphic::CharacterGraphic;
use crate::components::facing::Facing;
use crate::components::motion::Motion;
use crate::components::movementlock::MovementLock;
use crate::components::sprite::Sprite;
use crate::components::spriteanimator::SpriteAnimator;
use crate::events::action::{ActionEnd, ActionFinishedEvent};
use crate::resources::animatorconfig::AnimatorConfig;

/// Attach or detach animators according to each character's graphic name.
#[allow(clippy::type_complexity)]
pub fn memao_attach_system(
    mut commands: Commands,
    mut query: Query<(
        Entity,
        &CharacterGraphic,
        Has<SpriteAnimator>,
        Option<&mut Sprite>,
        Option<&mut AnimationState>,
        Option<&mut MovementLock>,
    )>,
    added: Query<(), Added<CharacterGraphic>>,
    config: Res<AnimatorConfig>,
    mut ticks: Local<u32>,
) {
    let due = *ticks % config.rescan_interval.max(1) == 0;
    *ticks = ticks.wrapping_add(1);
    if !due && added.is_empty() {
        return;
    }

    for (entity, graphic, has_animator, sprite, state, lock) in query.iter_mut() {
        let wants = config.is_memao_name(&graphic.name);
        match (wants, has_animator) {
            (true, false) => {
                info!("Attaching animator to {:?} ({})", entity, graphic.name);
                commands
                    .entity(entity)
                    .insert((SpriteAnimator::default(), Sprite::new(graphic.name.clone())))
                    .insert_if_new((
                        AnimationState::default(),
                        MovementLock::default(),
                        Motion::default(),
                        Facing::default(),
                    ));
            }
            (false, true) => {
                info!("Detaching animator from {:?} ({})", entity, graphic.name);
                commands.entity(entity).remove::<(SpriteAnimator, Sprite)>();
                if let Some(mut lock) = lock {
                    lock.unlock();
                }
                if let Some(mut state) = state.filter(|s| s.is_manual()) {
                    state.finish();
                    commands.trigger(ActionFinishedEvent {
                        entity,
                        action: state.action.clone(),
                        cycles: state.cycle_count,
                        reason: ActionEnd::Stopped,
                    });
                }
            }
            (true, true) => {
                // Swapped between two Memao sheets: keep playback, follow the texture.
                if let Some(mut sprite) = sprite {
                    if sprite.tex_key != graphic.name {
                        sprite.tex_key = graphic.name.clone();
                    }
                }
            }
            (false, false) => {}
        }
    }
}
