//! Sprite placement system.
//!
//! Anchors animated sprites at the character's feet: the origin sits at the
//! bottom-center of a cell, the position is the host screen position plus the
//! configured offsets, and the zoom follows the display scale.
//!
//! Headless hosts without a camera use [`screen_position_system`] to feed
//! [`ScreenPosition`] straight from [`MapPosition`].
use bevy_ecs::prelude::*;

use crate::components::charactergraphic::ScreenPosition;
use crate::components::mapposition::MapPosition;
use crate::components::sprite::Sprite;
use crate::components::spriteanimator::SpriteAnimator;
use crate::resources::animatorconfig::AnimatorConfig;

/// Mirror map positions into screen positions (no camera scroll).
pub fn screen_position_system(
    mut query: Query<(&MapPosition, &mut ScreenPosition), Changed<MapPosition>>,
) {
    for (map, mut screen) in query.iter_mut() {
        screen.x = map.x;
        screen.y = map.y;
    }
}

/// Copy screen positions into animated sprites.
pub fn sprite_placement_system(
    mut query: Query<(&ScreenPosition, &mut Sprite), With<SpriteAnimator>>,
    config: Res<AnimatorConfig>,
) {
    let scale = config.scale();
    for (position, mut sprite) in query.iter_mut() {
        let x = position.x + config.x_offset;
        let y = position.y + config.y_offset_scaled();
        if config.crisp_pixels {
            sprite.x = x.round();
            sprite.y = y.round();
        } else {
            sprite.x = x;
            sprite.y = y;
        }
        sprite.origin_x = config.cell_width as f32 / 2.0;
        sprite.origin_y = config.cell_height as f32;
        sprite.zoom = scale;
    }
}
