//! Render-side animation state and the per-tick driver.
//!
//! A [`SpriteAnimator`] remembers which pose it is playing ([`SequenceKey`]),
//! the frame sequence built for it, where playback is, and a short
//! "still moving" countdown. [`SpriteAnimator::tick`] runs once per render
//! tick:
//!
//! 1. pick the pose: manual action, then idle, then run, then walk
//! 2. rebuild the sequence only when the pose key or fps changed
//! 3. advance the frame on a fixed tick budget
//! 4. on wrap-around during a manual action, count the cycle and release the
//!    action unless it loops
//!
//! The ECS wrapper is [`crate::systems::animation::sprite_animator_system`].

use bevy_ecs::prelude::Component;
use log::debug;

use crate::components::animationstate::{ActionName, AnimationState};
use crate::components::facing::Direction;
use crate::components::motion::Motion;
use crate::components::movementlock::MovementLock;
use crate::resources::animatorconfig::AnimatorConfig;
use crate::resources::sheetlayout::{Cell, Segments, SheetLayout, build_sequence_with_hold};

/// Identifies the pose a sequence was built for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SequenceKey {
    Action(ActionName, Direction),
    Idle(Direction),
    Run(Direction),
    Walk(Direction),
}

impl SequenceKey {
    /// Base layout name for this pose.
    pub fn base(&self) -> &str {
        match self {
            SequenceKey::Action(action, _) => action.as_str(),
            SequenceKey::Idle(_) => "idle",
            SequenceKey::Run(_) => "run",
            SequenceKey::Walk(_) => "walk",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            SequenceKey::Action(_, d)
            | SequenceKey::Idle(d)
            | SequenceKey::Run(d)
            | SequenceKey::Walk(d) => *d,
        }
    }

    /// Whether the first frame of this pose is held.
    fn holds_first_frame(&self) -> bool {
        match self {
            SequenceKey::Idle(_) => true,
            SequenceKey::Action(action, _) => action.is_idle(),
            SequenceKey::Run(_) | SequenceKey::Walk(_) => false,
        }
    }
}

/// Result of one [`SpriteAnimator::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Cell to draw when the visible frame changed this tick.
    pub redraw: Option<Cell>,
    /// The sequence wrapped back to its first frame.
    pub wrapped: bool,
    /// A non-looping manual action completed and released its lock.
    pub completed: bool,
}

/// Per-sprite playback state.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct SpriteAnimator {
    pub key: Option<SequenceKey>,
    pub fps: u32,
    pub sequence: Vec<Cell>,
    pub frame_index: usize,
    /// Ticks spent on the current frame.
    pub timer: u32,
    /// Remaining ticks the character still counts as moving.
    pub move_hold: u32,
}

impl SpriteAnimator {
    pub fn current_cell(&self) -> Option<Cell> {
        if self.sequence.is_empty() {
            return None;
        }
        self.sequence
            .get(self.frame_index % self.sequence.len())
            .copied()
    }

    /// Smooth the host's moving flag over short gaps.
    ///
    /// Returns whether the character counts as moving this tick.
    pub fn update_move_hold(&mut self, moving_now: bool, hold: u32) -> bool {
        if moving_now {
            self.move_hold = hold;
            true
        } else if self.move_hold > 0 {
            self.move_hold -= 1;
            true
        } else {
            false
        }
    }

    /// Advance one render tick.
    pub fn tick(
        &mut self,
        state: &mut AnimationState,
        lock: &mut MovementLock,
        motion: Motion,
        facing: Direction,
        layout: &SheetLayout,
        config: &AnimatorConfig,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let moving = self.update_move_hold(motion.moving, config.walk_hold_frames);

        let (mut key, mut fps) = select_pose(state, moving, motion.dashing, facing, config);
        let mut segments: Segments<'_> = layout.resolve(key.base(), key.direction());
        if segments.is_empty() {
            debug!("Pose {:?} has no frames, using idle facing down", key);
            key = SequenceKey::Idle(Direction::Down);
            fps = config.idle_fps;
            segments = layout.resolve_idle(Direction::Down);
        }

        if self.key.as_ref() != Some(&key) || self.fps != fps {
            let pingpong = matches!(&key, SequenceKey::Action(action, _) if config.is_pingpong(action));
            let idle_hold = key.holds_first_frame();
            self.sequence = build_sequence_with_hold(
                &segments,
                pingpong,
                idle_hold,
                config.idle_hold_frames as usize,
            );
            debug!(
                "Rebuilt sequence for {:?} at {} fps ({} frames)",
                key,
                fps,
                self.sequence.len()
            );
            self.key = Some(key);
            self.fps = fps;
            self.frame_index = 0;
            self.timer = 0;
            outcome.redraw = self.current_cell();
        }

        if self.sequence.is_empty() {
            return outcome;
        }
        self.timer += 1;
        if (self.timer as f32) < config.ticks_per_frame(self.fps) {
            return outcome;
        }

        self.timer = 0;
        self.frame_index = (self.frame_index + 1) % self.sequence.len();
        if self.frame_index == 0 {
            outcome.wrapped = true;
            if state.is_manual() {
                state.cycle_count += 1;
                if !state.looped {
                    state.finish();
                    lock.unlock();
                    outcome.completed = true;
                }
            }
        }
        outcome.redraw = self.current_cell();
        outcome
    }
}

/// Pick the pose key and its fps: manual > idle > run > walk.
pub fn select_pose(
    state: &AnimationState,
    moving: bool,
    dashing: bool,
    facing: Direction,
    config: &AnimatorConfig,
) -> (SequenceKey, u32) {
    if state.is_manual() {
        (
            SequenceKey::Action(state.action.clone(), state.direction),
            config.action_fps,
        )
    } else if !moving {
        (SequenceKey::Idle(facing), config.idle_fps)
    } else if dashing {
        (SequenceKey::Run(facing), config.run_fps)
    } else {
        (SequenceKey::Walk(facing), config.walk_fps)
    }
}
