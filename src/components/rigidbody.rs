//! Per-tick velocity of a character.
//!
//! Written by input or AI, integrated by
//! [`autonomous_movement_system`](crate::systems::movement::autonomous_movement_system).

use bevy_ecs::prelude::Component;

use crate::components::facing::Direction;

/// Velocity in pixels per tick.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct RigidBody {
    pub vx: f32,
    pub vy: f32,
}

impl RigidBody {
    pub fn new(vx: f32, vy: f32) -> Self {
        Self { vx, vy }
    }

    pub fn stop(&mut self) {
        self.vx = 0.0;
        self.vy = 0.0;
    }

    pub fn is_moving(&self) -> bool {
        self.vx != 0.0 || self.vy != 0.0
    }

    /// Direction of travel along the dominant axis; `None` when still.
    pub fn heading(&self) -> Option<Direction> {
        if !self.is_moving() {
            return None;
        }
        Some(if self.vx.abs() > self.vy.abs() {
            if self.vx < 0.0 {
                Direction::Left
            } else {
                Direction::Right
            }
        } else if self.vy < 0.0 {
            Direction::Up
        } else {
            Direction::Down
        })
    }
}
