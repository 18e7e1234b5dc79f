//! ECS components for animated characters.
//!
//! Submodules overview:
//! - [`animationstate`] – scripted action state (mode, action, loop, completion)
//! - [`charactergraphic`] – host graphic name and screen anchor
//! - [`facing`] – cardinal direction a character faces
//! - [`mapposition`] – map position in pixels
//! - [`motion`] – host-reported moving/dashing flags, player and event tags
//! - [`movementlock`] – lock gate over autonomous movement and input
//! - [`rigidbody`] – per-tick velocity
//! - [`sprite`] – visible sprite and its sheet source rectangle
//! - [`spriteanimator`] – playback state and the per-tick driver

pub mod animationstate;
pub mod charactergraphic;
pub mod facing;
pub mod mapposition;
pub mod motion;
pub mod movementlock;
pub mod rigidbody;
pub mod sprite;
pub mod spriteanimator;
