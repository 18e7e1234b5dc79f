//! Memao animator library.
//!
//! Drives frame-by-frame sprite animation for characters drawn from a shared
//! 48x48 "Memao" sheet: pose selection from movement and facing, scripted
//! manual actions with completion tracking, and a movement lock that keeps
//! characters still while an action plays.
//!
//! Everything is exposed as bevy_ecs components, resources, systems and events
//! so hosts (and the integration tests) can assemble their own schedule.

pub mod components;
pub mod events;
pub mod resources;
pub mod systems;
