//! Animator systems.
//!
//! Submodules overview
//! - [`actions`] – play/stop/wait API for scripts
//! - [`animation`] – per-tick pose selection, frame advance and action completion
//! - [`attach`] – periodic graphic scan attaching/detaching animators
//! - [`input`] – player input to velocity, refused while locked
//! - [`movement`] – velocity integration, skipped while locked
//! - [`placement`] – feet-anchored sprite placement with scale and offsets

pub mod actions;
pub mod animation;
pub mod attach;
pub mod input;
pub mod movement;
pub mod placement;
