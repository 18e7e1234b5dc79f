//! Event types used by the animator.
//!
//! Submodules:
//! - [`action`] – start and end notifications for manual actions
pub mod action;
